//! Raw transaction wire format
//!
//! ```text
//! version(4) | varint n_in  | n_in  * [prev_hash(32) prev_index(4) varint len script_sig sequence(4)]
//!            | varint n_out | n_out * [value(8) varint len script_pubkey]
//!            | lock_time(4)
//! ```
//!
//! Integers are little-endian. Varints use the minimal compact-size form; any other form
//! is rejected on parse so that `serialize(parse(bytes)) == bytes` holds for every
//! accepted input.

use crate::encoding::to_hex;
use crate::error::{Result, SpendError};
use crate::hash::double_sha256;
use crate::types::*;

impl Transaction {
    /// Decode wire bytes; trailing bytes are an error
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let tx = read_transaction(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(SpendError::Format(format!(
                "{} trailing bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(serialized_size(self));
        write_transaction(&mut out, self);
        out
    }

    /// Double SHA-256 of the serialization, in wire byte order
    pub fn txid(&self) -> Hash {
        double_sha256(&self.serialize())
    }

    /// Transaction id as shown by block explorers (byte-reversed)
    pub fn txid_hex(&self) -> String {
        let mut id = self.txid();
        id.reverse();
        to_hex(&id)
    }
}

/// Parse bytes and require that they serialize back to exactly the same bytes
pub fn parse_checked(bytes: &[u8]) -> Result<Transaction> {
    let tx = Transaction::parse(bytes)?;
    if tx.serialize() != bytes {
        log::warn!("Transaction does not re-serialize to its input bytes");
        return Err(SpendError::Format(
            "Unable to decode given transaction".to_string(),
        ));
    }
    Ok(tx)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(SpendError::Format(format!(
                "Truncated transaction: {} needs {} bytes, {} left at offset {}",
                what,
                n,
                self.remaining(),
                self.pos
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(what)?))
    }

    fn read_i64(&mut self, what: &str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array(what)?))
    }

    fn read_varint(&mut self, what: &str) -> Result<u64> {
        let prefix = self.read_array::<1>(what)?[0];
        let (value, min) = match prefix {
            0xfd => (u16::from_le_bytes(self.read_array(what)?) as u64, 0xfd),
            0xfe => (u32::from_le_bytes(self.read_array(what)?) as u64, 0x1_0000),
            0xff => (u64::from_le_bytes(self.read_array(what)?), 0x1_0000_0000),
            small => return Ok(small as u64),
        };
        if value < min {
            return Err(SpendError::Format(format!(
                "Non-minimal varint for {}: {}",
                what, value
            )));
        }
        Ok(value)
    }

    /// Read a count of items, each taking at least `min_item_size` bytes
    fn read_count(&mut self, what: &str, min_item_size: usize) -> Result<usize> {
        let count = self.read_varint(what)?;
        let max = (self.remaining() / min_item_size) as u64;
        if count > max {
            return Err(SpendError::Format(format!(
                "Truncated transaction: {} of {} cannot fit in {} bytes",
                what,
                count,
                self.remaining()
            )));
        }
        Ok(count as usize)
    }

    fn read_script(&mut self, what: &str) -> Result<ByteString> {
        let len = self.read_count(what, 1)?;
        Ok(self.take(len, what)?.to_vec())
    }
}

fn read_transaction(reader: &mut Reader) -> Result<Transaction> {
    let version = reader.read_u32("version")?;

    let input_count = reader.read_count("input count", 41)?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let hash = reader.read_array::<32>("previous transaction id")?;
        let index = reader.read_u32("previous output index")?;
        let script_sig = reader.read_script("script sig")?;
        let sequence = reader.read_u32("sequence")?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = reader.read_count("output count", 9)?;
    let mut outputs = Vec::with_capacity(output_count);
    for i in 0..output_count {
        let value = reader.read_i64("output value")?;
        if value < 0 {
            return Err(SpendError::Format(format!(
                "Negative value {} in output {}",
                value, i
            )));
        }
        let script_pubkey = reader.read_script("script pubkey")?;
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = reader.read_u32("lock time")?;
    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Compact-size encoding, always in minimal width
pub fn write_varint(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

pub fn varint_size(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

fn write_transaction(out: &mut Vec<u8>, tx: &Transaction) {
    out.extend_from_slice(&tx.version.to_le_bytes());

    write_varint(out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prevout.hash);
        out.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_varint(out, input.script_sig.len() as u64);
        out.extend_from_slice(&input.script_sig);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_varint(out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_varint(out, output.script_pubkey.len() as u64);
        out.extend_from_slice(&output.script_pubkey);
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
}

/// Exact serialized size in bytes
pub fn serialized_size(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 32 + 4 + varint_size(i.script_sig.len() as u64) + i.script_sig.len() + 4)
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 8 + varint_size(o.script_pubkey.len() as u64) + o.script_pubkey.len())
        .sum();
    4 + varint_size(tx.inputs.len() as u64)
        + inputs
        + varint_size(tx.outputs.len() as u64)
        + outputs
        + 4
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_TX: &str = "01000000014a2aaf9741aee2646513dce5edf58d65acf5afd090341e4f166706a9c82876d5490000006c493046022100a82977e23d5ece7737968eb81d4a63b65ec1bdacc605d25d8869e0fb0d94a040022100c8eefcf6c4b1cc3f050583e9dcf7734d3890ec1300fc1020d5b9407c88840bae0121023c0da0c64e2e5bb7cb0e2b4c10b425854e9b39f2bf8efa5253c0ae77b6948474ffffffff0280f0fa02000000001976a914a3ad778585da555d5beff2f133d8e2bca06b8cbc88acca580200000000001976a914e9e64aae2d1e066db6c5ecb1a2781f418b18eef488ac00000000";

    fn sample_tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TransactionInput {
                prevout: OutPoint { hash: [7; 32], index: 3 },
                script_sig: vec![0x51; 300],
                sequence: 0xfffffffe,
            }],
            outputs: vec![
                TransactionOutput {
                    value: 5_000_000_000,
                    script_pubkey: vec![0x76, 0xa9],
                },
                TransactionOutput {
                    value: 0,
                    script_pubkey: vec![],
                },
            ],
            lock_time: 500_000_001,
        }
    }

    #[test]
    fn test_parse_signed_transaction() {
        let bytes = hex::decode(SIGNED_TX).unwrap();
        let tx = Transaction::parse(&bytes).unwrap();

        assert_eq!(tx.version, 1);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].prevout.index, 0x49);
        assert_eq!(tx.inputs[0].script_sig.len(), 0x6c);
        assert_eq!(tx.inputs[0].sequence, 0xffffffff);
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, 0x02faf080);
        assert_eq!(tx.outputs[1].value, 0x0258ca);
        assert_eq!(tx.outputs[1].script_pubkey.len(), 25);
        assert_eq!(tx.lock_time, 0);
        assert_eq!(tx.serialize(), bytes);
    }

    #[test]
    fn test_round_trip_with_wide_varint() {
        let tx = sample_tx();
        let bytes = tx.serialize();
        assert_eq!(bytes.len(), serialized_size(&tx));
        // 300-byte script length needs the 0xfd form
        assert_eq!(&bytes[41..44], &[0xfd, 0x2c, 0x01]);
        assert_eq!(Transaction::parse(&bytes).unwrap(), tx);
    }

    #[test]
    fn test_parse_rejects_truncation() {
        let bytes = hex::decode(SIGNED_TX).unwrap();
        for len in [0, 3, 4, 40, bytes.len() - 1] {
            assert!(
                matches!(Transaction::parse(&bytes[..len]), Err(SpendError::Format(_))),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_parse_rejects_trailing_bytes() {
        let mut bytes = hex::decode(SIGNED_TX).unwrap();
        bytes.push(0);
        assert!(matches!(Transaction::parse(&bytes), Err(SpendError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_non_minimal_varint() {
        let mut bytes = sample_tx().serialize();
        // input count 1 re-encoded as fd 01 00
        bytes.splice(4..5, [0xfd, 0x01, 0x00]);
        assert!(matches!(Transaction::parse(&bytes), Err(SpendError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_huge_count() {
        let mut bytes = vec![1, 0, 0, 0, 0xff];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(Transaction::parse(&bytes), Err(SpendError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_negative_value() {
        let mut tx = sample_tx();
        tx.outputs[1].value = -1;
        assert!(matches!(Transaction::parse(&tx.serialize()), Err(SpendError::Format(_))));
    }

    #[test]
    fn test_varint_widths() {
        let cases: [(u64, &[u8]); 7] = [
            (0, &[0x00]),
            (0xfc, &[0xfc]),
            (0xfd, &[0xfd, 0xfd, 0x00]),
            (0xffff, &[0xfd, 0xff, 0xff]),
            (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0xffff_ffff, &[0xfe, 0xff, 0xff, 0xff, 0xff]),
            (0x1_0000_0000, &[0xff, 0, 0, 0, 0, 1, 0, 0, 0]),
        ];
        for (n, expected) in cases {
            let mut out = Vec::new();
            write_varint(&mut out, n);
            assert_eq!(out, expected);
            assert_eq!(varint_size(n), expected.len());
        }
    }

    #[test]
    fn test_txid_display_is_reversed() {
        let tx = sample_tx();
        let mut id = tx.txid();
        assert_eq!(id, double_sha256(&tx.serialize()));
        id.reverse();
        assert_eq!(tx.txid_hex(), hex::encode(id));
    }

    #[test]
    fn test_parse_checked() {
        let bytes = hex::decode(SIGNED_TX).unwrap();
        assert!(parse_checked(&bytes).is_ok());
    }
}
