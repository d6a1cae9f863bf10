//! Single-input spend construction and spendable output lookup

use crate::address::decode_address;
use crate::amount::format_value;
use crate::constants::*;
use crate::ec;
use crate::error::{Result, SpendError};
use crate::hash::hash160;
use crate::script::{p2pkh_hash, p2pkh_script_pubkey, p2pkh_script_sig, script_pubkey_for_address, signature_hash};
use crate::types::*;

/// Index of the first output paying `address` whose value exceeds `fee`
pub fn find_spendable_output(tx: &Transaction, address: &str, fee: i64) -> Result<usize> {
    let hash = decode_address(address)?;
    let mut best_value = None;
    for (i, output) in tx.outputs.iter().enumerate() {
        if p2pkh_hash(&output.script_pubkey) != Some(hash) {
            continue;
        }
        if output.value > fee {
            return Ok(i);
        }
        best_value = best_value.max(Some(output.value));
    }
    Err(match best_value {
        Some(value) => SpendError::NotFound(format!(
            "Output to {} holds {} BTC, not enough to pay fee of {} BTC",
            address.trim(),
            format_value(value),
            format_value(fee)
        )),
        None => SpendError::NotFound(format!(
            "No output of this transaction pays to {}",
            address.trim()
        )),
    })
}

/// Build and sign a transaction moving output `spent_output_index` of `base_tx`,
/// minus `fee`, to `recipient_address`.
///
/// The result is not verified here; run `script::verify` against the spent output
/// before handing it on.
pub fn create_transaction(
    base_tx: &Transaction,
    spent_output_index: usize,
    recipient_address: &str,
    fee: i64,
    public_key: &[u8],
    private_scalar: &[u8; 32],
) -> Result<Transaction> {
    if fee < 0 {
        return Err(SpendError::InvalidAmount(format!("Negative fee {}", fee)));
    }
    let spent_output = base_tx.outputs.get(spent_output_index).ok_or_else(|| {
        SpendError::NotFound(format!(
            "Output {} does not exist in a transaction with {} outputs",
            spent_output_index,
            base_tx.outputs.len()
        ))
    })?;
    if fee >= spent_output.value {
        return Err(SpendError::InsufficientFunds(format!(
            "Fee {} BTC is not less than output value {} BTC",
            format_value(fee),
            format_value(spent_output.value)
        )));
    }

    let mut tx = Transaction {
        version: TX_VERSION,
        inputs: vec![TransactionInput {
            prevout: OutPoint {
                hash: base_tx.txid(),
                index: spent_output_index as u32,
            },
            script_sig: Vec::new(),
            sequence: SEQUENCE_FINAL,
        }],
        outputs: vec![TransactionOutput {
            value: spent_output.value - fee,
            script_pubkey: script_pubkey_for_address(recipient_address)?,
        }],
        lock_time: 0,
    };

    let sighash = signature_hash(&tx, 0, &spent_output.script_pubkey)?;
    let mut signature = ec::encode_der(&ec::sign(&sighash, private_scalar)?);
    signature.push(SIGHASH_ALL);
    tx.inputs[0].script_sig = p2pkh_script_sig(&signature, public_key);
    Ok(tx)
}

/// Locking script of the spent output expected for `public_key`
pub fn expected_script_pubkey(public_key: &[u8]) -> ByteString {
    p2pkh_script_pubkey(&hash160(public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::public_key_to_address;
    use crate::script::verify;

    const SCALAR: [u8; 32] = [0x11; 32];

    fn funded_tx(public_key: &[u8], values: &[i64]) -> Transaction {
        let mut outputs = vec![TransactionOutput {
            value: 777,
            script_pubkey: p2pkh_script_pubkey(&[0xee; 20]),
        }];
        for &value in values {
            outputs.push(TransactionOutput {
                value,
                script_pubkey: expected_script_pubkey(public_key),
            });
        }
        Transaction {
            version: 1,
            inputs: vec![TransactionInput {
                prevout: OutPoint { hash: [5; 32], index: 0 },
                script_sig: vec![],
                sequence: SEQUENCE_FINAL,
            }],
            outputs,
            lock_time: 0,
        }
    }

    #[test]
    fn test_find_spendable_output() {
        let public_key = ec::derive_public_key(&SCALAR, true).unwrap();
        let address = public_key_to_address(&public_key);
        let tx = funded_tx(&public_key, &[5_000, 50_000]);
        assert_eq!(find_spendable_output(&tx, &address, 1_000).unwrap(), 1);
        assert_eq!(find_spendable_output(&tx, &address, 5_000).unwrap(), 2);
        assert!(matches!(
            find_spendable_output(&tx, &address, 50_000),
            Err(SpendError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_spendable_output_other_address() {
        let public_key = ec::derive_public_key(&SCALAR, true).unwrap();
        let tx = funded_tx(&public_key, &[5_000]);
        let uncompressed = public_key_to_address(&ec::derive_public_key(&SCALAR, false).unwrap());
        assert!(matches!(
            find_spendable_output(&tx, &uncompressed, 0),
            Err(SpendError::NotFound(_))
        ));
        assert!(matches!(
            find_spendable_output(&tx, "garbage", 0),
            Err(SpendError::Address(_))
        ));
    }

    #[test]
    fn test_create_transaction_verifies() {
        let public_key = ec::derive_public_key(&SCALAR, false).unwrap();
        let base = funded_tx(&public_key, &[100_000]);
        let recipient = "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM";

        let spend = create_transaction(&base, 1, recipient, DEFAULT_FEE, &public_key, &SCALAR).unwrap();
        assert_eq!(spend.inputs.len(), 1);
        assert_eq!(spend.inputs[0].prevout, OutPoint { hash: base.txid(), index: 1 });
        assert_eq!(spend.outputs.len(), 1);
        assert_eq!(spend.outputs[0].value, 100_000 - DEFAULT_FEE);
        assert_eq!(spend.outputs[0].script_pubkey, script_pubkey_for_address(recipient).unwrap());
        assert_eq!(verify(&base.outputs[1].script_pubkey, &spend), Ok(()));
    }

    #[test]
    fn test_create_transaction_insufficient_funds() {
        let public_key = ec::derive_public_key(&SCALAR, true).unwrap();
        let base = funded_tx(&public_key, &[10_000]);
        let recipient = "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM";
        assert!(matches!(
            create_transaction(&base, 1, recipient, 10_000, &public_key, &SCALAR),
            Err(SpendError::InsufficientFunds(_))
        ));
        assert!(matches!(
            create_transaction(&base, 1, recipient, -1, &public_key, &SCALAR),
            Err(SpendError::InvalidAmount(_))
        ));
        assert!(matches!(
            create_transaction(&base, 9, recipient, 1, &public_key, &SCALAR),
            Err(SpendError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_transaction_bad_recipient() {
        let public_key = ec::derive_public_key(&SCALAR, true).unwrap();
        let base = funded_tx(&public_key, &[100_000]);
        assert!(create_transaction(&base, 1, "1111111111111111111214oLvT2", 1, &public_key, &SCALAR).is_err());
    }
}
