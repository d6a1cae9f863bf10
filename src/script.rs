//! Pay-to-PubKey-Hash scripts and spend verification
//!
//! Only the standard pattern is recognized:
//! - scriptPubKey: `OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG`
//! - scriptSig: `<DER signature || sighash type> <public key>`
//!
//! There is no general opcode interpreter; any other script shape is rejected.

use crate::address::decode_address;
use crate::constants::*;
use crate::ec;
use crate::error::{Result, SpendError};
use crate::hash::{double_sha256, hash160};
use crate::transaction::serialized_size;
use crate::types::*;

const P2PKH_SCRIPT_LEN: usize = 25;

/// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh_script_pubkey(hash: &Hash160) -> ByteString {
    let mut script = Vec::with_capacity(P2PKH_SCRIPT_LEN);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    push_data(&mut script, hash);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// Locking script paying to a P2PKH address
pub fn script_pubkey_for_address(address: &str) -> Result<ByteString> {
    Ok(p2pkh_script_pubkey(&decode_address(address)?))
}

/// Public key hash embedded in a P2PKH scriptPubKey, if the script has that shape
pub fn p2pkh_hash(script: &[u8]) -> Option<Hash160> {
    if script.len() != P2PKH_SCRIPT_LEN
        || script[0] != OP_DUP
        || script[1] != OP_HASH160
        || script[2] != 20
        || script[23] != OP_EQUALVERIFY
        || script[24] != OP_CHECKSIG
    {
        return None;
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&script[3..23]);
    Some(hash)
}

/// `<signature> <public key>`; the signature already carries its sighash byte
pub fn p2pkh_script_sig(signature: &[u8], public_key: &[u8]) -> ByteString {
    let mut script = Vec::with_capacity(signature.len() + public_key.len() + 2);
    push_data(&mut script, signature);
    push_data(&mut script, public_key);
    script
}

/// Append a minimal push of `data`
pub fn push_data(script: &mut ByteString, data: &[u8]) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        script.push(len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// Split a push-only script into the pushed byte strings
pub fn parse_pushes(script: &[u8]) -> Result<Vec<ByteString>> {
    let mut pushes = Vec::new();
    let mut pos = 0;
    while pos < script.len() {
        let opcode = script[pos];
        pos += 1;
        let (len, width) = match opcode {
            0x01..=0x4b => (opcode as usize, 0),
            OP_PUSHDATA1 => (read_le(script, pos, 1)?, 1),
            OP_PUSHDATA2 => (read_le(script, pos, 2)?, 2),
            OP_PUSHDATA4 => (read_le(script, pos, 4)?, 4),
            other => {
                return Err(SpendError::ScriptInvalid(format!(
                    "Unexpected opcode 0x{:02x} in push-only script",
                    other
                )))
            }
        };
        pos += width;
        if len > script.len() - pos {
            return Err(SpendError::ScriptInvalid(
                "Push runs past the end of the script".to_string(),
            ));
        }
        pushes.push(script[pos..pos + len].to_vec());
        pos += len;
    }
    Ok(pushes)
}

fn read_le(script: &[u8], pos: usize, width: usize) -> Result<usize> {
    let bytes = script.get(pos..pos + width).ok_or_else(|| {
        SpendError::ScriptInvalid("Truncated push length".to_string())
    })?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize))
}

/// SIGHASH_ALL digest for signing input `input_index`.
///
/// The signed input carries `prev_script`, every other input an empty script, and the
/// serialization is followed by the 4-byte hash type before double SHA-256.
pub fn signature_hash(tx: &Transaction, input_index: usize, prev_script: &[u8]) -> Result<Hash> {
    if input_index >= tx.inputs.len() {
        return Err(SpendError::ScriptInvalid(format!(
            "Input {} does not exist",
            input_index
        )));
    }
    let mut unsigned = tx.clone();
    for (i, input) in unsigned.inputs.iter_mut().enumerate() {
        input.script_sig = if i == input_index {
            prev_script.to_vec()
        } else {
            Vec::new()
        };
    }
    let mut preimage = Vec::with_capacity(serialized_size(&unsigned) + 4);
    preimage.extend_from_slice(&unsigned.serialize());
    preimage.extend_from_slice(&(SIGHASH_ALL as u32).to_le_bytes());
    Ok(double_sha256(&preimage))
}

/// VerifySpend: 𝒮𝒞 × 𝒯𝒳 → {ok, ScriptInvalid}
///
/// For the first input of `spending_tx` spending an output locked by `prev_script`:
/// 1. scriptSig must be exactly `<sig || SIGHASH_ALL> <pubkey>`
/// 2. hash160(pubkey) must equal the hash in `prev_script`
/// 3. sig must be a valid ECDSA signature of the SIGHASH_ALL digest under pubkey
pub fn verify(prev_script: &[u8], spending_tx: &Transaction) -> Result<()> {
    let expected_hash = p2pkh_hash(prev_script).ok_or_else(|| {
        SpendError::ScriptInvalid("Spent output is not a standard P2PKH script".to_string())
    })?;
    let input = spending_tx.inputs.first().ok_or_else(|| {
        SpendError::ScriptInvalid("Transaction has no inputs".to_string())
    })?;

    let pushes = parse_pushes(&input.script_sig)?;
    let (signature, public_key) = match pushes.as_slice() {
        [signature, public_key] => (signature, public_key),
        _ => {
            return Err(SpendError::ScriptInvalid(format!(
                "Expected signature and public key in scriptSig, found {} pushes",
                pushes.len()
            )))
        }
    };

    if hash160(public_key) != expected_hash {
        return Err(SpendError::ScriptInvalid(
            "Public key hash does not match spent output".to_string(),
        ));
    }

    let (hash_type, der) = signature.split_last().ok_or_else(|| {
        SpendError::ScriptInvalid("Empty signature".to_string())
    })?;
    if *hash_type != SIGHASH_ALL {
        return Err(SpendError::ScriptInvalid(format!(
            "Unsupported signature hash type 0x{:02x}",
            hash_type
        )));
    }
    let signature = ec::decode_der(der)
        .map_err(|e| SpendError::ScriptInvalid(e.to_string()))?;

    let sighash = signature_hash(spending_tx, 0, prev_script)?;
    if !ec::verify(&sighash, &signature, public_key) {
        return Err(SpendError::ScriptInvalid("Signature is invalid".to_string()));
    }
    Ok(())
}
