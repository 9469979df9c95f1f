//! Binary encoding and signing of native-currency payments.
//!
//! Fields are written in canonical order (by type code, then field code), each
//! preceded by its field id. Blobs and account ids carry a length prefix.

use crate::amount::MAX_DROPS;
use crate::errors::CoreError;
use crate::keys::{decode_address, sha512_half, Keypair};
use crate::types::SignedTransaction;
use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `TransactionType` value of a payment.
pub const TX_TYPE_PAYMENT: u16 = 0;

/// Requires a fully canonical signature.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// Prefix hashed in front of a transaction being signed (`STX\0`).
const PREFIX_TX_SIGN: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Prefix hashed in front of a signed transaction to obtain its id (`TXN\0`).
const PREFIX_TX_ID: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

const TYPE_UINT16: u8 = 1;
const TYPE_UINT32: u8 = 2;
const TYPE_AMOUNT: u8 = 6;
const TYPE_BLOB: u8 = 7;
const TYPE_ACCOUNT: u8 = 8;

const FIELD_TRANSACTION_TYPE: u8 = 2;
const FIELD_FLAGS: u8 = 2;
const FIELD_SEQUENCE: u8 = 4;
const FIELD_DESTINATION_TAG: u8 = 14;
const FIELD_LAST_LEDGER_SEQUENCE: u8 = 27;
const FIELD_AMOUNT: u8 = 1;
const FIELD_FEE: u8 = 8;
const FIELD_SIGNING_PUB_KEY: u8 = 3;
const FIELD_TXN_SIGNATURE: u8 = 4;
const FIELD_ACCOUNT: u8 = 1;
const FIELD_DESTINATION: u8 = 3;

/// Bit marking a native amount as positive.
const NATIVE_POSITIVE: u64 = 0x4000_0000_0000_0000;

/// A native-currency payment with everything needed to sign it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// The sending account
    pub account: String,
    /// The receiving account
    pub destination: String,
    /// Optional tag identifying the recipient at the destination
    pub destination_tag: Option<u32>,
    /// The amount to deliver, in drops
    pub amount_drops: u64,
    /// The fee, in drops
    pub fee_drops: u64,
    /// The sending account's next sequence number
    pub sequence: u32,
    /// The last ledger the transaction may be included in
    pub last_ledger_sequence: u32,
    /// Transaction flags
    pub flags: u32,
}

fn write_field_id(out: &mut Vec<u8>, type_code: u8, field_code: u8) {
    match (type_code < 16, field_code < 16) {
        (true, true) => out.push(type_code << 4 | field_code),
        (true, false) => {
            out.push(type_code << 4);
            out.push(field_code);
        }
        (false, true) => {
            out.push(field_code);
            out.push(type_code);
        }
        (false, false) => {
            out.push(0);
            out.push(type_code);
            out.push(field_code);
        }
    }
}

fn write_u16(out: &mut Vec<u8>, field_code: u8, value: u16) {
    write_field_id(out, TYPE_UINT16, field_code);
    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, value);
    out.extend_from_slice(&buf);
}

fn write_u32(out: &mut Vec<u8>, field_code: u8, value: u32) {
    write_field_id(out, TYPE_UINT32, field_code);
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

fn write_native_amount(out: &mut Vec<u8>, field_code: u8, drops: u64) -> Result<(), CoreError> {
    if drops > MAX_DROPS {
        return Err(CoreError::InvalidAmount(format!(
            "{} drops is out of range",
            drops
        )));
    }
    write_field_id(out, TYPE_AMOUNT, field_code);
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, drops | NATIVE_POSITIVE);
    out.extend_from_slice(&buf);
    Ok(())
}

fn write_length_prefix(out: &mut Vec<u8>, length: usize) -> Result<(), CoreError> {
    match length {
        0..=192 => out.push(length as u8),
        193..=12480 => {
            let length = length - 193;
            out.push(193 + (length >> 8) as u8);
            out.push((length & 0xFF) as u8);
        }
        12481..=918744 => {
            let length = length - 12481;
            out.push(241 + (length >> 16) as u8);
            out.push(((length >> 8) & 0xFF) as u8);
            out.push((length & 0xFF) as u8);
        }
        _ => {
            return Err(CoreError::Signing(format!(
                "field of {} bytes is too long to encode",
                length
            )))
        }
    }
    Ok(())
}

fn write_blob(out: &mut Vec<u8>, field_code: u8, bytes: &[u8]) -> Result<(), CoreError> {
    write_field_id(out, TYPE_BLOB, field_code);
    write_length_prefix(out, bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_account(out: &mut Vec<u8>, field_code: u8, address: &str) -> Result<(), CoreError> {
    let id = decode_address(address)?;
    write_field_id(out, TYPE_ACCOUNT, field_code);
    write_length_prefix(out, id.len())?;
    out.extend_from_slice(&id);
    Ok(())
}

impl PaymentTransaction {
    /// Serializes the payment in canonical field order.
    ///
    /// The signature is omitted when `signature` is `None`, which yields the
    /// bytes that get signed.
    pub fn serialize(&self, signing_pub_key: &[u8], signature: Option<&[u8]>) -> Result<Vec<u8>, CoreError> {
        let mut out = Vec::with_capacity(256);

        write_u16(&mut out, FIELD_TRANSACTION_TYPE, TX_TYPE_PAYMENT);
        write_u32(&mut out, FIELD_FLAGS, self.flags);
        write_u32(&mut out, FIELD_SEQUENCE, self.sequence);
        if let Some(tag) = self.destination_tag {
            write_u32(&mut out, FIELD_DESTINATION_TAG, tag);
        }
        write_u32(&mut out, FIELD_LAST_LEDGER_SEQUENCE, self.last_ledger_sequence);
        write_native_amount(&mut out, FIELD_AMOUNT, self.amount_drops)?;
        write_native_amount(&mut out, FIELD_FEE, self.fee_drops)?;
        write_blob(&mut out, FIELD_SIGNING_PUB_KEY, signing_pub_key)?;
        if let Some(signature) = signature {
            write_blob(&mut out, FIELD_TXN_SIGNATURE, signature)?;
        }
        write_account(&mut out, FIELD_ACCOUNT, &self.account)?;
        write_account(&mut out, FIELD_DESTINATION, &self.destination)?;

        Ok(out)
    }
}

/// Signs a payment with the keypair of its sending account.
pub fn sign_payment(tx: &PaymentTransaction, keypair: &Keypair) -> Result<SignedTransaction, CoreError> {
    if keypair.address() != tx.account {
        return Err(CoreError::Signing(format!(
            "secret controls {}, not {}",
            keypair.address(),
            tx.account
        )));
    }

    let unsigned = tx.serialize(keypair.public_key(), None)?;
    let mut message = PREFIX_TX_SIGN.to_vec();
    message.extend_from_slice(&unsigned);
    let signature = keypair.sign(&message)?;

    let signed = tx.serialize(keypair.public_key(), Some(signature.as_slice()))?;
    let mut id_source = PREFIX_TX_ID.to_vec();
    id_source.extend_from_slice(&signed);
    let hash = hex::encode_upper(sha512_half(&id_source));
    debug!("Signed payment {} ({} bytes)", hash, signed.len());

    Ok(SignedTransaction {
        blob: hex::encode_upper(signed),
        hash,
    })
}
