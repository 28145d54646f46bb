//! Signing pipeline on top of the SDK's binary codec and keypairs
//!
//! The flow matches what rippled expects for a locally signed blob:
//! 1. set `SigningPubKey`
//! 2. encode for signing (the SDK adds the `STX\0` prefix and skips `TxnSignature`)
//! 3. sign those bytes with the wallet's private key
//! 4. add `TxnSignature` and encode the full transaction
//! 5. hash the blob with SHA-512Half and the `TXN\0` prefix

use serde_json::{Map, Value};
use sha2::{Digest, Sha512};
use xrpl::core::binarycodec;
use xrpl::core::keypairs;

use crate::error::LedgerError;
use crate::wallet::Wallet;

/// Prefix rippled uses when hashing a signed transaction (`TXN\0`)
const TRANSACTION_ID_PREFIX: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// A transaction ready for `submit`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Hex-encoded binary transaction
    pub tx_blob: String,
    /// Transaction identifier (upper-case hex)
    pub hash: String,
    /// The JSON that was encoded, including the signature
    pub tx_json: Value,
}

/// Encode a transaction for single signing and return the raw bytes
pub fn encode_for_signing(tx: &Value) -> Result<Vec<u8>, LedgerError> {
    let encoded = binarycodec::encode_for_signing(tx)
        .map_err(|e| LedgerError::sdk("encode for signing", e))?;
    hex::decode(encoded.as_str())
        .map_err(|e| LedgerError::sdk("decode signing payload", e))
}

/// Encode a (signed) transaction into its hex blob
pub fn encode(tx: &Value) -> Result<String, LedgerError> {
    let encoded = binarycodec::encode(tx).map_err(|e| LedgerError::sdk("encode", e))?;
    Ok(encoded.to_uppercase())
}

/// Sign a transaction JSON object with `wallet`
///
/// The transaction's `Account` must be the wallet's address. Any previous
/// signature is replaced.
pub fn sign(tx: Value, wallet: &Wallet) -> Result<SignedTransaction, LedgerError> {
    let mut fields = into_object(tx)?;

    match fields.get("Account").and_then(Value::as_str) {
        Some(account) if account == wallet.classic_address => {}
        Some(account) => {
            return Err(LedgerError::InvalidTransaction(format!(
                "Account {} cannot be signed by wallet {}",
                account, wallet.classic_address
            )))
        }
        None => {
            return Err(LedgerError::InvalidTransaction(
                "Transaction has no Account".to_string(),
            ))
        }
    }

    fields.remove("TxnSignature");
    fields.insert(
        "SigningPubKey".to_string(),
        Value::String(wallet.public_key.clone()),
    );
    let mut tx_json = Value::Object(fields);

    let signing_payload = encode_for_signing(&tx_json)?;
    let signature = keypairs::sign(&signing_payload, wallet.private_key())
        .map_err(|e| LedgerError::sdk("sign", e))?;

    tx_json["TxnSignature"] = Value::String(signature.to_string().to_uppercase());

    let tx_blob = encode(&tx_json)?;
    let hash = transaction_hash(&tx_blob)?;

    log::debug!("Signed transaction {} ({} bytes)", hash, tx_blob.len() / 2);

    Ok(SignedTransaction {
        tx_blob,
        hash,
        tx_json,
    })
}

/// SHA-512Half of `TXN\0 || blob`, as rippled computes transaction IDs
pub fn transaction_hash(tx_blob: &str) -> Result<String, LedgerError> {
    let blob = hex::decode(tx_blob)
        .map_err(|e| LedgerError::InvalidTransaction(format!("Blob is not hex: {}", e)))?;

    let mut hasher = Sha512::new();
    hasher.update(TRANSACTION_ID_PREFIX);
    hasher.update(&blob);
    let digest = hasher.finalize();

    Ok(hex::encode_upper(&digest[..32]))
}

fn into_object(tx: Value) -> Result<Map<String, Value>, LedgerError> {
    match tx {
        Value::Object(fields) => Ok(fields),
        other => Err(LedgerError::InvalidTransaction(format!(
            "Transaction must be a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE_SEED: &str = "sEdSmpmt3DbU42EgsxVrToBqcA6bn3P";

    fn sample_payment(account: &str) -> Value {
        json!({
            "Account": account,
            "TransactionType": "Payment",
            "Amount": "20",
            "Destination": "rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz",
            "Flags": 0,
            "Fee": "12",
            "Sequence": 1801574,
        })
    }

    #[test]
    fn test_sign_payment() {
        let wallet = Wallet::from_seed(SAMPLE_SEED).unwrap();
        let signed = sign(sample_payment(&wallet.classic_address), &wallet).unwrap();

        // TransactionType (UInt16, field 2) = Payment (0)
        assert!(signed.tx_blob.starts_with("120000"));
        assert_eq!(signed.hash.len(), 64);
        assert_eq!(signed.hash, transaction_hash(&signed.tx_blob).unwrap());
        assert_eq!(signed.tx_json["SigningPubKey"], json!(wallet.public_key));
        assert!(signed.tx_json["TxnSignature"].as_str().is_some());
    }

    #[test]
    fn test_sign_payment_known_vector() {
        // Payment of 20 drops, Fee 12, Sequence 1801574, signed with the sample seed
        const BLOB: &str = "120000220000000024001B7D6661400000000000001468400000000000000C\
            7321EDE8772C93F581C71CDD40060551BDC4053DBA9B06CAA09B2DD5BAFE8C2D96E68B\
            744047C0D71220C97574260B13001C213C42897840C3B2420151B88FED1A4F00DF8EB9\
            FE9EE7DAC027FB1D44F0E78FE70A6F4E9EE540CBC79A520EA0FD4A00588400\
            811452FC04F731565DEB4A2CBC78FC9989F37A339606\
            83140D9A051AEEB10CEA8D5F8E6BF87E1EA29D7F02E6";
        const HASH: &str = "EECF27BA52F02BEE2DB3ECE543D8E25CE4C17E54E985C0B8E7C43A11B7B3C4C8";

        let wallet = Wallet::from_seed(SAMPLE_SEED).unwrap();
        let signed = sign(sample_payment(&wallet.classic_address), &wallet).unwrap();

        assert_eq!(signed.tx_blob, BLOB);
        assert_eq!(signed.hash, HASH);
        assert_eq!(transaction_hash(BLOB).unwrap(), HASH);
    }

    #[test]
    fn test_signing_is_deterministic_for_ed25519() {
        let wallet = Wallet::from_seed(SAMPLE_SEED).unwrap();
        let a = sign(sample_payment(&wallet.classic_address), &wallet).unwrap();
        let b = sign(sample_payment(&wallet.classic_address), &wallet).unwrap();
        assert_eq!(a.tx_blob, b.tx_blob);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_signing_payload_excludes_signature() {
        let wallet = Wallet::from_seed(SAMPLE_SEED).unwrap();
        let signed = sign(sample_payment(&wallet.classic_address), &wallet).unwrap();

        let unsigned = {
            let mut tx = signed.tx_json.clone();
            tx.as_object_mut().unwrap().remove("TxnSignature");
            tx
        };
        assert_eq!(
            encode_for_signing(&signed.tx_json).unwrap(),
            encode_for_signing(&unsigned).unwrap()
        );
        // STX\0 prefix
        assert_eq!(&encode_for_signing(&unsigned).unwrap()[..4], &[0x53, 0x54, 0x58, 0x00]);
    }

    #[test]
    fn test_sign_rejects_foreign_account() {
        let wallet = Wallet::from_seed(SAMPLE_SEED).unwrap();
        let tx = sample_payment("rpNvHzENX8S2Bgx4dyCEcpqrb912QvRdoz");
        assert!(matches!(
            sign(tx, &wallet),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert!(sign(json!(["Payment"]), &wallet).is_err());
    }

    #[test]
    fn test_transaction_hash_rejects_non_hex() {
        assert!(transaction_hash("zz").is_err());
        assert_eq!(transaction_hash("").unwrap().len(), 64);
    }
}
