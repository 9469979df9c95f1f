//! Secrets, keypairs, and classic addresses.
//!
//! Secrets and addresses are base58check strings over the ledger's own alphabet.
//! A secret encodes 16 bytes of seed entropy, from which either a secp256k1 or an
//! Ed25519 keypair is derived; the address is the RIPEMD-160 of the SHA-256 of the
//! public key.

use crate::errors::CoreError;
use crate::types::AccountId;
use byteorder::{BigEndian, ByteOrder};
use ed25519_dalek::Signer;
use ripemd::Ripemd160;
use secp256k1::{Message, PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use tracing::debug;

/// Version byte of a classic address.
const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Version byte of a secp256k1 family seed.
const FAMILY_SEED_VERSION: u8 = 0x21;

/// Version prefix of an Ed25519 seed.
const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];

/// Marker byte in front of an Ed25519 public key.
const ED25519_KEY_PREFIX: u8 = 0xED;

/// Length of seed entropy in bytes.
pub const SEED_LENGTH: usize = 16;

/// The signature scheme a keypair uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// ECDSA over secp256k1, the ledger's default
    Secp256k1,
    /// EdDSA over Curve25519
    Ed25519,
}

/// Seed entropy decoded from a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    /// The raw entropy
    pub entropy: [u8; SEED_LENGTH],
    /// The key family the seed belongs to
    pub algorithm: KeyAlgorithm,
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// The first half of a SHA-512 digest.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

fn checksum(payload: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(payload));
    let mut check = [0u8; 4];
    check.copy_from_slice(&digest[..4]);
    check
}

fn encode_check(payload: &[u8]) -> String {
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&checksum(payload));
    bs58::encode(bytes)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

fn decode_check(text: &str) -> Result<Vec<u8>, String> {
    let bytes = bs58::decode(text)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| e.to_string())?;

    if bytes.len() < 5 {
        return Err("too short".to_string());
    }

    let (payload, check) = bytes.split_at(bytes.len() - 4);
    if checksum(payload).as_slice() != check {
        return Err("checksum mismatch".to_string());
    }

    Ok(payload.to_vec())
}

/// Decodes a secret into its seed entropy.
pub fn decode_seed(secret: &str) -> Result<Seed, CoreError> {
    let payload = decode_check(secret.trim()).map_err(CoreError::InvalidSecret)?;

    let (algorithm, entropy) = if payload.len() == SEED_LENGTH + 1
        && payload[0] == FAMILY_SEED_VERSION
    {
        (KeyAlgorithm::Secp256k1, &payload[1..])
    } else if payload.len() == SEED_LENGTH + ED25519_SEED_PREFIX.len()
        && payload.starts_with(&ED25519_SEED_PREFIX)
    {
        (KeyAlgorithm::Ed25519, &payload[ED25519_SEED_PREFIX.len()..])
    } else {
        return Err(CoreError::InvalidSecret(
            "not a secp256k1 or ed25519 seed".to_string(),
        ));
    };

    let mut seed = [0u8; SEED_LENGTH];
    seed.copy_from_slice(entropy);
    Ok(Seed {
        entropy: seed,
        algorithm,
    })
}

/// Encodes seed entropy as a secret.
pub fn encode_seed(entropy: &[u8; SEED_LENGTH], algorithm: KeyAlgorithm) -> String {
    let mut payload = match algorithm {
        KeyAlgorithm::Secp256k1 => vec![FAMILY_SEED_VERSION],
        KeyAlgorithm::Ed25519 => ED25519_SEED_PREFIX.to_vec(),
    };
    payload.extend_from_slice(entropy);
    encode_check(&payload)
}

/// Computes the account identifier of a public key.
pub fn account_id(public_key: &[u8]) -> AccountId {
    let digest = Ripemd160::digest(Sha256::digest(public_key));
    let mut id = [0u8; 20];
    id.copy_from_slice(&digest);
    id
}

/// Encodes an account identifier as a classic address.
pub fn encode_account_id(id: &AccountId) -> String {
    let mut payload = vec![ACCOUNT_ID_VERSION];
    payload.extend_from_slice(id);
    encode_check(&payload)
}

/// Decodes a classic address into its account identifier.
pub fn decode_address(address: &str) -> Result<AccountId, CoreError> {
    let payload = decode_check(address)
        .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", address, e)))?;

    if payload.len() != 21 || payload[0] != ACCOUNT_ID_VERSION {
        return Err(CoreError::InvalidAddress(address.to_string()));
    }

    let mut id = [0u8; 20];
    id.copy_from_slice(&payload[1..]);
    Ok(id)
}

/// Whether a string is a well-formed classic address.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Derives the classic address of a public key.
pub fn derive_address(public_key: &[u8]) -> String {
    encode_account_id(&account_id(public_key))
}

enum SigningKey {
    Secp256k1(SecretKey),
    Ed25519([u8; 32]),
}

/// A keypair derived from a secret.
pub struct Keypair {
    algorithm: KeyAlgorithm,
    public_key: Vec<u8>,
    signing_key: SigningKey,
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Derives the keypair a secret stands for.
pub fn derive_keypair(secret: &str) -> Result<Keypair, CoreError> {
    let seed = decode_seed(secret)?;
    let keypair = match seed.algorithm {
        KeyAlgorithm::Secp256k1 => derive_secp256k1(&seed.entropy)?,
        KeyAlgorithm::Ed25519 => derive_ed25519(&seed.entropy)?,
    };
    debug!("Derived {:?} keypair {}", keypair.algorithm, keypair.public_key_hex());
    Ok(keypair)
}

/// Finds the first SHA-512-half of `bytes` (and an optional discriminator)
/// that is a valid secp256k1 scalar.
fn derive_scalar(bytes: &[u8], discriminator: Option<u32>) -> Result<SecretKey, CoreError> {
    let mut word = [0u8; 4];
    for counter in 0..=u32::MAX {
        let mut hasher = Sha512::new();
        hasher.update(bytes);
        if let Some(discriminator) = discriminator {
            BigEndian::write_u32(&mut word, discriminator);
            hasher.update(word);
        }
        BigEndian::write_u32(&mut word, counter);
        hasher.update(word);

        let digest = hasher.finalize();
        if let Ok(scalar) = SecretKey::from_slice(&digest[..32]) {
            return Ok(scalar);
        }
    }
    Err(CoreError::KeyDerivation(
        "no valid scalar for seed".to_string(),
    ))
}

fn derive_secp256k1(entropy: &[u8; SEED_LENGTH]) -> Result<Keypair, CoreError> {
    let secp = Secp256k1::new();

    let root = derive_scalar(entropy, None)?;
    let root_public = PublicKey::from_secret_key(&secp, &root);

    // Account index 0 of the root generator
    let intermediate = derive_scalar(&root_public.serialize(), Some(0))?;
    let tweak = Scalar::from_be_bytes(intermediate.secret_bytes())
        .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;
    let private = root
        .add_tweak(&tweak)
        .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;
    let public = PublicKey::from_secret_key(&secp, &private);

    Ok(Keypair {
        algorithm: KeyAlgorithm::Secp256k1,
        public_key: public.serialize().to_vec(),
        signing_key: SigningKey::Secp256k1(private),
    })
}

fn derive_ed25519(entropy: &[u8; SEED_LENGTH]) -> Result<Keypair, CoreError> {
    let private = sha512_half(entropy);
    let secret = ed25519_dalek::SecretKey::from_bytes(&private)
        .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;
    let public = ed25519_dalek::PublicKey::from(&secret);

    let mut public_key = vec![ED25519_KEY_PREFIX];
    public_key.extend_from_slice(public.as_bytes());

    Ok(Keypair {
        algorithm: KeyAlgorithm::Ed25519,
        public_key,
        signing_key: SigningKey::Ed25519(private),
    })
}

impl Keypair {
    /// The signature scheme of this keypair.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// The public key as it appears in a transaction's `SigningPubKey`.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The public key, uppercase hex encoded.
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(&self.public_key)
    }

    /// The classic address controlled by this keypair.
    pub fn address(&self) -> String {
        derive_address(&self.public_key)
    }

    /// Signs a message.
    ///
    /// secp256k1 keys sign the SHA-512-half of the message and return a DER
    /// encoded, low-S signature. Ed25519 keys sign the message itself.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        match &self.signing_key {
            SigningKey::Secp256k1(key) => {
                let secp = Secp256k1::signing_only();
                let digest = Message::from_slice(&sha512_half(message))
                    .map_err(|e| CoreError::Signing(e.to_string()))?;
                let signature = secp.sign_ecdsa(&digest, key);
                Ok(signature.serialize_der().to_vec())
            }
            SigningKey::Ed25519(private) => {
                let secret = ed25519_dalek::SecretKey::from_bytes(private)
                    .map_err(|e| CoreError::Signing(e.to_string()))?;
                let public = ed25519_dalek::PublicKey::from(&secret);
                let keypair = ed25519_dalek::Keypair { secret, public };
                Ok(keypair.sign(message).to_bytes().to_vec())
            }
        }
    }
}
