//! Tests for the core crate.

use rand::Rng;
use rust_decimal_macros::dec;
use wallet_core::amount::xrp_to_drops;
use wallet_core::codec::TF_FULLY_CANONICAL_SIG;
use wallet_core::keys::{decode_seed, encode_seed, SEED_LENGTH};
use wallet_core::{
    derive_address, derive_keypair, is_valid_address, sign_payment, KeyAlgorithm,
    PaymentTransaction,
};

fn random_entropy() -> [u8; SEED_LENGTH] {
    let mut rng = rand::thread_rng();
    let mut entropy = [0u8; SEED_LENGTH];
    rng.fill(&mut entropy);
    entropy
}

/// Tests that random secrets of both families yield valid addresses.
#[test]
fn test_random_secrets_derive_valid_addresses() {
    for algorithm in [KeyAlgorithm::Secp256k1, KeyAlgorithm::Ed25519] {
        let entropy = random_entropy();
        let secret = encode_seed(&entropy, algorithm);

        // The secret decodes back to the same entropy
        let seed = decode_seed(&secret).unwrap();
        assert_eq!(seed.entropy, entropy);
        assert_eq!(seed.algorithm, algorithm);

        let keypair = derive_keypair(&secret).unwrap();
        assert_eq!(keypair.algorithm(), algorithm);
        assert!(is_valid_address(&keypair.address()));
        assert_eq!(keypair.address(), derive_address(keypair.public_key()));
    }
}

/// Tests the shape of the derived public keys.
#[test]
fn test_public_key_shapes() {
    let entropy = random_entropy();

    let secp = derive_keypair(&encode_seed(&entropy, KeyAlgorithm::Secp256k1)).unwrap();
    assert_eq!(secp.public_key().len(), 33);
    assert!(matches!(secp.public_key()[0], 0x02 | 0x03));

    let ed = derive_keypair(&encode_seed(&entropy, KeyAlgorithm::Ed25519)).unwrap();
    assert_eq!(ed.public_key().len(), 33);
    assert!(ed.public_key_hex().starts_with("ED"));

    // Same entropy, different families, different accounts
    assert_ne!(secp.address(), ed.address());
}

/// Tests that a corrupted address is rejected.
#[test]
fn test_corrupted_address_is_invalid() {
    let keypair = derive_keypair(&encode_seed(&random_entropy(), KeyAlgorithm::Secp256k1)).unwrap();
    let address = keypair.address();

    let mut chars: Vec<char> = address.chars().collect();
    let last = chars.len() - 1;
    chars[last] = if chars[last] == 'r' { 'p' } else { 'r' };
    let corrupted: String = chars.into_iter().collect();

    assert!(!is_valid_address(&corrupted));
    assert!(!is_valid_address(""));
    assert!(!is_valid_address("not an address"));
}

/// Tests that signing is deterministic for both key families.
#[test]
fn test_signing_is_deterministic() {
    for algorithm in [KeyAlgorithm::Secp256k1, KeyAlgorithm::Ed25519] {
        let keypair = derive_keypair(&encode_seed(&random_entropy(), algorithm)).unwrap();
        let destination = derive_keypair(&encode_seed(&random_entropy(), algorithm))
            .unwrap()
            .address();

        let tx = PaymentTransaction {
            account: keypair.address(),
            destination,
            destination_tag: None,
            amount_drops: xrp_to_drops(dec!(12.5)).unwrap(),
            fee_drops: 12,
            sequence: 1,
            last_ledger_sequence: 1000,
            flags: TF_FULLY_CANONICAL_SIG,
        };

        let first = sign_payment(&tx, &keypair).unwrap();
        let second = sign_payment(&tx, &keypair).unwrap();
        assert_eq!(first, second);
        assert!(first.blob.contains(&keypair.public_key_hex()));
    }
}
