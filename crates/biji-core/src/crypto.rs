//! secp256k1 key handling, legacy sighash and P2PKH signing.
//!
//! Keys are compressed SEC1 points. Signatures are deterministic (RFC 6979)
//! low-S ECDSA, DER-encoded with the sighash type byte appended.
//!
//! # Signing scheme
//!
//! The legacy `SIGHASH_ALL` digest for input `i` is the double-SHA256 of a
//! copy of the transaction in which every unlocking script is emptied and
//! input `i` carries the locking script of the output it spends, followed by
//! the sighash type as a little-endian `u32`. Because other inputs' scripts
//! are blanked, inputs can be signed independently in any order.

use rand::RngCore;
use ripemd::Ripemd160;
use secp256k1::{Message, SECP256K1, ecdsa};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::address::{Address, Network, decode_check};
use crate::constants::{COMPRESSED_PUBKEY_LEN, SIGHASH_ALL, WIF_COMPRESSED_FLAG};
use crate::error::CryptoError;
use crate::script::Script;
use crate::types::{Hash256, PubkeyHash, Transaction};

/// secp256k1 keypair.
///
/// The secret scalar is overwritten on drop. Debug output shows only the
/// public key.
pub struct KeyPair {
    secret: secp256k1::SecretKey,
    public: secp256k1::PublicKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            if let Ok(kp) = Self::from_secret_bytes(bytes) {
                return kp;
            }
        }
    }

    /// Create a keypair from a 32-byte big-endian scalar.
    ///
    /// Fails for zero and for values not below the curve order.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let secret =
            secp256k1::SecretKey::from_slice(&bytes).map_err(|_| CryptoError::InvalidSecretKey)?;
        let public = secp256k1::PublicKey::from_secret_key_global(&secret);
        Ok(Self { secret, public })
    }

    /// Raw secret scalar. Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public)
    }

    pub fn pubkey_hash(&self) -> PubkeyHash {
        self.public_key().pubkey_hash()
    }

    pub fn address(&self, network: Network) -> Address {
        Address::from_public_key(&self.public_key(), network)
    }

    /// The P2PKH locking script that this key can unlock.
    pub fn script_pubkey(&self) -> Script {
        Script::p2pkh(&self.pubkey_hash())
    }

    /// Sign a 32-byte digest, returning the DER-encoded signature.
    pub fn sign_digest(&self, digest: &Hash256) -> Vec<u8> {
        let msg = Message::from_digest(digest.0);
        SECP256K1
            .sign_ecdsa(&msg, &self.secret)
            .serialize_der()
            .to_vec()
    }

    /// Export as a compressed-key WIF string.
    pub fn to_wif(&self, network: Network) -> String {
        let mut payload = Vec::with_capacity(34);
        payload.push(network.wif_version());
        payload.extend_from_slice(&self.secret.secret_bytes());
        payload.push(WIF_COMPRESSED_FLAG);
        bs58::encode(payload).with_check().into_string()
    }

    /// Import a compressed-key WIF string.
    pub fn from_wif(s: &str) -> Result<(Self, Network), CryptoError> {
        let payload = decode_check(s).map_err(|e| CryptoError::InvalidWif(e.to_string()))?;
        let network = match payload.first() {
            Some(&v) if v == Network::Mainnet.wif_version() => Network::Mainnet,
            Some(&v) if v == Network::Testnet.wif_version() => Network::Testnet,
            Some(&v) => return Err(CryptoError::InvalidWif(format!("unknown version {v:#04x}"))),
            None => return Err(CryptoError::InvalidWif("empty payload".into())),
        };
        match payload.len() {
            34 if payload[33] == WIF_COMPRESSED_FLAG => {}
            33 => {
                return Err(CryptoError::InvalidWif(
                    "uncompressed keys are not supported".into(),
                ));
            }
            n => return Err(CryptoError::InvalidWif(format!("bad length {n}"))),
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&payload[1..33]);
        let kp = Self::from_secret_bytes(secret)?;
        Ok((kp, network))
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret,
            public: self.public,
        }
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Parse a 33-byte compressed SEC1 encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != COMPRESSED_PUBKEY_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    pub fn to_bytes(&self) -> [u8; 33] {
        self.0.serialize()
    }

    pub fn pubkey_hash(&self) -> PubkeyHash {
        hash160(&self.to_bytes())
    }

    /// Verify a DER signature over a 32-byte digest. High-S signatures are
    /// normalized before verification.
    pub fn verify(&self, digest: &Hash256, der: &[u8]) -> Result<(), CryptoError> {
        let mut sig = ecdsa::Signature::from_der(der).map_err(|_| CryptoError::InvalidSignature)?;
        sig.normalize_s();
        let msg = Message::from_digest(digest.0);
        SECP256K1
            .verify_ecdsa(&msg, &sig, &self.0)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// RIPEMD160(SHA256(data)).
pub fn hash160(data: &[u8]) -> PubkeyHash {
    let sha = Sha256::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(sha));
    PubkeyHash(out)
}

/// Compute the legacy signature hash for one input.
///
/// `script_code` is the locking script of the output the input spends.
/// Only `SIGHASH_ALL` is supported.
pub fn signing_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u8,
) -> Result<Hash256, CryptoError> {
    if input_index >= tx.inputs.len() {
        return Err(CryptoError::InputIndexOutOfBounds {
            index: input_index,
            len: tx.inputs.len(),
        });
    }
    if sighash_type != SIGHASH_ALL {
        return Err(CryptoError::UnsupportedSighashType(sighash_type));
    }

    let mut copy = tx.clone();
    for (i, input) in copy.inputs.iter_mut().enumerate() {
        input.script_sig = if i == input_index {
            script_code.clone()
        } else {
            Script::new()
        };
    }

    let mut data = copy.to_bytes();
    data.extend_from_slice(&(sighash_type as u32).to_le_bytes());
    Ok(Hash256::sha256d(&data))
}

/// Produce the unlocking script for one input without modifying `tx`.
///
/// `prev_script` must be the P2PKH locking script of `keypair`.
pub fn unlocking_script(
    tx: &Transaction,
    input_index: usize,
    prev_script: &Script,
    keypair: &KeyPair,
) -> Result<Script, CryptoError> {
    let expected = prev_script.p2pkh_hash().ok_or(CryptoError::NotP2pkh)?;
    if expected != keypair.pubkey_hash() {
        return Err(CryptoError::PubkeyHashMismatch);
    }
    let sighash = signing_hash(tx, input_index, prev_script, SIGHASH_ALL)?;
    let mut signature = keypair.sign_digest(&sighash);
    signature.push(SIGHASH_ALL);
    Ok(Script::p2pkh_unlock(
        &signature,
        &keypair.public_key().to_bytes(),
    ))
}

/// Sign a transaction input in place.
pub fn sign_input(
    tx: &mut Transaction,
    input_index: usize,
    prev_script: &Script,
    keypair: &KeyPair,
) -> Result<(), CryptoError> {
    let script_sig = unlocking_script(tx, input_index, prev_script, keypair)?;
    tx.inputs[input_index].script_sig = script_sig;
    Ok(())
}

/// Run the P2PKH check for one input against the locking script it spends.
///
/// Checks that:
/// 1. The unlocking script is exactly `<signature> <pubkey>`
/// 2. The signature carries `SIGHASH_ALL`
/// 3. HASH160 of the pubkey matches the locking script
/// 4. The ECDSA signature verifies against the recomputed sighash
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    prev_script: &Script,
) -> Result<(), CryptoError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(CryptoError::InputIndexOutOfBounds {
            index: input_index,
            len: tx.inputs.len(),
        })?;
    let expected = prev_script.p2pkh_hash().ok_or(CryptoError::NotP2pkh)?;

    let (sig, pubkey) = input
        .script_sig
        .p2pkh_unlock_parts()
        .ok_or(CryptoError::MalformedUnlockingScript)?;
    let (&hash_type, der) = sig.split_last().ok_or(CryptoError::InvalidSignature)?;
    if hash_type != SIGHASH_ALL {
        return Err(CryptoError::UnsupportedSighashType(hash_type));
    }

    let pk = PublicKey::from_bytes(pubkey)?;
    if pk.pubkey_hash() != expected {
        return Err(CryptoError::PubkeyHashMismatch);
    }

    let sighash = signing_hash(tx, input_index, prev_script, hash_type)?;
    pk.verify(&sighash, der)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutPoint, TxInput, TxOutput};

    fn key_one() -> KeyPair {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        KeyPair::from_secret_bytes(bytes).unwrap()
    }

    fn funding_tx(keypair: &KeyPair, n_inputs: usize) -> Transaction {
        Transaction {
            version: 1,
            inputs: (0..n_inputs)
                .map(|i| TxInput::unsigned(OutPoint::new(Hash256([i as u8 + 1; 32]), i as u32)))
                .collect(),
            outputs: vec![TxOutput {
                value: 60_000,
                script_pubkey: keypair.script_pubkey(),
            }],
            lock_time: 0,
        }
    }

    // --- KeyPair ---

    #[test]
    fn keypair_generate_unique() {
        assert_ne!(KeyPair::generate().public_key(), KeyPair::generate().public_key());
    }

    #[test]
    fn keypair_rejects_invalid_scalars() {
        assert_eq!(
            KeyPair::from_secret_bytes([0u8; 32]).unwrap_err(),
            CryptoError::InvalidSecretKey
        );
        assert_eq!(
            KeyPair::from_secret_bytes([0xff; 32]).unwrap_err(),
            CryptoError::InvalidSecretKey
        );
    }

    #[test]
    fn keypair_known_vector() {
        let kp = key_one();
        assert_eq!(
            kp.public_key().to_string(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            kp.pubkey_hash().to_string(),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(
            kp.address(Network::Mainnet).to_string(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
    }

    #[test]
    fn keypair_clone_and_debug() {
        let kp = KeyPair::generate();
        let kp2 = kp.clone();
        assert_eq!(kp, kp2);
        assert_eq!(kp.secret_bytes(), kp2.secret_bytes());

        let debug = format!("{kp:?}");
        assert!(debug.contains("public_key"));
        assert!(!debug.contains(&hex::encode(kp.secret_bytes())));
    }

    // --- WIF ---

    #[test]
    fn wif_known_vector() {
        let kp = key_one();
        assert_eq!(
            kp.to_wif(Network::Mainnet),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[test]
    fn wif_roundtrip_both_networks() {
        let kp = KeyPair::generate();
        for network in [Network::Mainnet, Network::Testnet] {
            let (back, net) = KeyPair::from_wif(&kp.to_wif(network)).unwrap();
            assert_eq!(back.secret_bytes(), kp.secret_bytes());
            assert_eq!(net, network);
        }
    }

    #[test]
    fn wif_rejects_uncompressed() {
        // Secret key 1, uncompressed mainnet WIF.
        let err = KeyPair::from_wif("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidWif(_)));
    }

    #[test]
    fn wif_rejects_address() {
        assert!(KeyPair::from_wif("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").is_err());
    }

    // --- PublicKey ---

    #[test]
    fn pubkey_from_bytes_roundtrip() {
        let pk = KeyPair::generate().public_key();
        assert_eq!(PublicKey::from_bytes(&pk.to_bytes()).unwrap(), pk);
    }

    #[test]
    fn pubkey_rejects_uncompressed_length() {
        assert_eq!(
            PublicKey::from_bytes(&[0x04; 65]),
            Err(CryptoError::InvalidPublicKey)
        );
        assert_eq!(PublicKey::from_bytes(&[0x05; 33]), Err(CryptoError::InvalidPublicKey));
    }

    #[test]
    fn pubkey_serde_hex() {
        let pk = key_one().public_key();
        let json = serde_json::to_string(&pk).unwrap();
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }

    // --- Sighash ---

    #[test]
    fn signing_hash_out_of_bounds() {
        let kp = key_one();
        let tx = funding_tx(&kp, 1);
        assert_eq!(
            signing_hash(&tx, 1, &kp.script_pubkey(), SIGHASH_ALL),
            Err(CryptoError::InputIndexOutOfBounds { index: 1, len: 1 })
        );
    }

    #[test]
    fn signing_hash_rejects_other_types() {
        let kp = key_one();
        let tx = funding_tx(&kp, 1);
        assert_eq!(
            signing_hash(&tx, 0, &kp.script_pubkey(), 0x02),
            Err(CryptoError::UnsupportedSighashType(0x02))
        );
    }

    #[test]
    fn signing_hash_differs_per_input() {
        let kp = key_one();
        let tx = funding_tx(&kp, 2);
        let script = kp.script_pubkey();
        assert_ne!(
            signing_hash(&tx, 0, &script, SIGHASH_ALL).unwrap(),
            signing_hash(&tx, 1, &script, SIGHASH_ALL).unwrap()
        );
    }

    #[test]
    fn signing_hash_ignores_existing_script_sigs() {
        let kp = key_one();
        let tx = funding_tx(&kp, 2);
        let mut signed = tx.clone();
        sign_input(&mut signed, 0, &kp.script_pubkey(), &kp).unwrap();
        assert_eq!(
            signing_hash(&tx, 1, &kp.script_pubkey(), SIGHASH_ALL).unwrap(),
            signing_hash(&signed, 1, &kp.script_pubkey(), SIGHASH_ALL).unwrap()
        );
    }

    // --- Sign / verify ---

    #[test]
    fn sign_and_verify() {
        let kp = key_one();
        let mut tx = funding_tx(&kp, 2);
        let script = kp.script_pubkey();
        sign_input(&mut tx, 0, &script, &kp).unwrap();
        sign_input(&mut tx, 1, &script, &kp).unwrap();
        verify_input(&tx, 0, &script).unwrap();
        verify_input(&tx, 1, &script).unwrap();
    }

    #[test]
    fn signature_layout() {
        let kp = key_one();
        let mut tx = funding_tx(&kp, 1);
        sign_input(&mut tx, 0, &kp.script_pubkey(), &kp).unwrap();
        let (sig, pk) = tx.inputs[0].script_sig.p2pkh_unlock_parts().unwrap();
        assert_eq!(sig[0], 0x30); // DER sequence
        assert_eq!(*sig.last().unwrap(), SIGHASH_ALL);
        assert_eq!(pk, &kp.public_key().to_bytes()[..]);
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = key_one();
        let mut a = funding_tx(&kp, 1);
        let mut b = funding_tx(&kp, 1);
        sign_input(&mut a, 0, &kp.script_pubkey(), &kp).unwrap();
        sign_input(&mut b, 0, &kp.script_pubkey(), &kp).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sign_with_wrong_key_rejected() {
        let owner = key_one();
        let other = KeyPair::generate();
        let mut tx = funding_tx(&owner, 1);
        assert_eq!(
            sign_input(&mut tx, 0, &owner.script_pubkey(), &other),
            Err(CryptoError::PubkeyHashMismatch)
        );
    }

    #[test]
    fn sign_requires_p2pkh_prev_script() {
        let kp = key_one();
        let mut tx = funding_tx(&kp, 1);
        assert_eq!(
            sign_input(&mut tx, 0, &Script::from_bytes(vec![0x51]), &kp),
            Err(CryptoError::NotP2pkh)
        );
    }

    #[test]
    fn verify_detects_tampered_output() {
        let kp = key_one();
        let mut tx = funding_tx(&kp, 1);
        sign_input(&mut tx, 0, &kp.script_pubkey(), &kp).unwrap();
        tx.outputs[0].value += 1;
        assert_eq!(
            verify_input(&tx, 0, &kp.script_pubkey()),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn verify_detects_wrong_prev_script() {
        let kp = key_one();
        let mut tx = funding_tx(&kp, 1);
        sign_input(&mut tx, 0, &kp.script_pubkey(), &kp).unwrap();
        let other = KeyPair::generate().script_pubkey();
        assert_eq!(
            verify_input(&tx, 0, &other),
            Err(CryptoError::PubkeyHashMismatch)
        );
    }

    #[test]
    fn verify_unsigned_input_malformed() {
        let kp = key_one();
        let tx = funding_tx(&kp, 1);
        assert_eq!(
            verify_input(&tx, 0, &kp.script_pubkey()),
            Err(CryptoError::MalformedUnlockingScript)
        );
    }

    // --- Fixed vectors ---

    fn key_two() -> KeyPair {
        let mut bytes = [0u8; 32];
        bytes[31] = 2;
        KeyPair::from_secret_bytes(bytes).unwrap()
    }

    /// Key one spends two outputs (genesis coinbase:0 and block 1 coinbase:1)
    /// paying 60_000 to key two and 39_000 back to itself.
    fn two_input_vector() -> Transaction {
        let prevouts = [
            ("4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b", 0),
            ("0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098", 1),
        ];
        Transaction {
            version: 1,
            inputs: prevouts
                .iter()
                .map(|(txid, index)| TxInput::unsigned(OutPoint::new(txid.parse().unwrap(), *index)))
                .collect(),
            outputs: vec![
                TxOutput {
                    value: 60_000,
                    script_pubkey: key_two().script_pubkey(),
                },
                TxOutput {
                    value: 39_000,
                    script_pubkey: key_one().script_pubkey(),
                },
            ],
            lock_time: 0,
        }
    }

    const VECTOR_UNSIGNED: &str = "01000000023ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a0000000000ffffffff982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e0100000000ffffffff0260ea0000000000001976a91406afd46bcdfd22ef94ac122aa11f241244a37ecc88ac58980000000000001976a914751e76e8199196d454941c45d1b3a323f1433bd688ac00000000";

    const VECTOR_SIGNED: &str = "01000000023ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a000000006b483045022100f721c6b3e02b1c43a31362a422ec4660cee7cd09da5e5e6267d50072f81b147a02200af241f775f3f452c2baa4eb019f6e53d2278de78d7a89581aebc01178e6504101210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ffffffff982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e010000006a47304402200fa1245dc8ac0ebf065003dd815a85c8305e085e88920081675e1748b7708015022044bb004eda937fc8de6234b013de69e06bde2c741a64a0eca63773942f3bb1c101210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ffffffff0260ea0000000000001976a91406afd46bcdfd22ef94ac122aa11f241244a37ecc88ac58980000000000001976a914751e76e8199196d454941c45d1b3a323f1433bd688ac00000000";

    #[test]
    fn rfc6979_signature_vector() {
        let digest = Hash256(Sha256::digest(b"Satoshi Nakamoto").into());
        assert_eq!(
            hex::encode(key_one().sign_digest(&digest)),
            "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8\
             02202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5"
        );
    }

    #[test]
    fn unsigned_vector_encoding() {
        assert_eq!(two_input_vector().to_hex(), VECTOR_UNSIGNED);
    }

    #[test]
    fn sighash_vector() {
        let tx = two_input_vector();
        let script = key_one().script_pubkey();
        assert_eq!(
            hex::encode(signing_hash(&tx, 0, &script, SIGHASH_ALL).unwrap().as_bytes()),
            "a3a6d163c8da1b474fe655944f5dfd76a599267bf65f8ef0a7a513b88b265a5d"
        );
        assert_eq!(
            hex::encode(signing_hash(&tx, 1, &script, SIGHASH_ALL).unwrap().as_bytes()),
            "97a76a1085ee4082a52c17478f9a73bb065348c224ea9fae8556eccf26bbf800"
        );
    }

    #[test]
    fn signed_vector() {
        let kp = key_one();
        let script = kp.script_pubkey();
        let mut tx = two_input_vector();
        sign_input(&mut tx, 0, &script, &kp).unwrap();
        sign_input(&mut tx, 1, &script, &kp).unwrap();
        assert_eq!(tx.to_hex(), VECTOR_SIGNED);
        assert_eq!(
            tx.txid().to_string(),
            "943e01339dcd827853995a313ccc8e3183730b1ca11a9ba8474ccf4131ce3ac0"
        );
        assert_eq!(Transaction::from_hex(VECTOR_SIGNED).unwrap(), tx);
    }

    #[test]
    fn genesis_coinbase_txid() {
        let tx = Transaction::from_hex(
            "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff\
             4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72\
             206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff\
             0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f\
             61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000",
        )
        .unwrap();
        assert_eq!(
            tx.txid().to_string(),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
    }

    #[test]
    fn hash160_empty_vector() {
        // RIPEMD160(SHA256("")) = b472a266d0bd89c13706a4132ccfb16f7c3b9fcb
        assert_eq!(
            hash160(b"").to_string(),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }
}
