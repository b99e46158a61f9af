//! Cross-checks against the `bitcoin` crate: wire encoding, txids, legacy
//! sighashes, signatures, addresses and WIF keys.

use biji_core::address::{Address, Network};
use biji_core::constants::SIGHASH_ALL;
use biji_core::crypto::{KeyPair, signing_hash};
use biji_core::script::Script;
use biji_core::types::{Hash256, OutPoint, PubkeyHash, Transaction, TxInput, TxOutput};
use biji_tests::helpers::*;
use biji_wallet::{Destination, SelectionPolicy, SendOperation};
use bitcoin::address::NetworkUnchecked;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use proptest::prelude::*;

fn reference_tx(tx: &Transaction) -> bitcoin::Transaction {
    bitcoin::consensus::deserialize(&tx.to_bytes()).expect("reference decode")
}

fn reference_script(script: &Script) -> bitcoin::ScriptBuf {
    bitcoin::ScriptBuf::from_bytes(script.as_bytes().to_vec())
}

fn reference_sighash(tx: &bitcoin::Transaction, index: usize, script_code: &Script) -> [u8; 32] {
    SighashCache::new(tx)
        .legacy_signature_hash(index, &reference_script(script_code), EcdsaSighashType::All.to_u32())
        .expect("input index in range")
        .to_byte_array()
}

fn reference_address(address: &Address) -> bitcoin::Address {
    address
        .to_string()
        .parse::<bitcoin::Address<NetworkUnchecked>>()
        .expect("reference parse")
        .require_network(bitcoin::Network::Testnet)
        .expect("testnet address")
}

#[test]
fn wallet_send_matches_reference() {
    let (keys, history) = funded_ring(&[30_000, 45_000]);
    let oracle = MockOracle::new(history);
    let to = recipient();
    let change = keys.first_address().unwrap();
    let prev_script = change.script_pubkey();

    let mut send = SendOperation::new(&keys, SelectionPolicy::OracleOrder);
    send.add_destination(Destination::new(to, 60_000).unwrap()).unwrap();
    let signed = send.prepare(&oracle).unwrap().clone();
    let tx = signed.transaction();

    let btx = reference_tx(tx);
    assert_eq!(btx.input.len(), 2);
    assert_eq!(bitcoin::consensus::serialize(&btx), tx.to_bytes());
    assert_eq!(btx.compute_txid().to_string(), signed.txid().to_string());

    let secp = Secp256k1::verification_only();
    for (i, input) in btx.input.iter().enumerate() {
        assert_eq!(
            input.previous_output.txid.to_string(),
            tx.inputs[i].previous_output.txid.to_string()
        );

        let sighash = reference_sighash(&btx, i, &prev_script);
        assert_eq!(
            signing_hash(tx, i, &prev_script, SIGHASH_ALL).unwrap(),
            Hash256(sighash)
        );

        let (sig, pubkey) = tx.inputs[i].script_sig.p2pkh_unlock_parts().unwrap();
        let sig = bitcoin::ecdsa::Signature::from_slice(sig).unwrap();
        assert_eq!(sig.sighash_type, EcdsaSighashType::All);
        let pubkey = bitcoin::PublicKey::from_slice(pubkey).unwrap();
        secp.verify_ecdsa(&Message::from_digest(sighash), &sig.signature, &pubkey.inner)
            .unwrap();
        assert_eq!(
            bitcoin::Address::p2pkh(pubkey, bitcoin::Network::Testnet).script_pubkey(),
            reference_script(&prev_script)
        );
    }

    assert_eq!(btx.output.len(), 2);
    assert_eq!(btx.output[0].value.to_sat(), 60_000);
    assert_eq!(btx.output[0].script_pubkey, reference_address(&to).script_pubkey());
    assert_eq!(btx.output[1].value.to_sat(), 15_000);
    assert_eq!(btx.output[1].script_pubkey, reference_address(&change).script_pubkey());
}

#[test]
fn signatures_match_reference_signer() {
    let (keys, history) = funded_ring(&[80_000]);
    let oracle = MockOracle::new(history);
    let mut send = SendOperation::new(&keys, SelectionPolicy::OracleOrder);
    send.add_destination(Destination::new(recipient(), 50_000).unwrap()).unwrap();
    let tx = send.prepare(&oracle).unwrap().transaction().clone();

    let key = &keys.keys()[0];
    let secret = bitcoin::secp256k1::SecretKey::from_slice(&key.secret_bytes()).unwrap();
    let sighash = reference_sighash(&reference_tx(&tx), 0, &key.script_pubkey());
    let mut expected = Secp256k1::signing_only()
        .sign_ecdsa(&Message::from_digest(sighash), &secret)
        .serialize_der()
        .to_vec();
    expected.push(SIGHASH_ALL);

    let (sig, _) = tx.inputs[0].script_sig.p2pkh_unlock_parts().unwrap();
    assert_eq!(sig, &expected[..]);
}

#[test]
fn wif_and_address_match_reference() {
    let kp = KeyPair::generate();
    let wif = kp.to_wif(Network::Testnet);

    let reference = bitcoin::PrivateKey::from_wif(&wif).unwrap();
    assert!(reference.compressed);
    assert_eq!(reference.network, bitcoin::NetworkKind::Test);
    assert_eq!(reference.inner.secret_bytes(), kp.secret_bytes());

    let pubkey = reference.public_key(&Secp256k1::new());
    assert_eq!(pubkey.to_bytes(), kp.public_key().to_bytes().to_vec());
    assert_eq!(
        bitcoin::Address::p2pkh(pubkey, bitcoin::Network::Testnet).to_string(),
        kp.address(Network::Testnet).to_string()
    );
    assert_eq!(
        bitcoin::Address::p2pkh(pubkey, bitcoin::Network::Bitcoin).to_string(),
        kp.address(Network::Mainnet).to_string()
    );
}

// --- Arbitrary transactions ---

fn arb_input() -> impl Strategy<Value = TxInput> {
    (
        any::<[u8; 32]>(),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..80),
        any::<u32>(),
    )
        .prop_map(|(txid, index, script_sig, sequence)| TxInput {
            previous_output: OutPoint::new(Hash256(txid), index),
            script_sig: Script::from_bytes(script_sig),
            sequence,
        })
}

fn arb_output() -> impl Strategy<Value = TxOutput> {
    (0u64..2_100_000_000_000_000, prop::collection::vec(any::<u8>(), 0..40)).prop_map(
        |(value, script)| TxOutput {
            value,
            script_pubkey: Script::from_bytes(script),
        },
    )
}

fn arb_tx() -> impl Strategy<Value = Transaction> {
    (
        1u32..3,
        prop::collection::vec(arb_input(), 1..5),
        prop::collection::vec(arb_output(), 1..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
}

proptest! {
    #[test]
    fn encoding_and_txid_match_reference(tx in arb_tx()) {
        let btx = reference_tx(&tx);
        prop_assert_eq!(bitcoin::consensus::serialize(&btx), tx.to_bytes());
        prop_assert_eq!(btx.compute_txid().to_string(), tx.txid().to_string());
    }

    #[test]
    fn sighash_matches_reference(
        tx in arb_tx(),
        index in any::<prop::sample::Index>(),
        hash in any::<[u8; 20]>(),
    ) {
        let i = index.index(tx.inputs.len());
        let script_code = Script::p2pkh(&PubkeyHash(hash));
        let expected = reference_sighash(&reference_tx(&tx), i, &script_code);
        prop_assert_eq!(
            signing_hash(&tx, i, &script_code, SIGHASH_ALL).unwrap(),
            Hash256(expected)
        );
    }
}
