//! Cross-crate test suite for Biji.
//!
//! Drives key material, coin selection, building, signing and the send
//! state machine together against scripted oracles and gateways.

pub mod helpers;
