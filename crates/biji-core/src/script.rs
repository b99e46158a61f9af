//! Bitcoin scripts: P2PKH locking and unlocking templates, push encoding,
//! instruction iteration and ASM rendering.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ScriptError;
use crate::types::PubkeyHash;

pub mod opcodes {
    pub const OP_0: u8 = 0x00;
    pub const OP_PUSHDATA1: u8 = 0x4c;
    pub const OP_PUSHDATA2: u8 = 0x4d;
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_1: u8 = 0x51;
    pub const OP_16: u8 = 0x60;
    pub const OP_RETURN: u8 = 0x6a;
    pub const OP_DUP: u8 = 0x76;
    pub const OP_EQUAL: u8 = 0x87;
    pub const OP_EQUALVERIFY: u8 = 0x88;
    pub const OP_HASH160: u8 = 0xa9;
    pub const OP_CHECKSIG: u8 = 0xac;
    pub const OP_CHECKMULTISIG: u8 = 0xae;
}

use opcodes::*;

/// A raw script. Serialized as lowercase hex.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `OP_DUP OP_HASH160 <pubkey_hash> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn p2pkh(pubkey_hash: &PubkeyHash) -> Self {
        let mut script = Self(Vec::with_capacity(25));
        script.push_opcode(OP_DUP);
        script.push_opcode(OP_HASH160);
        script.push_slice(pubkey_hash.as_bytes());
        script.push_opcode(OP_EQUALVERIFY);
        script.push_opcode(OP_CHECKSIG);
        script
    }

    /// `<signature> <public key>`
    pub fn p2pkh_unlock(signature: &[u8], public_key: &[u8]) -> Self {
        let mut script = Self(Vec::with_capacity(signature.len() + public_key.len() + 2));
        script.push_slice(signature);
        script.push_slice(public_key);
        script
    }

    pub fn push_opcode(&mut self, opcode: u8) {
        self.0.push(opcode);
    }

    /// Append a data push using the shortest push opcode for its length.
    pub fn push_slice(&mut self, data: &[u8]) {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
    }

    /// The pubkey hash of a P2PKH locking script, or `None` for any other shape.
    pub fn p2pkh_hash(&self) -> Option<PubkeyHash> {
        let b = &self.0;
        if b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == 20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
        {
            let mut hash = [0u8; 20];
            hash.copy_from_slice(&b[3..23]);
            Some(PubkeyHash(hash))
        } else {
            None
        }
    }

    pub fn is_p2pkh(&self) -> bool {
        self.p2pkh_hash().is_some()
    }

    /// Split a `<signature> <public key>` unlocking script into its two pushes.
    pub fn p2pkh_unlock_parts(&self) -> Option<(&[u8], &[u8])> {
        let mut iter = self.instructions();
        let sig = match iter.next()? {
            Ok(Instruction::Push(data)) => data,
            _ => return None,
        };
        let pubkey = match iter.next()? {
            Ok(Instruction::Push(data)) => data,
            _ => return None,
        };
        if iter.next().is_some() {
            return None;
        }
        Some((sig, pubkey))
    }

    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            data: &self.0,
            pos: 0,
        }
    }

    /// Render as space-separated opcodes and hex pushes, e.g.
    /// `OP_DUP OP_HASH160 751e...3bd6 OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn to_asm(&self) -> String {
        let mut parts = Vec::new();
        for ins in self.instructions() {
            match ins {
                Ok(Instruction::Push(data)) if data.is_empty() => parts.push("OP_0".to_string()),
                Ok(Instruction::Push(data)) => parts.push(hex::encode(data)),
                Ok(Instruction::Op(op)) => parts.push(opcode_name(op)),
                Err(_) => {
                    parts.push("[error]".to_string());
                    break;
                }
            }
        }
        parts.join(" ")
    }
}

fn opcode_name(op: u8) -> String {
    let name = match op {
        OP_1NEGATE => "OP_1NEGATE",
        OP_RETURN => "OP_RETURN",
        OP_DUP => "OP_DUP",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_HASH160 => "OP_HASH160",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_1..=OP_16 => return format!("OP_{}", op - OP_1 + 1),
        _ => return format!("OP_UNKNOWN({op:#04x})"),
    };
    name.to_string()
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map(Self).map_err(serde::de::Error::custom)
    }
}

/// One decoded script element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// Data pushed by a direct push or an `OP_PUSHDATA*` opcode (`OP_0` pushes empty).
    Push(&'a [u8]),
    /// Any non-push opcode.
    Op(u8),
}

/// Iterator over the instructions of a [`Script`]. Stops after the first error.
#[derive(Debug)]
pub struct Instructions<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Instructions<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ScriptError> {
        if len > self.data.len() - self.pos {
            let offset = self.pos;
            self.pos = self.data.len();
            return Err(ScriptError::PushPastEnd { offset, len });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn take_len(&mut self, width: usize) -> Result<usize, ScriptError> {
        let bytes = self.take(width)?;
        let mut buf = [0u8; 4];
        buf[..width].copy_from_slice(bytes);
        Ok(u32::from_le_bytes(buf) as usize)
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let op = self.data[self.pos];
        self.pos += 1;
        let len = match op {
            OP_0 => return Some(Ok(Instruction::Push(&[]))),
            1..=0x4b => Ok(op as usize),
            OP_PUSHDATA1 => self.take_len(1),
            OP_PUSHDATA2 => self.take_len(2),
            OP_PUSHDATA4 => self.take_len(4),
            _ => return Some(Ok(Instruction::Op(op))),
        };
        Some(len.and_then(|len| self.take(len)).map(Instruction::Push))
    }
}
