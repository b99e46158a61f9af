//! Seed generation, master-key derivation and the wallet key ring.
//!
//! Each new key is the BIP-32 master key of a fresh 192-bit random seed:
//! HMAC-SHA512 keyed with `"Bitcoin seed"`, left half as the secret scalar.
//! No child derivation is performed; the key ring is a flat list of
//! independent keys, persisted one lowercase hex secret per line.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

use biji_core::address::{Address, Network};
use biji_core::crypto::KeyPair;
use tracing::{debug, info};

use crate::error::WalletError;

/// Seed length in bytes (192 bits).
pub const SEED_LEN: usize = 24;

/// HMAC key for BIP-32 master-key derivation.
const MASTER_KEY_HMAC_KEY: &[u8] = b"Bitcoin seed";

type HmacSha512 = Hmac<Sha512>;

/// A 192-bit random seed.
///
/// Secret material is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; SEED_LEN],
}

impl Seed {
    /// Generate a random seed from the OS cryptographic RNG.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; SEED_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self { bytes }
    }

    /// Get the raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }

    /// Derive the master keypair of this seed.
    pub fn master_key(&self) -> Result<KeyPair, WalletError> {
        master_key_from_seed(&self.bytes)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// BIP-32 master key: the left 32 bytes of HMAC-SHA512("Bitcoin seed", seed).
///
/// A left half that is zero or not below the curve order is an error.
pub fn master_key_from_seed(seed: &[u8]) -> Result<KeyPair, WalletError> {
    let mut mac = HmacSha512::new_from_slice(MASTER_KEY_HMAC_KEY)
        .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
    mac.update(seed);
    let mut digest = mac.finalize().into_bytes();

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&digest[..32]);
    digest.as_mut_slice().zeroize();

    let result = KeyPair::from_secret_bytes(secret)
        .map_err(|_| WalletError::InvalidKey("derived master key is out of range".into()));
    secret.zeroize();
    result
}

/// The wallet's owned keys, in insertion order.
///
/// Order is significant: coin selection visits addresses in this order and
/// the first key's address is the default change address.
pub struct KeyRing {
    keys: Vec<KeyPair>,
    network: Network,
}

impl KeyRing {
    /// Create an empty key ring for `network`.
    pub fn new(network: Network) -> Self {
        Self {
            keys: Vec::new(),
            network,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[KeyPair] {
        &self.keys
    }

    /// Generate a key from a fresh random seed and add it.
    pub fn generate_key(&mut self) -> Result<Address, WalletError> {
        let kp = Seed::generate().master_key()?;
        Ok(self.import(kp))
    }

    /// Add an existing keypair. Adding a key already present is a no-op.
    pub fn import(&mut self, kp: KeyPair) -> Address {
        let address = kp.address(self.network);
        if self.contains(&address) {
            debug!(%address, "key already in key ring");
        } else {
            info!(%address, "key added");
            self.keys.push(kp);
        }
        address
    }

    /// Import a compressed-key WIF string for this ring's network.
    pub fn import_wif(&mut self, wif: &str) -> Result<Address, WalletError> {
        let (kp, network) = KeyPair::from_wif(wif)?;
        if network != self.network {
            return Err(WalletError::InvalidKey(format!(
                "WIF key is for {network}, wallet is on {}",
                self.network
            )));
        }
        Ok(self.import(kp))
    }

    /// Addresses of all owned keys, in key order.
    pub fn addresses(&self) -> Vec<Address> {
        self.keys.iter().map(|k| k.address(self.network)).collect()
    }

    /// Address of the first owned key.
    pub fn first_address(&self) -> Option<Address> {
        self.keys.first().map(|k| k.address(self.network))
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.key_for_address(address).is_some()
    }

    /// The key whose address is `address`, if owned.
    pub fn key_for_address(&self, address: &Address) -> Option<&KeyPair> {
        if address.network() != self.network {
            return None;
        }
        let hash = address.pubkey_hash();
        self.keys.iter().find(|k| k.pubkey_hash() == hash)
    }

    /// Load a key file: one lowercase hex secret per line, blank lines ignored.
    ///
    /// A missing file yields an empty key ring. Any malformed line fails the
    /// whole load with its 1-based line number.
    pub fn load(path: &Path, network: Network) -> Result<Self, WalletError> {
        let mut ring = Self::new(network);
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no key file, starting with an empty wallet");
                return Ok(ring);
            }
            Err(e) => return Err(WalletError::KeyFile(format!("{}: {e}", path.display()))),
        };

        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let kp = parse_secret_hex(line)
                .map_err(|reason| WalletError::KeyFile(format!("line {}: {reason}", i + 1)))?;
            ring.import(kp);
        }
        info!(path = %path.display(), keys = ring.len(), "key file loaded");
        Ok(ring)
    }

    /// Write every key to `path`, one hex secret per line.
    ///
    /// The parent directory is created if needed. The new contents replace
    /// the file in a single rename, and on Unix the result always has mode
    /// 0600, even when an existing file was more permissive.
    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let io_err = |e: std::io::Error| WalletError::KeyFile(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut contents = String::with_capacity(self.keys.len() * 65);
        for kp in &self.keys {
            let mut secret = kp.secret_bytes();
            contents.push_str(&hex::encode(secret));
            contents.push('\n');
            secret.zeroize();
        }
        let result = write_private(path, contents.as_bytes()).map_err(io_err);
        contents.zeroize();
        result?;

        info!(path = %path.display(), keys = self.keys.len(), "key file saved");
        Ok(())
    }
}

fn parse_secret_hex(line: &str) -> Result<KeyPair, String> {
    let bytes = hex::decode(line).map_err(|e| format!("invalid hex: {e}"))?;
    let mut secret: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))?;
    let kp = KeyPair::from_secret_bytes(secret).map_err(|e| e.to_string());
    secret.zeroize();
    kp
}

/// Write `data` to a temporary file beside `path`, then rename it over
/// `path`. The old file stays intact until the rename succeeds.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("network", &self.network)
            .field("keys", &self.keys.len())
            .finish()
    }
}
