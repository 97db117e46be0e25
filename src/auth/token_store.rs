//! Where the bearer credential lives between runs.
//!
//! The OS keyring holds it when available. Otherwise (headless Linux, CI, or
//! `SSTS_DISABLE_KEYRING=1`) it is sealed with ChaCha20-Poly1305 into
//! `credential.sealed` next to a per-install `credential.key`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::TryRngCore;
use tracing::debug;

use crate::app_dirs;

const KEYRING_SERVICE: &str = "ssts";
const KEYRING_USER: &str = "access_token";
const SEALED_FILE: &str = "credential.sealed";
const KEY_FILE: &str = "credential.key";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
/// Set to `1` or `true` to keep the credential out of the OS keyring.
pub const DISABLE_KEYRING_ENV: &str = "SSTS_DISABLE_KEYRING";

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Credential file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Credential file is corrupt: {0}")]
    Corrupt(&'static str),
    #[error("Credential sealing failed")]
    Seal,
    #[error("No randomness available: {0}")]
    Random(String),
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Persisted access token. Cheap to clone; clones share the same slot.
#[derive(Clone, Debug)]
pub struct TokenStore {
    dir: PathBuf,
    keyring: bool,
}

impl TokenStore {
    /// Keyring first, sealed file under the app `secrets/` directory second.
    pub fn new() -> Result<Self, TokenStoreError> {
        Ok(Self {
            dir: app_dirs::secrets_dir()?,
            keyring: !keyring_disabled(),
        })
    }

    /// Sealed file in `dir` only.
    pub fn file_only(dir: &Path) -> Result<Self, TokenStoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            keyring: false,
        })
    }

    pub fn get(&self) -> Result<Option<String>, TokenStoreError> {
        if let Some(token) = self.keyring_entry().and_then(|entry| read_entry(&entry)) {
            return Ok(Some(token));
        }
        self.read_sealed()
    }

    /// Blank tokens are ignored.
    pub fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }
        if let Some(entry) = self.keyring_entry() {
            match entry.set_password(token) {
                Ok(()) => {
                    self.remove_sealed();
                    return Ok(());
                }
                Err(err) => debug!("Keyring write failed, sealing to file: {err}"),
            }
        }
        self.write_sealed(token)
    }

    /// Forget the token everywhere. Missing entries are not an error.
    pub fn delete(&self) -> Result<(), TokenStoreError> {
        if let Some(entry) = self.keyring_entry() {
            if let Err(err) = entry.delete_credential() {
                debug!("Keyring delete skipped: {err}");
            }
        }
        self.remove_sealed();
        Ok(())
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        if !self.keyring {
            return None;
        }
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
            .inspect_err(|err| debug!("Keyring unavailable: {err}"))
            .ok()
    }

    fn read_sealed(&self) -> Result<Option<String>, TokenStoreError> {
        let sealed = match fs::read(self.dir.join(SEALED_FILE)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if sealed.len() < NONCE_LEN {
            return Err(TokenStoreError::Corrupt("sealed token too short"));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = cipher(&fs::read(self.dir.join(KEY_FILE))?)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| TokenStoreError::Corrupt("sealed token does not match key"))?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|_| TokenStoreError::Corrupt("sealed token is not UTF-8"))
    }

    fn write_sealed(&self, token: &str) -> Result<(), TokenStoreError> {
        let key_path = self.dir.join(KEY_FILE);
        let key = if key_path.exists() {
            fs::read(&key_path)?
        } else {
            let key = random_bytes::<KEY_LEN>()?.to_vec();
            write_private(&key_path, &key)?;
            key
        };
        let nonce = random_bytes::<NONCE_LEN>()?;
        let ciphertext = cipher(&key)?
            .encrypt(Nonce::from_slice(&nonce), token.as_bytes())
            .map_err(|_| TokenStoreError::Seal)?;
        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        write_private(&self.dir.join(SEALED_FILE), &sealed)
    }

    fn remove_sealed(&self) {
        for name in [SEALED_FILE, KEY_FILE] {
            let path = self.dir.join(name);
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %path.display(), "Credential file not removed: {err}");
                }
            }
        }
    }
}

fn read_entry(entry: &keyring::Entry) -> Option<String> {
    match entry.get_password() {
        Ok(token) => Some(token),
        Err(keyring::Error::NoEntry) => None,
        Err(err) => {
            debug!("Keyring read failed, trying sealed file: {err}");
            None
        }
    }
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .is_ok_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}

fn cipher(key: &[u8]) -> Result<ChaCha20Poly1305, TokenStoreError> {
    if key.len() != KEY_LEN {
        return Err(TokenStoreError::Corrupt("key file has the wrong length"));
    }
    ChaCha20Poly1305::new_from_slice(key).map_err(|_| TokenStoreError::Seal)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], TokenStoreError> {
    let mut out = [0u8; N];
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| TokenStoreError::Random(err.to_string()))?;
    Ok(out)
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<(), TokenStoreError> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
