// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store with sealed values.
//!
//! The file is a flat JSON object. Every value is stored as
//! `base64(value) "." hex(HMAC-SHA256(key || 0x00 || value))` with the MAC key
//! derived from the configured secret via HKDF, so a truncated, hand-edited or
//! swapped value is detected on read instead of being trusted.

use super::{KeyValueStore, StoreError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const HKDF_SALT: &[u8] = b"tipfeed-secure-store";
const HKDF_INFO: &[u8] = b"value-mac-v1";

/// Durable store persisted as a single JSON file.
pub struct FileSecureStore {
    path: PathBuf,
    mac_key: [u8; 32],
    /// Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl FileSecureStore {
    /// Open (or lazily create) a store at `path`.
    pub fn new<P: AsRef<Path>>(path: P, secret: &[u8]) -> Result<Self, StoreError> {
        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), secret);
        let mut mac_key = [0u8; 32];
        hk.expand(HKDF_INFO, &mut mac_key)
            .map_err(|e| StoreError::Io(format!("key derivation failed: {}", e)))?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            mac_key,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tag(&self, key: &str, value: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut mac = HmacSha256::new_from_slice(&self.mac_key)
            .map_err(|e| StoreError::Io(format!("HMAC init failed: {}", e)))?;
        mac.update(key.as_bytes());
        mac.update(&[0]);
        mac.update(value);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn seal(&self, key: &str, value: &str) -> Result<String, StoreError> {
        let tag = self.tag(key, value.as_bytes())?;
        Ok(format!("{}.{}", BASE64.encode(value), hex::encode(tag)))
    }

    fn unseal(&self, key: &str, sealed: &str) -> Result<String, StoreError> {
        let integrity = || StoreError::Integrity {
            key: key.to_string(),
        };

        let (payload_b64, tag_hex) = sealed.rsplit_once('.').ok_or_else(integrity)?;
        let payload = BASE64.decode(payload_b64).map_err(|_| integrity())?;
        let provided = hex::decode(tag_hex).map_err(|_| integrity())?;
        let expected = self.tag(key, &payload)?;

        if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            tracing::warn!(key, "Stored value failed integrity check");
            return Err(integrity());
        }

        String::from_utf8(payload).map_err(|_| integrity())
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    /// Replace the file atomically: write a sibling temp file, then rename.
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(map).map_err(|e| StoreError::Io(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<bool, StoreError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // A corrupt file is replaced rather than blocking every future write.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Corrupt(reason)) => {
                tracing::warn!(path = %self.path.display(), reason = %reason, "Discarding corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        if f(&mut map)? {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileSecureStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.read_map()?;
        map.get(key).map(|sealed| self.unseal(key, sealed)).transpose()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let sealed = self.seal(key, value)?;
        self.update(|map| {
            map.insert(key.to_string(), sealed);
            Ok(true)
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.update(|map| Ok(map.remove(key).is_some()))
    }
}
