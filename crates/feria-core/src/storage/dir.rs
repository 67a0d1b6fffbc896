use crate::storage::{RawValue, StorageBackend, StorageError};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const TMP_SUFFIX: &str = ".tmp";

///
/// DirBackend
///
/// File-per-key storage backend: each key becomes one file under the root
/// directory, with the key percent-encoded into a safe filename. Writes go
/// through a temp file and a rename so a crash never leaves a half-written
/// value behind.
///

#[derive(Debug)]
pub struct DirBackend {
    root: PathBuf,
}

impl DirBackend {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&e))?;

        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

impl StorageBackend for DirBackend {
    fn get(&self, key: &str) -> Result<Option<RawValue>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(RawValue::try_new(bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&e)),
        }
    }

    fn put(&self, key: &str, value: RawValue) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let tmp = self.root.join(format!("{}{TMP_SUFFIX}", encode_key(key)));

        fs::write(&tmp, value.as_bytes()).map_err(|e| StorageError::io(&e))?;
        fs::rename(&tmp, &target).map_err(|e| StorageError::io(&e))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.ends_with(TMP_SUFFIX) {
                continue;
            }
            if let Some(key) = decode_key(name) {
                keys.push(key);
            }
        }

        Ok(keys)
    }

    fn wipe(&self) -> Result<(), StorageError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&e))?;
            if entry.file_type().map_err(|e| StorageError::io(&e))?.is_file() {
                fs::remove_file(entry.path()).map_err(|e| StorageError::io(&e))?;
            }
        }

        Ok(())
    }
}

/// Percent-encode a key into a filename-safe form.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Reverse [`encode_key`]; `None` for filenames this backend never produced.
fn decode_key(name: &str) -> Option<String> {
    let mut out = Vec::with_capacity(name.len());
    let mut bytes = name.bytes();

    while let Some(byte) = bytes.next() {
        if byte == b'%' {
            let hi = bytes.next()?;
            let lo = bytes.next()?;
            let hex = [hi, lo];
            let hex = std::str::from_utf8(&hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
        } else {
            out.push(byte);
        }
    }

    String::from_utf8(out).ok()
}

///
/// TESTS
///
