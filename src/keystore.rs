//! Newline-delimited key files.
//!
//! Format: one URL-safe base64 key per line, oldest first. The last line is
//! the current key. Blank lines are ignored.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tessera_crypto::{KeyMaterial, RandomSource};
use tracing::info;

use crate::error::ConfigError;
use crate::keyring::KeyRing;

/// Mode for directories created to hold key files.
#[cfg(unix)]
const KEY_DIR_MODE: u32 = 0o750;

/// Mode for newly created key files.
#[cfg(unix)]
const KEY_FILE_MODE: u32 = 0o600;

pub fn parse_keys<K: KeyMaterial>(text: &str) -> Result<KeyRing<K>, ConfigError> {
    let keys = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, encoded)| {
            K::from_base64url(encoded).map_err(|source| ConfigError::KeyStoreEntry { line, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    KeyRing::new(keys)
}

pub fn render_keys<K: KeyMaterial>(ring: &KeyRing<K>) -> String {
    let snapshot = ring.snapshot();
    let mut out = String::new();
    for key in snapshot.oldest_first() {
        out.push_str(&key.to_base64url());
        out.push('\n');
    }
    out
}

/// Read the key file at `path`, creating it with one fresh key if absent.
pub fn load_or_create<K: KeyMaterial>(
    path: &Path,
    random: &dyn RandomSource,
) -> Result<KeyRing<K>, ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::KeyStore {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_key_dir(dir).map_err(io_err)?;
        }
        let key = K::generate(random).map_err(ConfigError::Entropy)?;
        let mut file = create_key_file(path).map_err(io_err)?;
        writeln!(file, "{}", key.to_base64url()).map_err(io_err)?;
        info!(path = %path.display(), "created key store");
    }

    let text = fs::read_to_string(path).map_err(io_err)?;
    parse_keys(&text)
}

/// Append `key` to the file at `path` and make it current in `ring`.
pub fn append_key<K: KeyMaterial>(
    path: &Path,
    ring: &KeyRing<K>,
    key: K,
) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::KeyStore {
        path: path.to_path_buf(),
        source,
    };

    let existing = fs::read_to_string(path).map_err(io_err)?;
    let mut file = OpenOptions::new().append(true).open(path).map_err(io_err)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        file.write_all(b"\n").map_err(io_err)?;
    }
    writeln!(file, "{}", key.to_base64url()).map_err(io_err)?;

    ring.push(key);
    Ok(())
}

#[cfg(unix)]
fn create_key_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(KEY_DIR_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_key_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn create_key_file(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(KEY_FILE_MODE)
        .open(path)
}

#[cfg(not(unix))]
fn create_key_file(path: &Path) -> std::io::Result<fs::File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
