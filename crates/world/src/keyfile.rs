//! On-disk artifacts: World files, the signing key file pair and
//! identity-public text files.
//!
//! # Permissions
//!
//! - World file: 0o644 (world-readable, served to clients)
//! - Signing key files: 0o640 (owner read/write, group read)

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ztworld_crypto::SigningKeyPair;

use crate::error::WorldResult;
use crate::world::World;

/// Key that signed the current World.
pub const PREVIOUS_KEY_FILE: &str = "previous.key";

/// Key the next World revision must be signed by.
pub const CURRENT_KEY_FILE: &str = "current.key";

const WORLD_FILE_MODE: u32 = 0o644;
const KEY_FILE_MODE: u32 = 0o640;

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn write_with_mode(path: &Path, bytes: &[u8], mode: u32) -> std::io::Result<()> {
    ensure_parent_dir(path)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    // The open mode is filtered by the umask and ignored for existing files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

/// Write final World bytes.
pub fn write_world(path: &Path, bytes: &[u8]) -> WorldResult<()> {
    write_with_mode(path, bytes, WORLD_FILE_MODE)?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "wrote world file");
    Ok(())
}

/// Read and decode a World file.
pub fn read_world(path: &Path) -> WorldResult<World> {
    let bytes = fs::read(path)?;
    World::decode(&bytes)
}

/// Write the previous/current signing key pair into `dir`.
pub fn write_signing_keys(
    dir: &Path,
    previous: &SigningKeyPair,
    current: &SigningKeyPair,
) -> WorldResult<(PathBuf, PathBuf)> {
    let previous_path = dir.join(PREVIOUS_KEY_FILE);
    let current_path = dir.join(CURRENT_KEY_FILE);

    write_with_mode(&previous_path, &previous.to_bytes(), KEY_FILE_MODE)?;
    write_with_mode(&current_path, &current.to_bytes(), KEY_FILE_MODE)?;

    tracing::debug!(dir = %dir.display(), "wrote signing key files");
    Ok((previous_path, current_path))
}

/// Read the previous/current signing key pair from `dir`.
pub fn read_signing_keys(dir: &Path) -> WorldResult<(SigningKeyPair, SigningKeyPair)> {
    let previous = SigningKeyPair::from_bytes(&fs::read(dir.join(PREVIOUS_KEY_FILE))?)?;
    let current = SigningKeyPair::from_bytes(&fs::read(dir.join(CURRENT_KEY_FILE))?)?;
    Ok((previous, current))
}

/// Read a raw identity-public text file.
pub fn read_identity_public(path: &Path) -> WorldResult<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}
