use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use laterlock_core::crypto::SystemKey;

const SYSTEM_KEY_BYTES: usize = 32;

pub fn generate_key_bytes() -> anyhow::Result<Zeroizing<[u8; SYSTEM_KEY_BYTES]>> {
    let mut bytes = Zeroizing::new([0u8; SYSTEM_KEY_BYTES]);
    getrandom::getrandom(&mut bytes[..])
        .map_err(|e| anyhow::anyhow!("Failed to generate key bytes: {}", e))?;
    Ok(bytes)
}

pub fn key_bytes_to_secret(bytes: &[u8]) -> Zeroizing<String> {
    Zeroizing::new(STANDARD.encode(bytes))
}

/// Write a freshly generated system key. Refuses to replace an existing one,
/// since every system-key lock depends on it.
pub fn write_keyfile(path: &Path) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    if path.exists() {
        return Err(anyhow::anyhow!(
            "Keyfile already exists: {}",
            path.display()
        ));
    }
    let bytes = generate_key_bytes()?;
    let secret = key_bytes_to_secret(&bytes[..]);
    std::fs::write(path, secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write keyfile {}: {}", path.display(), e))?;
    set_file_permissions(path)?;
    Ok(())
}

pub fn read_system_key(path: &Path) -> anyhow::Result<SystemKey> {
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read keyfile {}: {}", path.display(), e))?,
    );
    SystemKey::new(contents.trim())
        .map_err(|e| anyhow::anyhow!("Invalid keyfile {}: {}", path.display(), e))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create keyfile directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    Ok(())
}

fn set_file_permissions(path: &Path) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyfile_written_once_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("system.key");

        write_keyfile(&path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first.len(), 44);
        assert!(read_system_key(&path).is_ok());

        assert!(write_keyfile(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[cfg(unix)]
    #[test]
    fn test_keyfile_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.key");
        write_keyfile(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_blank_keyfile_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.key");
        std::fs::write(&path, "  \n").unwrap();
        assert!(read_system_key(&path).is_err());
    }
}
