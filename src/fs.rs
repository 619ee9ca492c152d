//! File system utilities.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Creates `dir` (and parents) and restricts it to the owner where supported.
///
/// Failing to tighten permissions is not an error.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    set_mode(dir, 0o700);
    Ok(())
}

/// Writes content to a file atomically using a temp file and rename.
///
/// The temp file is created next to the target so the rename stays on one
/// filesystem. On Unix the file is created with mode 0600, so the content
/// is never readable by other users, not even briefly.
pub fn atomic_write_private(file_path: &Path, content: &str) -> Result<()> {
    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = file_path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    let mut file = open_private(&temp_path)
        .with_context(|| format!("Failed to write file: {}", temp_path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", temp_path.display()))?;
    file.sync_all().ok();
    drop(file);

    fs::rename(&temp_path, file_path)
        .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
    set_mode(file_path, 0o600);

    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        tracing::debug!(path = %path.display(), error = %e, "could not restrict permissions");
    }
}

#[cfg(not(unix))]
const fn set_mode(_path: &Path, _mode: u32) {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.json");

        atomic_write_private(&file_path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.json");

        fs::write(&file_path, "Original content").unwrap();
        atomic_write_private(&file_path, "New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "New content");
    }

    #[test]
    fn test_atomic_write_no_temp_file_remains() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.json");

        atomic_write_private(&file_path, "content").unwrap();

        assert!(!temp_dir.path().join(".config.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("openrouter-cli");
        ensure_private_dir(&dir).unwrap();
        let file_path = dir.join("config.json");
        atomic_write_private(&file_path, "{}").unwrap();

        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }
}
