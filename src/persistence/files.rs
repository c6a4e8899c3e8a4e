use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and under the home directory
pub const DATA_DIR_NAME: &str = ".lifemaster";

/// Get the data directory - checks for a local .lifemaster first, then falls back to ~/.lifemaster
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find a local data directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure `dir` exists, creating it and any parents
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Initialize a local .lifemaster directory inside `parent`
pub fn init_local_data_dir(parent: &Path) -> Result<PathBuf> {
    let data_dir = parent.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Replace `path` with `content` through a sibling temp file, creating the
/// parent directory if needed. Readers see the old or the new file, never half.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent)?,
        _ => PathBuf::from("."),
    };

    let mut staged = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to stage a write in {}", dir.display()))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .with_context(|| format!("Failed to stage contents for {}", path.display()))?;

    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Read file content, `None` if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Copy `path` aside as `<stem>.bak.<timestamp>.<ext>`; `None` if there is nothing to copy
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let backup_path = path.with_extension(format!("bak.{}.{}", timestamp, extension));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to back up file: {}", path.display()))?;

    Ok(Some(backup_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), Some("{}".to_string()));

        atomic_write(&test_file, "{\"theme\":\"dark\"}").unwrap();
        assert_eq!(
            read_file(&test_file).unwrap(),
            Some("{\"theme\":\"dark\"}".to_string())
        );
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("reports").join("today.md");

        atomic_write(&test_file, "# Report").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), Some("# Report".to_string()));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.json");

        assert_eq!(read_file(&test_file).unwrap(), None);
    }

    #[test]
    fn test_backup_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("lifemaster-state.json");

        assert_eq!(backup_file(&test_file).unwrap(), None);

        atomic_write(&test_file, "{ broken").unwrap();
        let backup_path = backup_file(&test_file).unwrap().unwrap();

        assert_ne!(backup_path, test_file);
        assert!(backup_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("lifemaster-state.bak."));
        assert_eq!(read_file(&backup_path).unwrap(), Some("{ broken".to_string()));
    }

    #[test]
    fn test_init_local_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();

        let dir = init_local_data_dir(temp_dir.path()).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with(DATA_DIR_NAME));

        // A second init refuses to clobber
        assert!(init_local_data_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_find_local_data_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = init_local_data_dir(temp_dir.path()).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_data_dir(&nested), Some(data_dir));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("x").join("y");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
