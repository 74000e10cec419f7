//! Output directory preparation.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

/// Creates the output directory if missing. With `cleanup`, removes the
/// regular files already inside it; subdirectories are left alone.
///
/// Returns the number of files removed.
pub fn prepare_output_dir(dir: &Path, cleanup: bool) -> io::Result<usize> {
    if !dir.exists() {
        info!(dir = %dir.display(), "creating schedule directory");
        fs::create_dir_all(dir)?;
        return Ok(0);
    }

    if !cleanup {
        return Ok(0);
    }

    info!(dir = %dir.display(), "cleaning up");
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_and_cleans() {
        let dir = std::env::temp_dir().join(format!("u-timetable-output-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(prepare_output_dir(&dir, true).unwrap(), 0);
        assert!(dir.is_dir());

        fs::write(dir.join("schedule1.txt"), "old").unwrap();
        fs::write(dir.join("schedule2.json"), "old").unwrap();
        fs::create_dir(dir.join("keep")).unwrap();

        assert_eq!(prepare_output_dir(&dir, false).unwrap(), 0);
        assert!(dir.join("schedule1.txt").exists());

        assert_eq!(prepare_output_dir(&dir, true).unwrap(), 2);
        assert!(!dir.join("schedule1.txt").exists());
        assert!(dir.join("keep").is_dir());

        fs::remove_dir_all(&dir).unwrap();
    }
}
