// File: src/persistence.rs
use crate::error::Result;
use crate::progress::ProgressLog;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes the progress log atomically: encode into a temp file beside the
/// destination, then rename over it.
pub fn save_to_disk(progress: &ProgressLog, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, progress)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    log::debug!("Saved progress to {}", path.display());
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<ProgressLog> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let progress = bincode::deserialize_from(reader)?;
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ChallengeSummary;

    #[test]
    fn progress_survives_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.bin");

        let mut progress = ProgressLog::new();
        progress.record(&ChallengeSummary {
            display: "猫".to_string(),
            phonetic: "ねこ".to_string(),
            typed: "neko".to_string(),
            keystrokes: 5,
            mistakes: 1,
        });
        save_to_disk(&progress, &path).unwrap();

        let loaded = load_from_disk(&path).unwrap();
        assert_eq!(loaded.completed(), 1);
        assert_eq!(loaded.best_for("ねこ").unwrap().typed, "neko");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_disk(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, crate::error::TypingError::Io(_)));
    }
}
