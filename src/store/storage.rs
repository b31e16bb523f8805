use super::types::Gradebook;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the default gradebook path (~/.config/grade-calc/gradebook.json)
pub fn get_gradebook_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("gradebook.json"))
}

/// Load a gradebook from a JSON file
///
/// If the file doesn't exist, returns the seeded gradebook.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_gradebook(path: &Path) -> Result<Gradebook> {
    if !path.exists() {
        info!(path = %path.display(), "no gradebook yet, starting from the seeded course");
        return Ok(Gradebook::seeded());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open gradebook at {}", path.display()))?;

    let book: Gradebook = serde_json::from_reader(file).context("Failed to load gradebook")?;

    // Version check
    if book.version != 1 {
        anyhow::bail!("Unsupported gradebook version: {}", book.version);
    }

    Ok(book)
}

/// Save a gradebook to a JSON file atomically
///
/// Stamps `updated_at` and creates the parent directory if needed.
pub fn save_gradebook(path: &Path, book: &mut Gradebook) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    book.updated_at = Some(Utc::now());

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, book).context("Failed to serialize gradebook")?;

    file.commit().context("Failed to save gradebook")?;

    info!(
        path = %path.display(),
        students = book.students.len(),
        "gradebook saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grade;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_seeded() {
        let temp_path = env::temp_dir().join("grade_calc_test_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let book = load_gradebook(&temp_path).unwrap();
        assert_eq!(book.version, 1);
        assert_eq!(book.courses.len(), 1);
        assert!(book.students.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("grade_calc_test_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut book = Gradebook::seeded();
        let id = book.add_student("Avery Lee", "c_esports_1080").unwrap();
        book.set_grade(&id, "u2", Grade::Distinction).unwrap();
        book.toggle_lock(&id, "u2").unwrap();

        save_gradebook(&temp_path, &mut book).unwrap();
        assert!(book.updated_at.is_some());

        let loaded = load_gradebook(&temp_path).unwrap();
        let student = loaded.student(&id).unwrap();
        let result = student.result_for("u2").unwrap();
        assert_eq!(result.grade, Grade::Distinction);
        assert!(result.locked);
        assert_eq!(loaded.courses, book.courses);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version() {
        let temp_path = env::temp_dir().join("grade_calc_test_version.json");
        std::fs::write(&temp_path, r#"{"version": 2, "courses": [], "students": []}"#).unwrap();

        let err = load_gradebook(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported gradebook version"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
