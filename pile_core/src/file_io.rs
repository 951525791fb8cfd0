//! # File I/O
//!
//! Case files are JSON documents with the `.pile` extension.
//!
//! - **Atomic saves**: write to `.pile.tmp`, sync, rename over the target
//! - **Version validation**: reject files written by an incompatible schema
//!
//! ```rust,no_run
//! use pile_core::file_io::{load_case, save_case};
//! use pile_core::project::PileCase;
//! use std::path::Path;
//!
//! let case = PileCase::demo();
//! save_case(&case, Path::new("demo.pile"))?;
//! let loaded = load_case(Path::new("demo.pile"))?;
//! # Ok::<(), pile_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::errors::{CalcError, CalcResult};
use crate::project::{PileCase, SCHEMA_VERSION};

/// Default extension of case files
pub const CASE_EXTENSION: &str = "pile";

/// Save a case with atomic write semantics.
///
/// The JSON goes to a sibling `.pile.tmp` file which is synced and then
/// renamed over `path`, so an interrupted save leaves the previous file intact.
pub fn save_case(case: &PileCase, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(case)?;
    let tmp_path = path.with_extension(format!("{}.tmp", CASE_EXTENSION));

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("saved case '{}' to {}", case.meta.name, path.display());
    Ok(())
}

/// Load a case and check its schema version.
pub fn load_case(path: &Path) -> CalcResult<PileCase> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let case: PileCase = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&case.meta.version)?;
    debug!("loaded case '{}' ({} layers)", case.meta.name, case.pile.layers.len());
    Ok(case)
}

/// Check that a file version can be read by this schema.
///
/// Major versions must match. Within 0.x a newer minor version is rejected.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_case_path(name: &str) -> PathBuf {
        temp_dir().join(format!("pile_core_test_{}.{}", name, CASE_EXTENSION))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_case_path("roundtrip");
        let case = PileCase::demo();
        save_case(&case, &path).unwrap();

        let loaded = load_case(&path).unwrap();
        assert_eq!(loaded.meta, case.meta);
        assert_eq!(loaded.pile.layers.len(), 2);
        assert_eq!(loaded.pile.category, case.pile.category);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_case_path("atomic");
        let tmp_path = path.with_extension("pile.tmp");

        save_case(&PileCase::demo(), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_case(&temp_case_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_case_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_case(&path).unwrap_err();
        assert!(matches!(err, CalcError::SerializationError { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_case_path("newer");
        let mut case = PileCase::demo();
        case.meta.version = "0.9.0".to_string();
        save_case(&case, &path).unwrap();
        let err = load_case(&path).unwrap_err();
        assert!(matches!(err, CalcError::VersionMismatch { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
