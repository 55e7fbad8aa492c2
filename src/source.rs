//! Input discovery: log files in one directory whose names match a glob pattern.

use crate::error::ScalingError;

use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};

/// Full text of one matched log file.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    pub text: String,
}

/// List regular files directly under `root` whose names match `pattern` (e.g. `slurm-*.out`).
///
/// The listing order is whatever glob produces; callers must not give it meaning.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, ScalingError> {
    let bad_pattern = |message: String| ScalingError::Pattern {
        pattern: pattern.to_string(),
        message,
    };

    if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
        return Err(bad_pattern("pattern must name files, not paths".to_string()));
    }
    Pattern::new(pattern).map_err(|e| bad_pattern(e.to_string()))?;

    let meta = fs::metadata(root).map_err(|e| ScalingError::io(root, e))?;
    if !meta.is_dir() {
        return Err(ScalingError::io(
            root,
            std::io::Error::other("input root is not a directory"),
        ));
    }

    let root_str = root.to_str().ok_or_else(|| {
        ScalingError::io(
            root,
            std::io::Error::other("input root is not valid UTF-8"),
        )
    })?;
    let full = format!("{}/{}", Pattern::escape(root_str), pattern);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut out = Vec::new();
    for entry in glob::glob_with(&full, options).map_err(|e| bad_pattern(e.to_string()))? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(ScalingError::io(path, std::io::Error::from(e)));
            }
        };
        if path.is_file() {
            out.push(path);
        } else {
            tracing::debug!(path = %path.display(), "skipping non-file match");
        }
    }

    Ok(out)
}

/// Read every file in listing order. Any unreadable or non-UTF-8 file fails the whole read.
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<LogFile>, ScalingError> {
    paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path).map_err(|e| ScalingError::io(path, e))?;
            Ok(LogFile {
                path: path.clone(),
                text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut v: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn discovers_only_matching_regular_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("slurm-1.out"), "a").unwrap();
        fs::write(dir.path().join("slurm-2.out"), "b").unwrap();
        fs::write(dir.path().join("other.out"), "c").unwrap();
        fs::write(dir.path().join("slurm-3.err"), "d").unwrap();
        fs::create_dir(dir.path().join("slurm-dir.out")).unwrap();

        let found = discover(dir.path(), "slurm-*.out").unwrap();
        assert_eq!(names(&found), vec!["slurm-1.out", "slurm-2.out"]);
    }

    #[test]
    fn no_matches_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        assert_eq!(discover(dir.path(), "slurm-*.out").unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        let err = discover(&dir.path().join("nope"), "*.out").unwrap_err();
        assert!(matches!(err, ScalingError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_root_is_io_error_naming_it() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path().join("logs");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("slurm-1.out"), "a").unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list it anyway.
        let listable = fs::read_dir(&root).is_ok();
        let result = discover(&root, "slurm-*.out");
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
        if listable {
            return;
        }

        match result.unwrap_err() {
            ScalingError::Io { path, source } => {
                assert_eq!(path, root);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            discover(dir.path(), "slurm-[.out"),
            Err(ScalingError::Pattern { .. })
        ));
        assert!(matches!(
            discover(dir.path(), "logs/*.out"),
            Err(ScalingError::Pattern { .. })
        ));
    }

    #[test]
    fn read_all_keeps_listing_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.out");
        let b = dir.path().join("b.out");
        fs::write(&a, "first").unwrap();
        fs::write(&b, "second").unwrap();

        let files = read_all(&[b.clone(), a.clone()]).unwrap();
        let texts: Vec<&str> = files.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(files[0].path, b);
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("binary.out");
        fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();
        let err = read_all(&[bad]).unwrap_err();
        assert!(matches!(err, ScalingError::Io { .. }));
    }
}
