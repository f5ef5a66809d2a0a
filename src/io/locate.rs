//! Locate the benchmark results file.
//!
//! All search patterns are expanded relative to a root directory; the
//! matching file with the newest modification time wins. Ties keep the
//! candidate found first (pattern order, then glob order).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use glob::{Pattern, glob};
use tracing::{debug, info};

use crate::error::TrendError;

/// The located input file and its modification time.
#[derive(Debug, Clone)]
pub struct LocatedInput {
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Number of distinct candidates that matched.
    pub candidates: usize,
}

/// Expand every pattern under `root` and collect distinct file matches.
pub fn collect_candidates(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let root_escaped = Pattern::escape(&root.to_string_lossy());
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for pat in patterns {
        let full = format!("{root_escaped}/{pat}");
        let entries = match glob(&full) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(pattern = %pat, "skipping invalid search pattern: {e}");
                continue;
            }
        };
        for path in entries.filter_map(Result::ok) {
            if !path.is_file() {
                continue;
            }
            let key = path.canonicalize().unwrap_or_else(|_| path.clone());
            if seen.insert(key) {
                out.push(path);
            }
        }
    }

    out
}

/// Pick the most recently modified candidate matching any of `patterns`.
pub fn locate_input(root: &Path, patterns: &[String]) -> Result<LocatedInput, TrendError> {
    let candidates = collect_candidates(root, patterns);
    debug!(count = candidates.len(), "results file candidates");

    let mut best: Option<(PathBuf, SystemTime)> = None;
    for path in &candidates {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| TrendError::io(path, e))?;
        let newer = match &best {
            Some((_, t)) => modified > *t,
            None => true,
        };
        if newer {
            best = Some((path.clone(), modified));
        }
    }

    let Some((path, modified)) = best else {
        return Err(TrendError::NoInputFound {
            patterns: patterns.to_vec(),
        });
    };

    let stamp: DateTime<Local> = modified.into();
    info!(
        "using input file {} (modified {})",
        path.display(),
        stamp.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(LocatedInput {
        path,
        modified,
        candidates: candidates.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn default_patterns() -> Vec<String> {
        crate::domain::DEFAULT_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    fn touch(path: &Path, age: Duration) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn picks_most_recent_candidate_across_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("build/deep")).unwrap();

        touch(&dir.path().join("results.csv"), Duration::from_secs(300));
        touch(&dir.path().join("build/results_old.csv"), Duration::from_secs(600));
        touch(&dir.path().join("build/deep/results_new.csv"), Duration::from_secs(10));
        touch(&dir.path().join("other.csv"), Duration::from_secs(0));

        let found = locate_input(dir.path(), &default_patterns()).unwrap();
        assert!(found.path.ends_with("build/deep/results_new.csv"));
        assert_eq!(found.candidates, 3);
    }

    #[test]
    fn equal_mtimes_keep_first_pattern_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        let stamp = SystemTime::now() - Duration::from_secs(120);
        for rel in ["build/results.csv", "results.csv"] {
            File::create(dir.path().join(rel)).unwrap().set_modified(stamp).unwrap();
        }

        let found = locate_input(dir.path(), &default_patterns()).unwrap();
        assert_eq!(found.path, dir.path().join("results.csv"));

        let reversed = vec!["build/results*.csv".to_string(), "results*.csv".to_string()];
        let found = locate_input(dir.path(), &reversed).unwrap();
        assert_eq!(found.path, dir.path().join("build/results.csv"));
    }

    #[test]
    fn duplicate_matches_are_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("results.csv"), Duration::from_secs(1));

        // `results*.csv` and `**/results*.csv` both match the same file.
        let candidates = collect_candidates(dir.path(), &default_patterns());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn empty_directory_is_no_input_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_input(dir.path(), &default_patterns()).unwrap_err();
        assert!(matches!(err, TrendError::NoInputFound { .. }));
    }
}
