//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The core never imports a terminal library
//! - The core never sleeps; waiting is an effect executed by the surface
//! - The surface never blocks its async runtime with `thread::sleep`
//!
//! Helpers here walk source trees and yield production lines only: comment
//! lines and everything from the first `#[cfg(test)]` on are skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of production code
#[derive(Debug, Clone)]
pub struct SourceLine {
    /// File the line belongs to
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Line text with any trailing `//` comment removed
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// The workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file under `dir`, relative to the workspace root
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|entry| entry.into_path())
        .collect()
}

/// Production lines of one file
pub fn production_lines(path: &Path) -> Vec<SourceLine> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| SourceLine {
            path: path.to_path_buf(),
            number: idx + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
        })
        .collect()
}

/// Production lines under `dir` containing any of `needles`
pub fn find_violations(dir: &str, needles: &[&str]) -> Vec<SourceLine> {
    rust_files(dir)
        .iter()
        .flat_map(|path| production_lines(path))
        .filter(|line| needles.iter().any(|needle| line.code.contains(needle)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_the_core() {
        let files = rust_files("summoner/core/src");
        assert!(files.iter().any(|path| path.ends_with("lib.rs")));
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let dir = std::env::temp_dir().join("architectural-enforcement-lines");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("sample.rs");
        fs::write(
            &file,
            "//! docs mention sleep\nfn a() {} // sleep\n#[cfg(test)]\nmod tests { fn sleep() {} }\n",
        )
        .unwrap();

        let lines = production_lines(&file);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 2);
        assert_eq!(lines[0].code.trim(), "fn a() {}");
    }
}
