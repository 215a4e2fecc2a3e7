//! `.gnitignore` rules.
//!
//! Blank lines and `#` comments are skipped. A pattern matches a path when
//! it glob-matches the path's base name, when it is a `*suffix` pattern and
//! the path ends with the suffix, or otherwise when the path contains it.
//! `.git/` and the `.gnit` record are always ignored.

use crate::core::error::Result;
use crate::core::state::RECORD_FILE;
use glob::Pattern;
use std::fs;
use std::path::Path;

pub const IGNORE_FILE: &str = ".gnitignore";

/// Decides which working-tree paths are excluded from every operation
pub trait IgnoreMatcher {
    fn is_ignored(&self, path: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct GnitIgnore {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    raw: String,
    glob: Option<Pattern>,
}

impl GnitIgnore {
    /// Load `.gnitignore` from `root`. A missing file yields no user rules.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(IGNORE_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let rules = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| Rule {
                raw: line.to_string(),
                glob: Pattern::new(line)
                    .map_err(|e| log::warn!("Ignoring invalid glob '{line}' in {IGNORE_FILE}: {e}"))
                    .ok(),
            })
            .collect::<Vec<_>>();

        log::debug!("Loaded {} ignore rule(s)", rules.len());
        Self { rules }
    }
}

fn always_ignored(path: &str) -> bool {
    path == ".git" || path.starts_with(".git/") || path.contains("/.git/") || path == RECORD_FILE
}

impl IgnoreMatcher for GnitIgnore {
    fn is_ignored(&self, path: &str) -> bool {
        if always_ignored(path) {
            return true;
        }

        let base = path.rsplit('/').next().unwrap_or(path);
        self.rules.iter().any(|rule| {
            if rule.glob.as_ref().is_some_and(|g| g.matches(base)) {
                return true;
            }
            match rule.raw.strip_prefix('*') {
                Some(suffix) => path.ends_with(suffix),
                None => path.contains(rule.raw.as_str()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_always_ignored() {
        let ignore = GnitIgnore::default();
        assert!(ignore.is_ignored(".gnit"));
        assert!(ignore.is_ignored(".git"));
        assert!(ignore.is_ignored(".git/HEAD"));
        assert!(ignore.is_ignored("sub/.git/config"));
        assert!(!ignore.is_ignored(".gnitignore"));
        assert!(!ignore.is_ignored("realm.gno"));
    }

    #[test]
    fn test_parse_blank_and_comments() {
        let ignore = GnitIgnore::parse("\n# comment\n   \n*.log\n");
        assert_eq!(ignore.rules.len(), 1);
    }

    #[test]
    fn test_glob_on_base_name() {
        let ignore = GnitIgnore::parse("*.tmp\nsecret?.txt\n");
        assert!(ignore.is_ignored("build/out.tmp"));
        assert!(ignore.is_ignored("docs/secret1.txt"));
        assert!(!ignore.is_ignored("docs/secret12.txt"));
    }

    #[test]
    fn test_suffix_pattern_on_full_path() {
        let ignore = GnitIgnore::parse("*_test.gno\n");
        assert!(ignore.is_ignored("pkg/realm_test.gno"));
        assert!(!ignore.is_ignored("pkg/realm.gno"));
    }

    #[test]
    fn test_plain_pattern_is_substring() {
        let ignore = GnitIgnore::parse("node_modules\n");
        assert!(ignore.is_ignored("web/node_modules/x.js"));
        assert!(!ignore.is_ignored("web/index.js"));
    }

    #[test]
    fn test_invalid_glob_still_matches_substring() {
        let ignore = GnitIgnore::parse("[broken\n");
        assert!(ignore.is_ignored("a/[broken/file"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let ignore = GnitIgnore::load(dir.path()).unwrap();
        assert!(ignore.rules.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(IGNORE_FILE), "*.bak\n").unwrap();
        let ignore = GnitIgnore::load(dir.path()).unwrap();
        assert!(ignore.is_ignored("realm.gno.bak"));
    }
}
