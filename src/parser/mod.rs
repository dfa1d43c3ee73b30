//! Source-file parsing: walks a project tree, parses every Java file, and
//! produces the declaration records the graph builder consumes.
//!
//! Files are parsed in parallel; unchanged files come out of the
//! fingerprint cache instead of being re-parsed. A file that cannot be read
//! or parsed is logged and skipped — the run never aborts.

pub mod java;

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cache::FingerprintCache;
use crate::model::ClassInfo;

pub use java::parse_source;

/// Directories that are never worth scanning, .gitignore or not.
const BUILTIN_IGNORE: &[&str] = &[
    "target",
    "build",
    "out",
    "bin",
    "generated",
    ".git",
    ".gradle",
    ".idea",
    "node_modules",
];

fn is_builtin_ignored(path: &Path) -> bool {
    path.components().any(|c| {
        if let std::path::Component::Normal(name) = c {
            BUILTIN_IGNORE.contains(&name.to_str().unwrap_or(""))
        } else {
            false
        }
    })
}

/// All Java source files under a root, .gitignore-aware, sorted so the
/// declaration list (and therefore the built graph) is deterministic.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| !is_builtin_ignored(entry.path()))
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "java"))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Parse every source file under `root` into one ordered declaration list.
pub fn parse_project(root: &Path, cache: &FingerprintCache) -> Vec<ClassInfo> {
    let files = collect_source_files(root);
    info!(files = files.len(), root = %root.display(), "parsing project");

    let per_file: Vec<Vec<ClassInfo>> = files
        .par_iter()
        .map(|path| parse_file(path, cache))
        .collect();

    per_file.into_iter().flatten().collect()
}

/// Parse one file, going through the fingerprint cache.
pub fn parse_file(path: &Path, cache: &FingerprintCache) -> Vec<ClassInfo> {
    if let Some(cached) = cache.get(path) {
        return cached;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot read source file, skipping");
            return Vec::new();
        }
    };

    match parse_source(&path.to_string_lossy(), &source) {
        Ok(classes) => {
            cache.put(path, classes.clone());
            classes
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to parse source file, skipping");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "{contents}").unwrap();
        path
    }

    #[test]
    fn collects_only_java_files_outside_ignored_dirs() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "src/A.java", "class A {}");
        write_file(dir.path(), "src/notes.txt", "not java");
        write_file(dir.path(), "target/Gen.java", "class Gen {}");
        write_file(dir.path(), "build/B.java", "class B {}");

        let files = collect_source_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/A.java"));
    }

    #[test]
    fn parse_project_flattens_in_sorted_file_order() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "src/B.java", "package p; class B {}");
        write_file(dir.path(), "src/A.java", "package p; class A {}");

        let cache = FingerprintCache::new();
        let classes = parse_project(dir.path(), &cache);
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn second_parse_hits_the_cache() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "A.java", "class A {}");

        let cache = FingerprintCache::new();
        parse_project(dir.path(), &cache);
        assert_eq!(cache.stats().hits, 0);

        parse_project(dir.path(), &cache);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn unreadable_or_broken_files_are_skipped() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "Ok.java", "class Ok {}");
        write_file(dir.path(), "Broken.java", "class {{{{");

        let cache = FingerprintCache::new();
        let classes = parse_project(dir.path(), &cache);
        // The broken file contributes nothing; the good one still parses.
        assert!(classes.iter().any(|c| c.name == "Ok"));
    }
}
