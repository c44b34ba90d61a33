//! Source root traversal.
//!
//! Locates relative file names under the search path and discovers the
//! documentable files of a root when no explicit list is given.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::dispatch::PACKAGE_DESCRIPTION_FILE;

/// Extensions picked up by discovery, for both front ends.
pub const SOURCE_EXTENSIONS: &[&str] = &["groovy", "gvy", "gy", "gsh", "java"];

/// Whether discovery picks up `path`.
pub fn is_documentable(path: &Path) -> bool {
    if path.file_name().is_some_and(|name| name == PACKAGE_DESCRIPTION_FILE) {
        return true;
    }
    path.extension()
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| ext == *known))
}

/// Every path `file_name` resolves to, in search path order.
///
/// A root that does not hold the file contributes nothing.
pub fn locate(source_path: &[PathBuf], file_name: &str) -> Vec<PathBuf> {
    source_path
        .iter()
        .map(|root| root.join(file_name))
        .filter(|candidate| candidate.is_file())
        .collect()
}

/// Relative names of the documentable files under each root.
///
/// Names use `/` separators and are sorted per root. A name present under
/// several roots is listed once, at its first position; the search policy
/// decides later which copy is read.
pub fn discover(source_path: &[PathBuf]) -> Vec<String> {
    let mut names = Vec::new();
    for root in source_path {
        let mut found = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let rel_path = match path.strip_prefix(root) {
                Ok(p) => p,
                Err(_) => continue,
            };

            // Hidden directories such as .git or .gradle.
            if rel_path
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if entry.file_type().is_file() && is_documentable(path) {
                let name = rel_path
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                found.push(name);
            }
        }
        found.sort();
        for name in found {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, name: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn documentable_names() {
        assert!(is_documentable(Path::new("pkg/a/Foo.java")));
        assert!(is_documentable(Path::new("pkg/a/Bar.groovy")));
        assert!(is_documentable(Path::new("pkg/a/run.gsh")));
        assert!(is_documentable(Path::new("pkg/a/package.html")));
        assert!(!is_documentable(Path::new("pkg/a/overview.html")));
        assert!(!is_documentable(Path::new("pkg/a/Foo.class")));
    }

    #[test]
    fn discover_sorts_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        touch(&root, "pkg/b/Z.groovy");
        touch(&root, "pkg/a/Foo.java");
        touch(&root, "pkg/a/package.html");
        touch(&root, "pkg/a/notes.txt");
        touch(&root, ".git/hooks/pre.groovy");

        let names = discover(&[root]);
        assert_eq!(
            names,
            vec!["pkg/a/Foo.java", "pkg/a/package.html", "pkg/b/Z.groovy"]
        );
    }

    #[test]
    fn discover_lists_shared_names_once() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), "pkg/A.groovy");
        touch(second.path(), "pkg/A.groovy");
        touch(second.path(), "pkg/B.java");

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(discover(&roots), vec!["pkg/A.groovy", "pkg/B.java"]);
        assert_eq!(locate(&roots, "pkg/A.groovy").len(), 2);
        assert_eq!(locate(&roots, "pkg/B.java").len(), 1);
        assert!(locate(&roots, "pkg/C.java").is_empty());
    }
}
