/// Joins path segments with single slashes.
///
/// Empty segments are skipped; a trailing slash on the left side and a
/// leading slash on the right side collapse into one separator.
pub fn join_paths<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if joined.is_empty() {
            joined.push_str(part);
        } else {
            if joined.ends_with('/') {
                joined.pop();
            }
            joined.push('/');
            joined.push_str(part.strip_prefix('/').unwrap_or(part));
        }
    }
    joined
}

/// Last path segment, the whole input when it contains no slash.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// File extension including the leading dot.
///
/// `None` for dotless names, for names that are only an extension
/// (`.gitignore`) and for names ending in a bare dot.
pub fn extname(path: &str) -> Option<&str> {
    let name = basename(path);
    let idx = name.rfind('.')?;
    if idx == 0 || name[idx + 1..].is_empty() {
        return None;
    }
    Some(&name[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_paths_collapses_separators() {
        assert_eq!(join_paths(["a", "b", "c"]), "a/b/c");
        assert_eq!(join_paths(["a/", "/b/", "/c"]), "a/b/c");
        assert_eq!(join_paths(["", "a", "", "b"]), "a/b");
        assert_eq!(
            join_paths(["https://sonar.example.com/", "/api/measures/search"]),
            "https://sonar.example.com/api/measures/search"
        );
        assert_eq!(join_paths::<[&str; 0], &str>([]), "");
    }

    #[test]
    fn join_paths_keeps_inner_slashes() {
        assert_eq!(join_paths(["a//b", "c"]), "a//b/c");
        assert_eq!(join_paths(["/root", "leaf"]), "/root/leaf");
    }

    #[test]
    fn basename_returns_last_segment() {
        assert_eq!(basename("a/b/file.txt"), "file.txt");
        assert_eq!(basename("file.txt"), "file.txt");
        assert_eq!(basename("a/b/"), "");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn extname_returns_dotted_suffix() {
        assert_eq!(extname("archive.tar.gz"), Some(".gz"));
        assert_eq!(extname("src/main.rs"), Some(".rs"));
        assert_eq!(extname("dir.d/readme"), None);
        assert_eq!(extname(".gitignore"), None);
        assert_eq!(extname("trailing."), None);
        assert_eq!(extname("plain"), None);
    }
}
