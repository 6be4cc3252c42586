//! Layout checks keeping `tests/unit` in step with `src`

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Crate roots and module files carry no logic of their own
    fn is_organizational(relative: &str) -> bool {
        relative.ends_with("mod.rs") || relative.ends_with("main.rs") || relative == "lib.rs"
    }

    fn rust_files(dir: &Path, base: &Path, found: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                rust_files(&path, base, found)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let relative = path
                    .strip_prefix(base)
                    .map_err(|_| io::Error::other("entry outside scanned directory"))?;
                found.insert(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(())
    }

    fn collect(dir: &str) -> BTreeSet<String> {
        let root = Path::new(dir);
        let mut found = BTreeSet::new();
        let scanned = rust_files(root, root, &mut found);
        assert!(scanned.is_ok(), "Failed to scan {dir}: {scanned:?}");
        found
    }

    // Tests every source file has a mirrored unit test file
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let tests = collect("tests/unit");
        let missing: Vec<String> = collect("src")
            .into_iter()
            .filter(|path| !is_organizational(path) && !tests.contains(path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Tests no unit test file outlives its source file
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let sources = collect("src");
        let orphaned: Vec<String> = collect("tests/unit")
            .into_iter()
            .filter(|path| !is_organizational(path) && !sources.contains(path))
            .map(|path| format!("  - tests/unit/{path}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    // Tests every non-organizational test file declares at least one test
    #[test]
    fn test_all_test_files_contain_tests() {
        let mut empty = Vec::new();
        for relative in collect("tests") {
            if is_organizational(&relative) {
                continue;
            }
            let path = Path::new("tests").join(&relative);
            let content = fs::read_to_string(&path).unwrap_or_default();
            if !content.contains("#[test]") {
                empty.push(format!("  - {}", path.display()));
            }
        }

        assert!(
            empty.is_empty(),
            "Test files without any #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
