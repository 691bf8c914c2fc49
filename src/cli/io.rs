//! Input discovery and per-file output for the CLI
//!
//! Output goes to any `Write` so commands can be exercised in tests; the
//! binary passes a locked stdout.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{CliError, CliResult};

/// File extensions treated as TagPacks when a directory is given
const TAGPACK_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Expands the given paths into TagPack files.
///
/// Files are taken as given. Directories are walked recursively and
/// contribute their `.yaml`/`.yml` files in sorted order.
pub fn collect_tagpack_files(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            walk_dir(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk_dir(dir: &Path, found: &mut Vec<PathBuf>) -> CliResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CliError::io_error(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, found)?;
        } else if is_tagpack_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_tagpack_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TAGPACK_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Writes `PASS <file>`
pub fn write_pass<W: Write>(out: &mut W, file: &Path) -> CliResult<()> {
    writeln!(out, "PASS {}", file.display())?;
    Ok(())
}

/// Writes `FAIL <file>: <reason>`
pub fn write_fail<W: Write>(out: &mut W, file: &Path, reason: &str) -> CliResult<()> {
    writeln!(out, "FAIL {}: {}", file.display(), reason)?;
    Ok(())
}

/// Writes `INGESTED <file> (<n> records)`
pub fn write_ingested<W: Write>(out: &mut W, file: &Path, records: usize) -> CliResult<()> {
    writeln!(out, "INGESTED {} ({} records)", file.display(), records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directories_expand_to_sorted_yaml_files() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.yml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("c.yaml"), "").unwrap();

        let explicit = PathBuf::from("given.txt");
        let files =
            collect_tagpack_files(&[dir.path().to_path_buf(), explicit.clone()]).unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("a.yml"),
                dir.path().join("b.yaml"),
                nested.join("c.yaml"),
                explicit,
            ]
        );
    }

    #[test]
    fn test_result_lines() {
        let mut out = Vec::new();
        write_pass(&mut out, Path::new("a.yaml")).unwrap();
        write_fail(&mut out, Path::new("b.yaml"), "broken").unwrap();
        write_ingested(&mut out, Path::new("a.yaml"), 4).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PASS a.yaml\nFAIL b.yaml: broken\nINGESTED a.yaml (4 records)\n"
        );
    }
}
