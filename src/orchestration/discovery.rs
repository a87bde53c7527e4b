// Fri Oct 16 2026 - Alex

use crate::structure::VtableDump;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const ASM_EXTENSION: &str = "s";

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Assembly directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One table and the file it came from, `None` for pasted input.
#[derive(Debug, Clone)]
pub struct VtableSource {
    pub origin: Option<PathBuf>,
    pub dump: VtableDump,
}

impl VtableSource {
    pub fn describe(&self) -> String {
        match &self.origin {
            Some(path) => format!("{} ({})", self.dump.label, path.display()),
            None => self.dump.label.clone(),
        }
    }
}

/// Reads pasted lines until the first blank line or end of input.
pub fn collect_console_input<R: BufRead>(reader: R) -> Result<String, std::io::Error> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Every `.s` file below `dir`, sorted by path.
pub fn discover_asm_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_asm = entry
            .path()
            .extension()
            .map_or(false, |ext| ext == ASM_EXTENSION);
        if entry.file_type().is_file() && is_asm {
            files.push(entry.into_path());
        }
    }

    log::debug!("Found {} assembly files under {}", files.len(), dir.display());
    Ok(files)
}

pub fn scan_file(path: &Path) -> Result<Vec<VtableSource>, DiscoveryError> {
    let text = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(VtableDump::parse_all(&text)
        .into_iter()
        .map(|dump| VtableSource {
            origin: Some(path.to_path_buf()),
            dump,
        })
        .collect())
}

/// Collects every table under `dir`. Files that cannot be read are logged
/// and skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<VtableSource>, DiscoveryError> {
    let mut sources = Vec::new();

    for file in discover_asm_files(dir)? {
        match scan_file(&file) {
            Ok(found) => sources.extend(found),
            Err(e) => log::warn!("{}", e),
        }
    }

    log::info!("Collected {} vtables from {}", sources.len(), dir.display());
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_console_input_stops_at_blank_line() {
        let input = "\n__vt__4Base:\n\t.4byte 0\n\t.4byte 0\n\n.4byte ignored\n";
        let text = collect_console_input(Cursor::new(input)).unwrap();
        assert_eq!(text, "__vt__4Base:\n\t.4byte 0\n\t.4byte 0");
    }

    #[test]
    fn test_console_input_until_eof() {
        let text = collect_console_input(Cursor::new("__vt__4Base:\n.4byte 0")).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_scan_directory_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("game").join("piki");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(
            nested.join("b.s"),
            "__vt__4Base:\n.4byte 0\n.4byte 0\n.4byte foo__4BaseFv\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.s"),
            "__vt__1A:\n.4byte 0\n.4byte 0\n.4byte 0\n\n__vt__1B:\n.4byte 0\n.4byte 0\n.4byte 0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "__vt__1C:\n.4byte 0\n").unwrap();

        let files = discover_asm_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.s"));

        let sources = scan_directory(dir.path()).unwrap();
        let labels: Vec<_> = sources.iter().map(|s| s.dump.label.as_str()).collect();
        assert_eq!(labels, vec!["__vt__1A", "__vt__1B", "__vt__4Base"]);
        assert!(sources[2].origin.as_ref().unwrap().ends_with("b.s"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_directory(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingDirectory(_)));
    }
}
