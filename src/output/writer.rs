// Fri Oct 16 2026 - Alex

use crate::output::error::OutputError;
use crate::output::header::RenderedHeader;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where rendered headers go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Console,
    /// Headers land at `<root>/<relative_path>`, directories created as needed.
    Directory(PathBuf),
}

impl OutputSink {
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        OutputSink::Directory(root.into())
    }

    pub fn is_console(&self) -> bool {
        matches!(self, OutputSink::Console)
    }

    /// The file a header would be written to, `None` on the console.
    pub fn target_path(&self, header: &RenderedHeader) -> Option<PathBuf> {
        match self {
            OutputSink::Console => None,
            OutputSink::Directory(root) => Some(root.join(&header.relative_path)),
        }
    }

    /// Writes one header. Returns the file written, or `None` for the console.
    pub fn write(&self, header: &RenderedHeader) -> Result<Option<PathBuf>, OutputError> {
        match self.target_path(header) {
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(header.text.as_bytes())?;
                lock.flush()?;
                Ok(None)
            }
            Some(path) => {
                write_file(&path, &header.text)?;
                log::info!("Wrote {} to {}", header.class_name, path.display());
                Ok(Some(path))
            }
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), OutputError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, text).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}
