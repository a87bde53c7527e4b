// Fri Oct 16 2026 - Alex

use crate::structure::VtableLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Offset of the first virtual slot inside the table.
    pub header_offset: u32,
    pub pointer_size: u32,
    pub repair_offsets: bool,
    pub include_original_dump: bool,
    pub include_disclaimer: bool,
    pub extra_declarations: bool,
    /// Off for dumps whose slots are already readable signatures.
    pub demangle_symbols: bool,
    pub output_dir: PathBuf,
    pub linker_map: Option<PathBuf>,
    pub symbol_map: Option<PathBuf>,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        let layout = VtableLayout::header();
        Self {
            header_offset: layout.header_offset,
            pointer_size: layout.pointer_size,
            repair_offsets: true,
            include_original_dump: true,
            include_disclaimer: true,
            extra_declarations: true,
            demangle_symbols: true,
            output_dir: PathBuf::from("out"),
            linker_map: None,
            symbol_map: None,
            parallel: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn with_layout(mut self, layout: VtableLayout) -> Self {
        self.header_offset = layout.header_offset;
        self.pointer_size = layout.pointer_size;
        self
    }

    pub fn with_repair(mut self, enabled: bool) -> Self {
        self.repair_offsets = enabled;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_linker_map(mut self, path: PathBuf) -> Self {
        self.linker_map = Some(path);
        self
    }

    pub fn with_symbol_map(mut self, path: PathBuf) -> Self {
        self.symbol_map = Some(path);
        self
    }

    pub fn with_demangling(mut self, enabled: bool) -> Self {
        self.demangle_symbols = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn layout(&self) -> VtableLayout {
        VtableLayout {
            header_offset: self.header_offset,
            pointer_size: self.pointer_size,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pointer_size == 0 {
            return Err("pointer_size must be greater than 0".to_string());
        }
        if self.header_offset % self.pointer_size != 0 {
            return Err(format!(
                "header_offset {} is not a multiple of pointer_size {}",
                self.header_offset, self.pointer_size
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        Ok(())
    }
}
