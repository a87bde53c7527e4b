// Fri Oct 16 2026 - Alex

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vtbl-header-generator")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Rebuilds C++ class headers from CodeWarrior vtable dumps", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON file with generator settings.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub json_output: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one vtable dump from stdin, ended by a blank line.
    Paste(PasteArgs),
    /// Reconstruct every vtable found in the `.s` files under a directory.
    Scan(ScanArgs),
    /// Reconstruct every vtable in a single dump file.
    File(FileArgs),
}

/// Options shared by every subcommand.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct MapArgs {
    #[arg(long)]
    pub linker_map: Option<PathBuf>,

    #[arg(long)]
    pub symbol_map: Option<PathBuf>,

    /// Count slot offsets from the first virtual slot instead of the table start.
    #[arg(long)]
    pub flat_offsets: bool,

    #[arg(long)]
    pub no_repair: bool,

    /// Treat slot operands as readable signatures.
    #[arg(long)]
    pub no_demangle: bool,

    /// Reconstruct tables one at a time.
    #[arg(long)]
    pub no_parallel: bool,
}

#[derive(Parser, Debug)]
pub struct PasteArgs {
    #[command(flatten)]
    pub maps: MapArgs,

    /// Write the header below this directory instead of printing it.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    #[arg(short, long)]
    pub asm_dir: PathBuf,

    #[command(flatten)]
    pub maps: MapArgs,

    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print every header instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct FileArgs {
    pub path: PathBuf,

    #[command(flatten)]
    pub maps: MapArgs,

    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

impl MapArgs {
    pub fn validate(&self) -> Result<(), String> {
        for path in self.linker_map.iter().chain(self.symbol_map.iter()) {
            if !path.is_file() {
                return Err(format!("Map file does not exist: {:?}", path));
            }
        }
        Ok(())
    }
}

impl ScanArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.asm_dir.is_dir() {
            return Err(format!("Assembly directory does not exist: {:?}", self.asm_dir));
        }
        if self.stdout && self.out_dir.is_some() {
            return Err("Cannot specify both --stdout and --out-dir".to_string());
        }
        self.maps.validate()
    }
}

impl FileArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.path.is_file() {
            return Err(format!("Dump file does not exist: {:?}", self.path));
        }
        self.maps.validate()
    }
}
