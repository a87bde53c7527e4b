// Fri Oct 16 2026 - Alex

use super::args::{Args, Command, FileArgs, MapArgs, PasteArgs, ScanArgs};
use crate::config::Config;
use crate::orchestration::{
    collect_console_input, scan_directory, scan_file, ReconstructionCoordinator, RunSummary, VtableSource,
};
use crate::output::OutputSink;
use crate::structure::{VtableDump, VtableLayout};
use crate::ui::banner::print_banner;
use anyhow::Context;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;

pub struct CommandHandler {
    quiet: bool,
    json_output: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            quiet: false,
            json_output: false,
        }
    }

    pub fn execute(mut self, args: Args) -> anyhow::Result<()> {
        self.quiet = args.quiet;
        self.json_output = args.json_output;

        if args.no_color {
            colored::control::set_override(false);
        }

        if !self.quiet {
            print_banner();
        }

        self.setup_logging(&args)?;

        let config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let (summary, sink) = match args.command {
            Command::Paste(paste_args) => self.handle_paste(config, paste_args)?,
            Command::Scan(scan_args) => self.handle_scan(config, scan_args)?,
            Command::File(file_args) => self.handle_file(config, file_args)?,
        };

        self.report(&summary, ReportStream::for_sink(&sink))
    }

    fn setup_logging(&self, args: &Args) -> anyhow::Result<()> {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };
        let level = if args.quiet { log::LevelFilter::Error } else { level };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()?;

        Ok(())
    }

    fn handle_paste(&self, config: Config, args: PasteArgs) -> anyhow::Result<(RunSummary, OutputSink)> {
        args.maps.validate().map_err(|e| anyhow::anyhow!(e))?;

        let config = apply_overrides(config, &args.maps, args.out_dir.clone())?;
        let coordinator = ReconstructionCoordinator::from_config(config)?;

        if !self.quiet {
            eprintln!("{} Paste a vtable dump, finish with an empty line", "[*]".blue());
        }
        let text = collect_console_input(io::stdin().lock()).context("Failed to read stdin")?;
        let dump = VtableDump::parse(&text)?;

        let sink = match args.out_dir {
            Some(dir) => OutputSink::directory(dir),
            None => OutputSink::Console,
        };
        let sources = vec![VtableSource { origin: None, dump }];

        let summary = coordinator.run_batch(&sources, &sink, None);
        Ok((summary, sink))
    }

    fn handle_scan(&self, config: Config, args: ScanArgs) -> anyhow::Result<(RunSummary, OutputSink)> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let config = apply_overrides(config, &args.maps, args.out_dir.clone())?;
        let sink = if args.stdout {
            OutputSink::Console
        } else {
            OutputSink::directory(config.output_dir.clone())
        };
        let coordinator = ReconstructionCoordinator::from_config(config)?;

        if !self.quiet && !sink.is_console() {
            eprintln!("{} Scanning {}", "[*]".blue(), args.asm_dir.display());
        }
        let sources = scan_directory(&args.asm_dir)?;

        let progress = if self.quiet || args.no_progress || sink.is_console() {
            None
        } else {
            Some(create_progress(sources.len() as u64)?)
        };

        let summary = coordinator.run_batch(&sources, &sink, progress.as_ref());

        if let Some(bar) = progress {
            bar.finish_with_message("done");
        }

        Ok((summary, sink))
    }

    fn handle_file(&self, config: Config, args: FileArgs) -> anyhow::Result<(RunSummary, OutputSink)> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let config = apply_overrides(config, &args.maps, args.out_dir.clone())?;
        let sink = match &args.out_dir {
            Some(_) => OutputSink::directory(config.output_dir.clone()),
            None => OutputSink::Console,
        };
        let coordinator = ReconstructionCoordinator::from_config(config)?;

        let sources = scan_file(&args.path)?;
        if sources.is_empty() {
            anyhow::bail!("No __vt__ label found in {}", args.path.display());
        }

        let summary = coordinator.run_batch(&sources, &sink, None);
        Ok((summary, sink))
    }

    fn report(&self, summary: &RunSummary, stream: ReportStream) -> anyhow::Result<()> {
        if self.json_output {
            return match stream {
                ReportStream::Stdout => write_json(summary, io::stdout().lock()),
                ReportStream::Stderr => write_json(summary, io::stderr().lock()),
            };
        }

        if self.quiet {
            return Ok(());
        }

        for failed in &summary.failed {
            eprintln!("{} {}: {}", "[!]".red(), failed.label, failed.reason);
        }
        for path in &summary.written {
            eprintln!("{} {}", "[+]".green(), path.display());
        }
        eprintln!("{} {}", "[*]".blue(), summary.summary());

        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the JSON summary goes. Stdout carries headers for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportStream {
    Stdout,
    Stderr,
}

impl ReportStream {
    fn for_sink(sink: &OutputSink) -> Self {
        if sink.is_console() {
            ReportStream::Stderr
        } else {
            ReportStream::Stdout
        }
    }
}

fn write_json<W: Write>(summary: &RunSummary, mut writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

fn apply_overrides(mut config: Config, maps: &MapArgs, out_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    if let Some(path) = &maps.linker_map {
        config = config.with_linker_map(path.clone());
    }
    if let Some(path) = &maps.symbol_map {
        config = config.with_symbol_map(path.clone());
    }
    if maps.flat_offsets {
        config = config.with_layout(VtableLayout::flat());
    }
    if maps.no_repair {
        config = config.with_repair(false);
    }
    if maps.no_demangle {
        config = config.with_demangling(false);
    }
    if maps.no_parallel {
        config = config.with_parallel(false);
    }
    if let Some(dir) = out_dir {
        config = config.with_output_dir(dir);
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

fn create_progress(total: u64) -> anyhow::Result<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
        .progress_chars("█▓▒░ ");

    let bar = ProgressBar::new(total);
    bar.set_style(style);
    bar.set_message("Reconstructing");
    Ok(bar)
}
