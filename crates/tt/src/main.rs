//! `tt`: timed-text conversion front end.

mod config;
mod progress;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use config::Configuration;
use model::{Document, Error};
use progress::{Phase, ProgressBar};

#[derive(Parser)]
#[command(name = "tt", about = "Converts between timed-text formats")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process input and output through a reader, filters and a writer.
    Convert {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
        /// Input file type, inferred from the extension if omitted
        #[arg(long)]
        itype: Option<String>,
        /// Output file type, inferred from the extension if omitted
        #[arg(long)]
        otype: Option<String>,
        /// Document filters to apply, in order
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Configuration as inline JSON (overridden by --config_file)
        #[arg(long)]
        config: Option<String>,
        /// Configuration file path (overrides --config)
        #[arg(long = "config_file")]
        config_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileType {
    Ttml,
    Scc,
    Stl,
    Srt,
    Vtt,
}

impl FileType {
    fn from_name(name: &str) -> Option<FileType> {
        match name.to_ascii_lowercase().as_str() {
            "ttml" => Some(FileType::Ttml),
            "scc" => Some(FileType::Scc),
            "stl" => Some(FileType::Stl),
            "srt" => Some(FileType::Srt),
            "vtt" => Some(FileType::Vtt),
            _ => None,
        }
    }

    /// Resolves an explicit type flag or falls back to the file extension.
    fn resolve(flag: Option<&str>, path: &Path) -> Result<FileType, UsageError> {
        if let Some(flag) = flag {
            return FileType::from_name(flag)
                .ok_or_else(|| UsageError(format!("unknown file type: {flag}")));
        }
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        FileType::from_name(extension).ok_or_else(|| {
            UsageError(format!("cannot infer a file type from {}", path.display()))
        })
    }
}

/// A command-line usage problem; exits with status 2.
struct UsageError(String);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert { input, output, itype, otype, filters, config, config_file } => {
            match convert(&input, &output, itype.as_deref(), otype.as_deref(), &filters, config, config_file)
            {
                Ok(()) => ExitCode::SUCCESS,
                Err(ConvertError::Usage(UsageError(message))) => {
                    error!("{message}");
                    ExitCode::from(2)
                }
                Err(ConvertError::Other(error)) => {
                    error!("{error:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

enum ConvertError {
    Usage(UsageError),
    Other(anyhow::Error),
}

impl From<UsageError> for ConvertError {
    fn from(error: UsageError) -> Self {
        ConvertError::Usage(error)
    }
}

impl From<anyhow::Error> for ConvertError {
    fn from(error: anyhow::Error) -> Self {
        ConvertError::Other(error)
    }
}

fn convert(
    input: &Path,
    output: &Path,
    itype: Option<&str>,
    otype: Option<&str>,
    filter_names: &[String],
    config_json: Option<String>,
    config_file: Option<PathBuf>,
) -> Result<(), ConvertError> {
    // a configuration file takes priority over inline JSON
    let config_text = match config_file {
        Some(path) => Some(
            std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?,
        ),
        None => config_json,
    };
    let config = match config_text {
        Some(text) => Configuration::from_json(&text).map_err(anyhow::Error::from)?,
        None => Configuration::default(),
    };

    if let Some(level) = config.general.log_level {
        log::set_max_level(level);
    }

    info!("input file is {}", input.display());
    info!("output file is {}", output.display());

    let reader_type = FileType::resolve(itype, input)?;
    let writer_type = FileType::resolve(otype, output)?;

    let mut bar = ProgressBar::new(config.general.progress_bar);

    let mut doc = read_document(reader_type, input, &config, &mut bar)?;
    bar.finish();

    if let Some(lang) = &config.general.document_lang {
        doc.set_lang(lang.clone());
    }

    for name in filter_names {
        match filters::document_filter(name, config.filter_section(name)) {
            Some(Ok(filter)) => {
                info!("applying filter {name}");
                filter
                    .process(&mut doc)
                    .map_err(|e| Error::Filter(e.to_string()))
                    .map_err(anyhow::Error::from)?;
            }
            Some(Err(error)) => return Err(ConvertError::Other(error.into())),
            None => warn!("unknown filter: {name}"),
        }
    }

    write_document(writer_type, output, &doc, &config, &mut bar)?;
    bar.finish();

    Ok(())
}

fn read_document(
    reader_type: FileType,
    input: &Path,
    config: &Configuration,
    bar: &mut ProgressBar,
) -> Result<Document, ConvertError> {
    let progress = |bar: &mut ProgressBar, f: f64| bar.update(Phase::Read, f);

    let doc = match reader_type {
        FileType::Scc => {
            let content = std::fs::read_to_string(input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            scc::to_model(&content, config.scc_reader.as_ref(), |f| progress(bar, f))
                .map_err(anyhow::Error::from)?
        }
        FileType::Srt => {
            let content = std::fs::read_to_string(input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            srt::to_model(&content, |f| progress(bar, f)).map_err(anyhow::Error::from)?
        }
        FileType::Ttml | FileType::Stl | FileType::Vtt => {
            return Err(ConvertError::Other(anyhow!(Error::UnsupportedFeature(format!(
                "no reader is available for {reader_type:?} input"
            )))));
        }
    };
    Ok(doc)
}

fn write_document(
    writer_type: FileType,
    output: &Path,
    doc: &Document,
    config: &Configuration,
    bar: &mut ProgressBar,
) -> Result<(), ConvertError> {
    let progress = |bar: &mut ProgressBar, f: f64| bar.update(Phase::Write, f);

    let content = match writer_type {
        FileType::Scc => scc::from_model(doc, config.scc_writer.as_ref(), |f| progress(bar, f))
            .map_err(anyhow::Error::from)?,
        FileType::Srt => srt::from_model(doc, config.srt_writer.as_ref(), |f| progress(bar, f))
            .map_err(anyhow::Error::from)?,
        FileType::Vtt => vtt::from_model(doc, config.vtt_writer.as_ref(), |f| progress(bar, f))
            .map_err(anyhow::Error::from)?,
        FileType::Ttml | FileType::Stl => {
            return Err(ConvertError::Other(anyhow!(Error::UnsupportedFeature(format!(
                "no writer is available for {writer_type:?} output"
            )))));
        }
    };

    std::fs::write(output, content)
        .with_context(|| format!("cannot write {}", output.display()))?;
    Ok(())
}
