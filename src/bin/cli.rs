use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_file_organizer as lib;
use lib::config::Config;
use lib::format::{OrganizeFormat, Token};
use lib::metadata::lofty_reader::LoftyReader;
use lib::metadata::MetadataReader;
use std::path::{Path, PathBuf};
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "music-file-organizer", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a format string for unbalanced blocks and unknown tags
    Validate {
        /// Format to check (defaults to the configured one)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the tokens of a format string
    Classify {
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show where the given files would be organized to
    Preview {
        files: Vec<PathBuf>,
        #[arg(long)]
        format: Option<String>,
        /// Target extension (defaults to each file's own)
        #[arg(long)]
        extension: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Move (or copy) the source folder's files into the destination layout
    Organize {
        /// Print the plan without touching any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate config file and exit
    ConfigValidate,
}

fn resolve_config_path(explicit: &Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.clone()),
        None => Config::default_path().filter(|p| p.exists()),
    }
}

/// Initialize log->tracing bridge and structured logging.
/// Logs go to stdout and, when `log_dir` is set, to a daily-rotated file.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "music-file-organizer.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_writer(non_blocking).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);

    if let Err(e) = tracing_subscriber_global::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {}", e);
    }
    guard
}

fn format_from(cfg: Option<&Config>, explicit: Option<String>) -> OrganizeFormat {
    let mut format = match cfg {
        Some(cfg) => cfg.organize_format(),
        None => OrganizeFormat::default(),
    };
    if let Some(f) = explicit {
        format.set_format(&f);
    }
    format
}

fn print_tokens(format: &str, tokens: &[Token], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tokens)?);
        return Ok(());
    }
    for t in tokens {
        let kind = serde_json::to_value(t.kind)?;
        println!(
            "{:>3}..{:<3} {:<12} {:?}",
            t.span.start,
            t.span.end,
            kind.as_str().unwrap_or_default(),
            &format[t.span.clone()]
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(&cli.config);
    let cfg = match &config_path {
        Some(p) => match Config::from_path(p) {
            Ok(cfg) => Some(cfg),
            Err(e) if matches!(cli.command, Commands::ConfigValidate) => {
                eprintln!("Config validation failed: {:#}", e);
                std::process::exit(2);
            }
            Err(e) => return Err(e).with_context(|| format!("loading config from {}", p.display())),
        },
        None => None,
    };

    let _guard = init_logging(cfg.as_ref().and_then(|c| c.log_dir.as_deref()));

    match cli.command {
        Commands::Validate { format } => {
            let format = format_from(cfg.as_ref(), format);
            match format.validate() {
                Ok(()) => println!("OK"),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Classify { format, json } => {
            let format = format_from(cfg.as_ref(), format);
            print_tokens(format.format(), &format.classify(), json)?;
        }
        Commands::Preview { files, format, extension, json } => {
            let format = format_from(cfg.as_ref(), format);
            let extension = extension.or_else(|| cfg.as_ref().and_then(|c| c.extension.clone()));
            let reader = LoftyReader::new();
            for file in files {
                let song = match reader.read(&file) {
                    Ok(song) => song,
                    Err(e) => {
                        eprintln!("{}: {:#}", file.display(), e);
                        continue;
                    }
                };
                match format.compute_path(&song, extension.as_deref()) {
                    Ok(result) if json => println!("{}", serde_json::to_string(&result)?),
                    Ok(result) => println!(
                        "{} -> {}{}",
                        file.display(),
                        result.path,
                        if result.unique { "" } else { "  (not unique)" }
                    ),
                    Err(e) => eprintln!("{}: {}", file.display(), e),
                }
            }
        }
        Commands::Organize { dry_run } => {
            let cfg = cfg.context("organize needs a config file (--config)")?;
            let format = cfg.organize_format();
            format.validate().with_context(|| format!("format {:?}", format.format()))?;

            let plan = lib::organize::plan(&cfg, &format, &LoftyReader::new())?;
            if dry_run {
                for m in &plan.moves {
                    println!("{} -> {}", m.source.display(), m.destination.display());
                }
                for s in &plan.skipped {
                    println!("skip {}: {}", s.source.display(), s.reason);
                }
            } else {
                let summary = lib::organize::apply(&plan, cfg.copy);
                if summary.failed > 0 {
                    anyhow::bail!("{} file(s) could not be organized", summary.failed);
                }
            }
        }
        Commands::ConfigValidate => match config_path {
            Some(_) => println!("OK"),
            None => {
                eprintln!("Config validation failed: no config file found");
                std::process::exit(2);
            }
        },
    }

    Ok(())
}
