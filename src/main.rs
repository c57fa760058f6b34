mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use scriptwalk::output::{self, RunReport, ScriptReport};
use scriptwalk::{AnalysisOptions, ScriptAnalyzer, SharedShellcodeRegistry};
use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Read paths from stdin, one per line.
/// Filters out empty lines and comments (lines starting with #).
fn read_paths_from_stdin() -> Vec<String> {
    let stdin = std::io::stdin();
    let reader = stdin.lock();
    reader
        .lines()
        .map_while(std::result::Result::ok)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Expand paths, replacing "-" with paths read from stdin.
fn expand_paths(paths: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::new();
    let mut stdin_read = false;

    for path in paths {
        if path == "-" {
            if !stdin_read {
                let stdin_paths = read_paths_from_stdin();
                debug!("Read {} paths from stdin", stdin_paths.len());
                expanded.extend(stdin_paths);
                stdin_read = true;
            }
        } else {
            expanded.push(path);
        }
    }

    expanded
}

/// Options from the config file (if any) with command-line overrides applied
fn load_options(
    config: Option<&str>,
    min_shellcode_length: Option<usize>,
    strict: bool,
) -> Result<AnalysisOptions> {
    let mut options = match config {
        Some(path) => AnalysisOptions::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => AnalysisOptions::default(),
    };

    if let Some(length) = min_shellcode_length {
        options.shellcode_min_length = length;
    }
    if strict {
        options.reject_syntax_errors = true;
    }

    options.validate()?;
    Ok(options)
}

/// Scripts are frequently not valid UTF-8; decode lossily rather than refuse them
fn read_script(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read '{}'", path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn analyze_paths(paths: &[String], options: &AnalysisOptions) -> Result<RunReport> {
    for path in paths {
        if !Path::new(path).exists() {
            anyhow::bail!("Path does not exist: {}", path);
        }
    }

    let registry = Arc::new(SharedShellcodeRegistry::new());

    // one analyzer (and parser) per worker thread, one registry for all
    let scripts = paths
        .par_iter()
        .map_init(
            || ScriptAnalyzer::new(options.clone()).map(|a| a.with_registry(registry.clone())),
            |analyzer, path| -> Result<ScriptReport> {
                let analyzer = analyzer
                    .as_ref()
                    .map_err(|e| anyhow::anyhow!("Failed to create analyzer: {}", e))?;
                let source = read_script(path)?;
                debug!("Analyzing {} ({} bytes)", path, source.len());
                Ok(ScriptReport {
                    path: path.clone(),
                    result: analyzer.analyze(&source),
                })
            },
        )
        .collect::<Result<Vec<_>>>()?;

    Ok(RunReport::new(scripts, registry.snapshot()))
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Use RUST_LOG env var if set, otherwise use verbose flag
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("scriptwalk=debug")
    } else {
        EnvFilter::new("scriptwalk=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", args.verbose);

    let report = match args.command {
        cli::Command::Analyze {
            paths,
            min_shellcode_length,
            strict,
        } => {
            let options = load_options(args.config.as_deref(), min_shellcode_length, strict)?;
            let paths = expand_paths(paths);
            analyze_paths(&paths, &options)?
        }
    };

    let rendered = match args.format {
        cli::OutputFormat::Json => output::format_json(&report)?,
        cli::OutputFormat::Terminal => output::format_terminal(&report),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, rendered).with_context(|| format!("Failed to write '{}'", path))?;
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
