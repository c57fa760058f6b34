use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scriptwalk")]
#[command(about = "Static pre-pass that finds breakpoints and shellcode candidates in hostile JavaScript")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (json, terminal)
    #[arg(short, long, default_value = "terminal", global = true)]
    pub format: OutputFormat,

    /// Write output to file
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML file with analysis options
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk one or more scripts
    Analyze {
        /// Script files to analyze ("-" reads paths from stdin)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Minimum string length reported as a shellcode candidate
        #[arg(long)]
        min_shellcode_length: Option<usize>,

        /// Skip scripts with syntax errors instead of walking the recovered tree
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output for machine consumption
    Json,
    /// Human-readable terminal output
    Terminal,
}
