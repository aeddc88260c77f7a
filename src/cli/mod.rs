use clap::{Parser, Subcommand, ValueEnum};

pub mod output;
pub mod scan;

#[derive(Parser)]
#[command(
    name = "declscan",
    version,
    about = "Extract classes, methods and fields from Java sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to config file (default: .declscan.toml or declscan.toml in the scan root)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Include only files matching this glob
    #[arg(long, global = true)]
    pub include: Vec<String>,

    /// Exclude files matching this glob
    #[arg(long, global = true)]
    pub exclude: Vec<String>,

    /// Log verbosity on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract declarations from a file or directory
    Scan {
        /// File or directory to scan (default: current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show which file extensions are extracted, planned or ignored
    Extensions,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Compact,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["declscan", "scan"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(matches!(cli.log_level, LogLevel::Warn));
        match cli.command {
            Commands::Scan { path } => assert_eq!(path, "."),
            Commands::Extensions => panic!("expected scan"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "declscan",
            "scan",
            "src",
            "--format",
            "json",
            "--exclude",
            "**/gen/**",
            "--exclude",
            "**/legacy/**",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.exclude, vec!["**/gen/**", "**/legacy/**"]);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["declscan", "--format", "xml", "scan"]).is_err());
    }
}
