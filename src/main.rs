use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use declscan::cli::output::{format_extensions, format_scan};
use declscan::cli::scan::run_scan;
use declscan::cli::{Cli, Commands, LogLevel};
use declscan::config::{self, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match cli.command {
        Commands::Scan { ref path } => {
            let scan_path = PathBuf::from(path);
            let config = load_config(&cli, &config_root(&scan_path))?;
            let result = run_scan(&scan_path, &config)?;
            print!("{}", with_newline(format_scan(&result, &cli.format)));
        }

        Commands::Extensions => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let config = load_config(&cli, &cwd)?;
            print!(
                "{}",
                with_newline(format_extensions(&config.extensions, &cli.format))
            );
        }
    }

    Ok(())
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Config files live next to the scanned directory, or next to a scanned file.
fn config_root(scan_path: &Path) -> PathBuf {
    if scan_path.is_file() {
        scan_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        scan_path.to_path_buf()
    }
}

/// Load the project config and append the command-line globs to it.
fn load_config(cli: &Cli, root: &Path) -> Result<Config> {
    let mut config = config::load_or_default(root, cli.config.as_deref().map(Path::new))?;
    config.discovery.include.extend(cli.include.iter().cloned());
    config.discovery.exclude.extend(cli.exclude.iter().cloned());
    Ok(config)
}

fn with_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
