//! UsedSpace — find what is eating your disk.
//!
//! Thin binary entry point. All logic lives in the `usedspace-core` crate;
//! this only parses arguments, scans, and prints one directory's children
//! ranked by cumulative size.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use usedspace_core::scanner::ScanConfig;
use usedspace_core::Session;

#[derive(Parser, Debug)]
#[command(name = "usedspace", version, about = "Per-directory cumulative disk usage")]
struct Args {
    /// Directory to scan. Defaults to the current directory.
    path: Option<PathBuf>,

    /// List this directory (inside the scanned tree) instead of the root.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Number of scan workers. Defaults to the number of CPUs.
    #[arg(long)]
    threads: Option<usize>,

    /// Print the listing as JSON.
    #[arg(long)]
    json: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let given = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let root = given
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", given.display()))?;

    let mut config = ScanConfig::default();
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    tracing::info!("UsedSpace scanning {}", root.display());
    let session = Session::open(root.clone(), config)
        .with_context(|| format!("scan of {} failed", root.display()))?;
    if session.skipped() > 0 {
        tracing::warn!("{} objects could not be read and were skipped", session.skipped());
    }

    let dir = match args.dir {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", dir.display()))?,
        None => root,
    };
    let children = session.children_checked(&dir)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &children)?;
        writeln!(out)?;
    } else {
        let total = session.get(&dir).map(|e| e.size).unwrap_or(0);
        writeln!(out, "{:>15}  {}", total, dir.display())?;
        for child in &children {
            let marker = if child.is_dir { "/" } else { "" };
            writeln!(out, "{:>15}  {}{}", child.size, child.name(), marker)?;
        }
    }

    Ok(())
}
