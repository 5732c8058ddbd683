//! santa-workshop: runs one workshop and writes its action log.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use santa_workshop::{
    Config, LogSink, LogWriter, Subscribe, Supervisor, SupervisorConfig, Tally,
};

/// Santa's workshop rendezvous simulation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Number of elves (1-1000)
    #[arg(value_name = "NE")]
    elves: String,

    /// Number of reindeer (1-19)
    #[arg(value_name = "NR")]
    reindeer: String,

    /// Maximum elf work time in milliseconds (0-1000)
    #[arg(value_name = "TE")]
    elf_work: String,

    /// Maximum reindeer holiday in milliseconds (0-1000)
    #[arg(value_name = "TR")]
    reindeer_holiday: String,

    /// Action log destination ("-" for stdout)
    #[arg(short, long, default_value = "proj2.out", value_hint = clap::ValueHint::FilePath)]
    output: PathBuf,

    /// Print runtime events to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print per-action counts to stderr after the run
    #[arg(short, long)]
    summary: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validate before touching the output file.
    let config = Config::from_args(&[
        &cli.elves,
        &cli.reindeer,
        &cli.elf_work,
        &cli.reindeer_holiday,
    ])?;
    let sink = open_sink(&cli.output)?;

    let tally = Arc::new(Tally::new());
    let mut subs: Vec<Arc<dyn Subscribe>> = Vec::new();
    if cli.verbose {
        subs.push(Arc::new(LogWriter::new()));
    }
    if cli.summary {
        subs.push(tally.clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async {
        let sup = Supervisor::builder(SupervisorConfig::default())
            .with_subscribers(subs)
            .build();
        sup.run(config, sink).await?;

        if cli.summary {
            eprint!("{}", tally.render().await);
        }
        Ok::<_, anyhow::Error>(())
    })
}

fn open_sink(path: &Path) -> Result<LogSink> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(path)
        .with_context(|| format!("cannot open output file {}", path.display()))?;
    Ok(Box::new(file))
}
