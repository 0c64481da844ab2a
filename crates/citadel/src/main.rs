mod cli;
mod spider;
mod tls;

// remote imports
use citadel_spider::{Config, LoadReport};
use clap::Parser;
use cli::{Cli, TraceLevel};
use colored::Colorize;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// set the trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

// one line per failed chunk, then the totals
fn summarise(report: &LoadReport) {
    for failure in &report.failed {
        println!(
            "{} chunk {} (rows {}..{}): {}",
            "failed".red(),
            failure.index,
            failure.rows.start,
            failure.rows.end,
            failure.error
        );
    }

    let status = if report.is_complete() {
        "done".green()
    } else {
        "incomplete".yellow()
    };
    println!(
        "inserting characters ... {status} ({} of {} rows, {} of {} chunks failed)",
        report.inserted,
        report.rows,
        report.failed.len(),
        report.chunks()
    );
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    let config = Config::new(&cli.url)
        .table(&cli.table)?
        .chunk_size(cli.chunk_size)?
        .max_pages(cli.max_pages);

    let report = spider::run(&config, tui).await?;
    if tui {
        summarise(&report);
    }

    if cli.strict && !report.is_complete() {
        anyhow::bail!(
            "{} of {} chunks failed to insert",
            report.failed.len(),
            report.chunks()
        );
    }

    Ok(())
}
