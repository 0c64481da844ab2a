use citadel_spider::{character, config::CHUNK_SIZE};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sets the level of tracing.
    ///
    /// If no level is provided, progress is shown as a progress bar instead.
    #[arg(short, long)]
    pub trace: Option<TraceLevel>,

    /// First page of the character listing.
    #[arg(short, long, default_value = character::START_URL)]
    pub url: String,

    /// Destination table, optionally schema-qualified.
    #[arg(long, default_value = character::TABLE)]
    pub table: String,

    /// Characters per INSERT statement.
    #[arg(short, long, default_value_t = CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Fail once this many pages have been fetched and another is still linked.
    ///
    /// If no limit is provided, pages are followed until the listing ends.
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Exit with an error when any chunk failed to insert.
    #[arg(long)]
    pub strict: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
