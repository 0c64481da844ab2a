use crate::api::{PageSource, Sink};
use crate::character::{self, Character, CharacterRow};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::fetch_all;
use crate::load::{ensure_table, load_all, LoadReport};
use tracing::{info, warn};

/// Ensure the destination table, fetch every character, then insert them chunk by chunk.
///
/// Connection handling is left to the caller; `sink` is used strictly sequentially.
pub async fn run<P, S>(source: &P, sink: &S, config: &Config, tui: bool) -> Result<LoadReport>
where
    P: PageSource,
    S: Sink,
{
    let time = std::time::Instant::now();

    ensure_table::<CharacterRow, _>(sink, &config.table).await?;
    info!("table {} ready", config.table);

    let characters: Vec<Character> =
        fetch_all(source, &config.start_url, config.max_pages).await?;
    info!("fetched {} characters", characters.len());

    let rows = character::rows(&characters);
    let report = load_all(sink, &config.table, &rows, config.chunk_size, tui).await?;

    if report.is_complete() {
        info!(
            "{} characters inserted into {}. {}",
            report.inserted,
            config.table,
            crate::time_elapsed(time)
        );
    } else {
        warn!(
            "{} characters inserted into {}, {} of {} chunks failed. {}",
            report.inserted,
            config.table,
            report.failed.len(),
            report.chunks(),
            crate::time_elapsed(time)
        );
    }

    Ok(report)
}
