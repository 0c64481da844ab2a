use crate::api::Sink;
use crate::config::TableName;
use crate::error::{Error, Result};
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::ops::Range;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tracing::{debug, error, trace};

/// PostgreSQL binds at most this many parameters in one statement.
pub const MAX_PARAMS: usize = 65_535;

/// A row that can be bulk inserted: its table layout, and its values in column order.
pub trait Insertable {
    /// Columns written by an insert; `params()` must yield exactly one value per column.
    const COLUMNS: &'static [&'static str];

    /// The `CREATE TABLE IF NOT EXISTS` statement for rows of this type.
    fn create_table(table: &TableName) -> String;

    fn params(&self) -> Vec<&(dyn ToSql + Sync)>;
}

/// Outcome of [`load_all`]; chunk indices are 0-based, in insert order.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rows handed to the loader.
    pub rows: usize,

    /// Rows the database reported as inserted.
    pub inserted: u64,

    pub succeeded: Vec<usize>,
    pub failed: Vec<ChunkFailure>,
}

#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,

    /// Position of the chunk's rows in the loader's input.
    pub rows: Range<usize>,

    pub error: String,
}

impl LoadReport {
    pub fn chunks(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Check that `size` rows of `columns` values fit in one statement.
pub fn check_chunk_size(size: usize, columns: usize) -> Result<usize> {
    let max = MAX_PARAMS / columns.max(1);
    if (1..=max).contains(&size) {
        Ok(size)
    } else {
        Err(Error::ChunkSize { size, max })
    }
}

/// Issue the idempotent `CREATE TABLE IF NOT EXISTS` for `R`.
pub async fn ensure_table<R, S>(sink: &S, table: &TableName) -> Result<()>
where
    R: Insertable,
    S: Sink,
{
    sink.execute(&R::create_table(table), &[])
        .await
        .map_err(|source| {
            error!("failed to create table {table}, error({source})");
            Error::Schema {
                table: table.to_string(),
                source,
            }
        })?;

    debug!("table {table} ensured");
    Ok(())
}

/// Multi-row `INSERT` with one group of positional placeholders per row.
///
/// Placeholders are numbered contiguously across the whole statement: value `offset` of row `row`
/// binds to `$(row * columns.len() + offset + 1)`.
pub fn insert_statement(table: &TableName, columns: &[&str], rows: usize) -> String {
    let width = columns.len();
    let groups = (0..rows)
        .map(|row| {
            let placeholders = (0..width)
                .map(|offset| format!("${}", row * width + offset + 1))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({placeholders})")
        })
        .collect::<Vec<_>>()
        .join(",\n        ");

    format!(
        "
    INSERT INTO {table} ({})
    VALUES
        {groups}
",
        columns.join(", ")
    )
}

/// Insert `rows` in chunks of `chunk_size`, one statement per chunk, in order.
///
/// A failed chunk is logged and skipped; the remaining chunks still run. Which chunks failed is
/// returned in the [`LoadReport`].
pub async fn load_all<S, R>(
    sink: &S,
    table: &TableName,
    rows: &[R],
    chunk_size: usize,
    tui: bool,
) -> Result<LoadReport>
where
    S: Sink,
    R: Insertable,
{
    let chunk_size = check_chunk_size(chunk_size, R::COLUMNS.len())?;
    let time = std::time::Instant::now();
    let num_chunks = rows.len().div_ceil(chunk_size);

    // progress bar
    let pb = if tui {
        let pb = ProgressBar::new(num_chunks as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} {spinner:.magenta}\n\
                    [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} chunks \
                    [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_message(format!("inserting into {table} ..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut report = LoadReport {
        rows: rows.len(),
        ..LoadReport::default()
    };

    // one statement per chunk, each awaited before the next
    let mut chunks = stream::iter(rows.chunks(chunk_size).enumerate());
    while let Some((index, chunk)) = chunks.next().await {
        let start = index * chunk_size;
        let range = start..start + chunk.len();

        let statement = insert_statement(table, R::COLUMNS, chunk.len());
        let params: Vec<&(dyn ToSql + Sync)> = chunk.iter().flat_map(|row| row.params()).collect();

        match sink.execute(&statement, &params).await {
            Ok(count) => {
                trace!("chunk {index} inserted, rows {range:?}");
                report.inserted += count;
                report.succeeded.push(index);
            }
            Err(err) => {
                error!("failed to insert chunk {index} into {table}, rows {range:?}, error({err})");
                report.failed.push(ChunkFailure {
                    index,
                    rows: range,
                    error: err.to_string(),
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    debug!(
        "{} of {num_chunks} chunks inserted into {table}. {}",
        report.succeeded.len(),
        crate::time_elapsed(time)
    );

    Ok(report)
}
