pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod load;
pub mod pipeline;

/// Characters from the [Rick and Morty API]; the listing's record shape and its destination table.
///
/// [Rick and Morty API]: https://rickandmortyapi.com/documentation/#character
pub mod character;

pub use config::Config;
pub use error::{Error, Result};
pub use load::LoadReport;

/// Shortcut for required API elements.
pub mod http {
    pub(crate) use dotenv::var;
    pub use reqwest::Client as HttpClient;
    pub use tokio_postgres::Client as PgClient;
}

/// Format the time since `time` for the end of a log line.
pub fn time_elapsed(time: std::time::Instant) -> String {
    format!(
        "\x1b[38;5;208melapsed time: {} ms\x1b[0m",
        time.elapsed().as_millis()
    )
}
