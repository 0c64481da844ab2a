use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The page request never got a response.
    #[error("failed to fetch {url}, error({source})")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}, status({status})")]
    Status { url: String, status: u16 },

    /// The response body was not a page of the expected record type.
    #[error("failed to parse page {url}, error({source})")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination exceeded the limit of {limit} pages")]
    PageLimit { limit: usize },

    #[error("pagination returned to an already fetched page {url}")]
    Cycle { url: String },

    #[error("failed to create table {table}, error({source})")]
    Schema {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid table name {0:?}")]
    TableName(String),

    #[error("chunk size {size} must be between 1 and {max}")]
    ChunkSize { size: usize, max: usize },
}
