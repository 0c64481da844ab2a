//! Spider calls are made up the following components:
//! 1. HTTP, a [`PageSource`]
//!     a) client
//!     b) request
//!     c) deserializer
//!
//! 2. PostgreSQL, a [`Sink`]
//!     a) connection
//!     b) query
//!     c) insert process
//!
//! Both sides are traits so the fetch & load loops can run against in-memory doubles.
#![allow(async_fn_in_trait)]

use crate::error::{Error, Result};
use crate::http::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_postgres::types::ToSql;
use tracing::trace;

// pages
// ----------------------------------------------------------------------------
//
// {
//   "info": {
//     "count": 826,
//     "pages": 42,
//     "next": "https://rickandmortyapi.com/api/character?page=2",
//     "prev": null
//   },
//   "results": [
//     { ... },
//     ...
//   ]
// }

/// One response of a paginated listing.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub info: Info,
}

#[derive(Debug, Deserialize)]
pub struct Info {
    /// Successor page; `null` (or an empty string) on the last page.
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// The successor page, if there is one to fetch.
    pub fn next(&self) -> Option<&str> {
        self.info.next.as_deref().filter(|url| !url.is_empty())
    }
}

/// Somewhere pages can be requested from.
pub trait PageSource {
    async fn page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>>;
}

impl PageSource for HttpClient {
    async fn page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        trace!("GET {url}");
        let response = self.get(url).send().await.map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;
        trace!("{} bytes received; deserializing page ...", body.len());

        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Build the default http client; the user agent can be overridden with `USER_AGENT`.
pub fn build_client() -> reqwest::Result<HttpClient> {
    let user_agent = var("USER_AGENT")
        .unwrap_or_else(|_| concat!("citadel/", env!("CARGO_PKG_VERSION")).to_string());

    reqwest::ClientBuilder::new().user_agent(user_agent).build()
}

// statements
// ----------------------------------------------------------------------------

/// Somewhere parameterized statements can be executed.
pub trait Sink {
    /// Execute `statement`, returning the number of rows affected.
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> anyhow::Result<u64>;
}

impl Sink for PgClient {
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> anyhow::Result<u64> {
        let rows = PgClient::execute(self, statement, params).await?;
        Ok(rows)
    }
}
