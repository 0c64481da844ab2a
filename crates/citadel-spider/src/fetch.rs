use crate::api::{Page, PageSource};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, error, trace};

/// Follow a paginated listing from `start_url` until `next` runs out, concatenating every page's
/// results in the order the server returned them.
///
/// Any failed page aborts the whole fetch; nothing is retried. `max_pages` bounds the number of
/// requests, and a `next` link pointing back at a page already fetched is an error rather than
/// an endless loop.
pub async fn fetch_all<S, T>(source: &S, start_url: &str, max_pages: Option<usize>) -> Result<Vec<T>>
where
    S: PageSource,
    T: DeserializeOwned,
{
    let time = std::time::Instant::now();

    let mut records: Vec<T> = Vec::new();
    let mut fetched: HashSet<String> = HashSet::new();
    let mut cursor = Some(start_url.to_string()).filter(|url| !url.is_empty());

    while let Some(url) = cursor {
        if let Some(limit) = max_pages {
            if fetched.len() >= limit {
                error!("pagination stopped at {url}, {limit} pages already fetched");
                return Err(Error::PageLimit { limit });
            }
        }
        if !fetched.insert(url.clone()) {
            error!("pagination cycled back to {url}");
            return Err(Error::Cycle { url });
        }

        let page: Page<T> = source.page(&url).await.map_err(|err| {
            error!("{err}");
            err
        })?;
        trace!(
            "page {} fetched, {} records",
            fetched.len(),
            page.results.len()
        );

        cursor = page.next().map(str::to_string);
        records.extend(page.results);
    }

    debug!(
        "{} records fetched from {} pages. {}",
        records.len(),
        fetched.len(),
        crate::time_elapsed(time)
    );

    Ok(records)
}
