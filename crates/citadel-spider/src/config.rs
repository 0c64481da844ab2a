use crate::character::{self, sql::COLUMNS};
use crate::error::{Error, Result};
use crate::load;
use std::fmt;

/// Records per insert statement, unless configured otherwise.
pub const CHUNK_SIZE: usize = 100;

/// Settings for one fetch & load run.
#[derive(Clone, Debug)]
pub struct Config {
    pub start_url: String,
    pub table: TableName,
    pub chunk_size: usize,

    /// Upper bound on the pages requested; `None` follows `next` until the listing ends.
    pub max_pages: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: character::START_URL.to_string(),
            table: TableName(character::TABLE.to_string()),
            chunk_size: CHUNK_SIZE,
            max_pages: None,
        }
    }
}

impl Config {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            ..Self::default()
        }
    }

    pub fn table(mut self, name: &str) -> Result<Self> {
        self.table = TableName::parse(name)?;
        Ok(self)
    }

    pub fn chunk_size(mut self, size: usize) -> Result<Self> {
        self.chunk_size = load::check_chunk_size(size, COLUMNS.len())?;
        Ok(self)
    }

    pub fn max_pages(mut self, limit: Option<usize>) -> Self {
        self.max_pages = limit;
        self
    }
}

/// A table identifier that is safe to splice into a statement: `table` or `schema.table`,
/// each part matching `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() <= 2 && parts.iter().all(|part| is_identifier(part)) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::TableName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names() {
        assert!(TableName::parse("vakhos_table").is_ok());
        assert!(TableName::parse("public.characters").is_ok());
        assert!(TableName::parse("_tmp2").is_ok());

        for bad in [
            "",
            "2fast",
            "a.b.c",
            "public.",
            "characters; DROP TABLE users",
            "\"quoted\"",
        ] {
            assert!(
                matches!(TableName::parse(bad), Err(Error::TableName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn builder() {
        let config = Config::new("http://localhost/api/character")
            .table("test.characters")
            .unwrap()
            .chunk_size(25)
            .unwrap()
            .max_pages(Some(3));

        assert_eq!(config.start_url, "http://localhost/api/character");
        assert_eq!(config.table.as_str(), "test.characters");
        assert_eq!(config.chunk_size, 25);
        assert_eq!(config.max_pages, Some(3));
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.start_url, character::START_URL);
        assert_eq!(config.table.to_string(), "vakhos_table");
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.max_pages, None);
    }

    #[test]
    fn chunk_size_is_bounded() {
        assert!(matches!(
            Config::default().chunk_size(0),
            Err(Error::ChunkSize { size: 0, .. })
        ));

        // 11 columns per row, 65 535 parameters per statement
        assert!(Config::default().chunk_size(5957).is_ok());
        assert!(matches!(
            Config::default().chunk_size(5958),
            Err(Error::ChunkSize { max: 5957, .. })
        ));
    }
}
