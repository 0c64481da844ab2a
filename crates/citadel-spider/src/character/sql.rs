use crate::config::TableName;

/// Destination columns, in the order every row is flattened; `id` is left to the server.
pub(crate) const COLUMNS: &[&str] = &[
    "name", "status", "species", "type", "gender", "origin", "location", "image", "episode",
    "url", "created",
];

/// `CREATE TABLE IF NOT EXISTS` for the character table; safe to run on every load.
pub(crate) fn create_table(table: &TableName) -> String {
    format!(
        "
    CREATE TABLE IF NOT EXISTS {table} (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100),
        status VARCHAR(50),
        species VARCHAR(50),
        type VARCHAR(50),
        gender VARCHAR(50),
        origin VARCHAR(100),
        location VARCHAR(100),
        image VARCHAR(255),
        episode TEXT[],
        url VARCHAR(255),
        created TIMESTAMP
    )
"
    )
}
