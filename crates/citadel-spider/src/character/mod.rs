pub(crate) mod sql;

use crate::config::TableName;
use crate::load::Insertable;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tokio_postgres::types::ToSql;

/// First page of the character listing.
pub const START_URL: &str = "https://rickandmortyapi.com/api/character";

/// Default destination table; existing databases already hold characters under this name.
pub const TABLE: &str = "vakhos_table";

// de
// ----------------------------------------------------------------------------
//
// {
//   "id": 1,
//   "name": "Rick Sanchez",
//   "status": "Alive",
//   "species": "Human",
//   "type": "",
//   "gender": "Male",
//   "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
//   "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
//   "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
//   "episode": [ "https://rickandmortyapi.com/api/episode/1", ... ],
//   "url": "https://rickandmortyapi.com/api/character/1",
//   "created": "2017-11-04T18:48:46.250Z"
// }
//
// Members are not checked for presence; a missing one is stored as NULL.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Character {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<Named>,
    pub location: Option<Named>,
    pub image: Option<String>,
    pub episode: Option<Vec<String>>,
    pub url: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// A reference to another resource, of which only the display name is kept.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Named {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ser
// ----------------------------------------------------------------------------

/// A [`Character`] flattened into the column order of the destination table.
#[derive(Debug)]
pub struct CharacterRow<'a> {
    name: Option<&'a str>,
    status: Option<&'a str>,
    species: Option<&'a str>,
    kind: Option<&'a str>,
    gender: Option<&'a str>,
    origin: Option<&'a str>,
    location: Option<&'a str>,
    image: Option<&'a str>,
    episode: Option<&'a [String]>,
    url: Option<&'a str>,
    created: Option<NaiveDateTime>,
}

impl<'a> From<&'a Character> for CharacterRow<'a> {
    fn from(character: &'a Character) -> Self {
        Self {
            name: character.name.as_deref(),
            status: character.status.as_deref(),
            species: character.species.as_deref(),
            kind: character.kind.as_deref(),
            gender: character.gender.as_deref(),
            origin: character.origin.as_ref().and_then(Named::name),
            location: character.location.as_ref().and_then(Named::name),
            image: character.image.as_deref(),
            episode: character.episode.as_deref(),
            url: character.url.as_deref(),
            // the column is a TIMESTAMP, so the UTC wall-clock time is stored
            created: character.created.map(|created| created.naive_utc()),
        }
    }
}

impl Insertable for CharacterRow<'_> {
    const COLUMNS: &'static [&'static str] = sql::COLUMNS;

    fn create_table(table: &TableName) -> String {
        sql::create_table(table)
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.name,
            &self.status,
            &self.species,
            &self.kind,
            &self.gender,
            &self.origin,
            &self.location,
            &self.image,
            &self.episode,
            &self.url,
            &self.created,
        ]
    }
}

/// Flatten every character, keeping their order.
pub fn rows(characters: &[Character]) -> Vec<CharacterRow<'_>> {
    characters.iter().map(CharacterRow::from).collect()
}
