#![allow(dead_code)]

use citadel_spider::api::{Page, PageSource, Sink};
use citadel_spider::character::Character;
use citadel_spider::Error;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{HashMap as Map, HashSet as Set};
use std::sync::Mutex;
use tokio_postgres::types::ToSql;

pub const BASE: &str = "http://citadel.test/api/character";

pub fn page_url(page: usize) -> String {
    if page == 1 {
        BASE.to_string()
    } else {
        format!("{BASE}?page={page}")
    }
}

// -- RECORDS --

pub fn character_json(id: usize) -> Value {
    json!({
        "id": id,
        "name": format!("Character {id}"),
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "unknown",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        "episode": ["https://rickandmortyapi.com/api/episode/1"],
        "url": format!("https://rickandmortyapi.com/api/character/{id}"),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn characters(count: usize) -> Vec<Character> {
    (1..=count)
        .map(|id| serde_json::from_value(character_json(id)).unwrap())
        .collect()
}

// -- PAGES --

/// In-memory listing, keyed by page url.
#[derive(Default)]
pub struct Pages {
    pub pages: Map<String, Value>,
    pub requests: Mutex<Vec<String>>,
}

impl Pages {
    /// `pages` pages of `per_page` characters each, ids counting up from 1.
    pub fn listing(pages: usize, per_page: usize) -> Self {
        let mut listing = Self::default();
        for page in 1..=pages {
            let first = (page - 1) * per_page + 1;
            let results: Vec<Value> = (first..first + per_page).map(character_json).collect();
            let next = if page < pages {
                Value::String(page_url(page + 1))
            } else {
                Value::Null
            };
            listing.insert(page_url(page), results, next);
        }
        listing
    }

    pub fn insert(&mut self, url: String, results: Vec<Value>, next: Value) {
        self.pages.insert(
            url,
            json!({
                "info": { "count": results.len(), "next": next, "prev": null },
                "results": results
            }),
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageSource for Pages {
    async fn page<T: DeserializeOwned>(&self, url: &str) -> citadel_spider::Result<Page<T>> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self.pages.get(url).ok_or_else(|| Error::Status {
            url: url.to_string(),
            status: 404,
        })?;
        serde_json::from_value(body.clone()).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

// -- STATEMENTS --

#[derive(Clone, Debug)]
pub struct Call {
    pub statement: String,

    /// `Debug` rendering of every bound value.
    pub params: Vec<String>,
}

/// Records every statement; the calls listed in `fail` are rejected.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: Mutex<Vec<Call>>,
    pub fail: Set<usize>,
}

impl RecordingSink {
    pub fn failing(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail: calls.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inserts(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.statement.trim_start().starts_with("INSERT"))
            .collect()
    }
}

impl Sink for RecordingSink {
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> anyhow::Result<u64> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(Call {
            statement: statement.to_string(),
            params: params.iter().map(|param| format!("{param:?}")).collect(),
        });

        if self.fail.contains(&index) {
            anyhow::bail!("statement {index} rejected");
        }

        // a character row binds 11 values
        Ok((params.len() / 11) as u64)
    }
}
