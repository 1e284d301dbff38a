//! Song catalog loading
//!
//! A catalog is a JSON document holding song objects, either wrapped as
//! `{"songs": [...]}` or as a bare array. Every object needs an `id`; all
//! other keys are kept as display fields.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use sorter_core::{Item, ItemId, Provider};
use std::path::Path;
use tracing::{info, warn};

/// Keys owned by the tournament state; catalog values for them are dropped
const RESERVED_KEYS: [&str; 5] = ["id", "score", "appearances", "eliminated", "h2h"];

/// Parse catalog JSON into fresh items
pub fn parse_catalog(json: &str) -> Result<Vec<Item>> {
    let document: Value = serde_json::from_str(json).context("Catalog is not valid JSON")?;

    let songs = match document {
        Value::Array(songs) => songs,
        Value::Object(mut root) => match root.remove("songs") {
            Some(Value::Array(songs)) => songs,
            _ => bail!("Catalog object must contain a \"songs\" array"),
        },
        _ => bail!("Catalog must be an array of songs or an object with a \"songs\" array"),
    };

    songs
        .into_iter()
        .enumerate()
        .map(|(index, song)| parse_song(index, song))
        .collect()
}

/// Read and parse a catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<Item>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let items = parse_catalog(&contents)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    info!(path = %path.display(), songs = items.len(), "catalog loaded");
    Ok(items)
}

/// Keep only the songs the provider can play
pub fn filter_for_provider(items: Vec<Item>, provider: Provider) -> Vec<Item> {
    let total = items.len();
    let available: Vec<Item> = items
        .into_iter()
        .filter(|item| provider.is_available(item))
        .collect();

    info!(
        %provider,
        available = available.len(),
        unavailable = total - available.len(),
        "provider filter applied"
    );
    if available.is_empty() && total > 0 {
        warn!(%provider, "no songs in the catalog are playable on this provider");
    }
    available
}

fn parse_song(index: usize, song: Value) -> Result<Item> {
    let Value::Object(mut fields) = song else {
        bail!("Song #{} is not an object", index + 1);
    };

    let id = match fields.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => bail!("Song #{} has no usable \"id\"", index + 1),
    };

    let display: Map<String, Value> = fields
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();

    let mut item = Item::new(ItemId::new(id));
    item.fields = display;
    Ok(item)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod catalog_tests;
