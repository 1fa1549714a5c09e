use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Author-assigned salience multiplier applied when a record carries
/// no usable `weight` field.
pub const DEFAULT_CARD_WEIGHT: f32 = 1.2;

/// One normalized evidence record from the canon. Immutable after
/// load; held for the lifetime of the index.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: String,
    pub pack: String,
    pub weight: f32,
    pub text: String,
    pub meta: CardMeta,
}

#[derive(Debug, Clone, Default)]
pub struct CardMeta {
    pub title: String,
    pub parent: String,
    pub subtopic: String,
    pub tags: Vec<String>,
}

/// Canon list fields mix bare strings with objects carrying a `text`
/// field. The union is resolved once here, at parse time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Plain(String),
    Named {
        #[serde(default)]
        text: String,
    },
}

impl Entry {
    fn text(&self) -> &str {
        match self {
            Entry::Plain(value) => value,
            Entry::Named { text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: Option<String>,
    #[serde(default)]
    pack: String,
    #[serde(default)]
    weight: Option<serde_json::Value>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    parent: String,
    #[serde(default)]
    subtopic: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    theses: Vec<Entry>,
    #[serde(default)]
    quotes: Vec<Entry>,
    #[serde(default)]
    counters: Vec<Entry>,
    #[serde(default)]
    implications: Vec<Entry>,
    #[serde(default)]
    falsifiers: Vec<Entry>,
}

impl RawCard {
    fn into_card(self) -> std::result::Result<Card, String> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err("missing card id".to_string()),
        };
        let weight = self
            .weight
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .map(|value| value as f32)
            .unwrap_or(DEFAULT_CARD_WEIGHT);

        let mut body = Vec::new();
        push_section(&mut body, "THESES", &self.theses);
        push_section(&mut body, "QUOTES", &self.quotes);
        push_section(&mut body, "COUNTERS", &self.counters);
        push_section(&mut body, "IMPLICATIONS", &self.implications);
        push_section(&mut body, "FALSIFIERS", &self.falsifiers);

        let header = format!(
            "{} — {} | {} | {}\n",
            self.title, self.author, self.pack, self.subtopic
        );
        let text = header + &body.join("\n");

        Ok(Card {
            id,
            pack: self.pack,
            weight,
            text,
            meta: CardMeta {
                title: self.title,
                parent: self.parent,
                subtopic: self.subtopic,
                tags: self.tags,
            },
        })
    }
}

fn push_section(body: &mut Vec<String>, label: &str, entries: &[Entry]) {
    let values: Vec<&str> = entries
        .iter()
        .map(Entry::text)
        .filter(|text| !text.is_empty())
        .collect();
    if !values.is_empty() {
        body.push(format!("{}: {}", label, values.join(" | ")));
    }
}

/// Loads the canon from a newline-delimited JSON file, preserving
/// source order. Blank lines are skipped. Any malformed line, missing
/// id, or duplicate id aborts the whole load with the offending
/// 1-based line number.
pub fn load_cards<P: AsRef<Path>>(path: P) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::CorpusNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(EngineError::Io(err)),
    };

    let mut cards = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: RawCard =
            serde_json::from_str(line).map_err(|err| EngineError::CorpusFormat {
                line: line_no,
                reason: err.to_string(),
            })?;
        let card = record
            .into_card()
            .map_err(|reason| EngineError::CorpusFormat {
                line: line_no,
                reason,
            })?;
        if !seen.insert(card.id.clone()) {
            return Err(EngineError::CorpusFormat {
                line: line_no,
                reason: format!("duplicate card id `{}`", card.id),
            });
        }
        cards.push(card);
    }
    Ok(cards)
}
