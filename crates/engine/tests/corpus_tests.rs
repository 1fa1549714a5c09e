use std::fs;
use std::path::PathBuf;

use canon_engine::{load_cards, EngineError, DEFAULT_CARD_WEIGHT};
use tempfile::TempDir;

fn write_corpus(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("canon.jsonl");
    fs::write(&path, contents).expect("write corpus");
    path
}

#[test]
fn loads_one_card_per_non_blank_line_in_source_order() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(
        &dir,
        concat!(
            r#"{"id":"c1","pack":"p1","title":"First"}"#,
            "\n\n",
            r#"{"id":"c2","pack":"p2","title":"Second"}"#,
            "\n",
            r#"{"id":"c3","pack":"p1","title":"Third"}"#,
            "\n",
        ),
    );
    let cards = load_cards(&path).unwrap();
    assert_eq!(cards.len(), 3);
    let ids: Vec<&str> = cards.iter().map(|card| card.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
}

#[test]
fn weight_defaults_when_absent_or_non_numeric() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(
        &dir,
        concat!(
            r#"{"id":"a","pack":"p"}"#,
            "\n",
            r#"{"id":"b","pack":"p","weight":"heavy"}"#,
            "\n",
            r#"{"id":"c","pack":"p","weight":1.5}"#,
            "\n",
        ),
    );
    let cards = load_cards(&path).unwrap();
    assert_eq!(cards[0].weight, DEFAULT_CARD_WEIGHT);
    assert_eq!(cards[1].weight, DEFAULT_CARD_WEIGHT);
    assert!((cards[2].weight - 1.5).abs() < f32::EPSILON);
}

#[test]
fn builds_header_and_labeled_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(
        &dir,
        concat!(
            r#"{"id":"a","pack":"11_startup_canon","title":"Default Alive","author":"PG","subtopic":"fundraising","#,
            r#""theses":[{"text":"growth fixes most things"},{"text":""}],"#,
            r#""quotes":[{"text":"ask whether you are default alive","source":"essay"}],"#,
            r#""counters":[],"#,
            r#""implications":["check burn monthly","raise before the cliff"],"#,
            r#""falsifiers":["profitable from day one"]}"#,
            "\n",
        ),
    );
    let cards = load_cards(&path).unwrap();
    let text = &cards[0].text;
    assert!(text.starts_with("Default Alive — PG | 11_startup_canon | fundraising\n"));
    assert!(text.contains("THESES: growth fixes most things"));
    assert!(text.contains("QUOTES: ask whether you are default alive"));
    assert!(!text.contains("COUNTERS"));
    assert!(text.contains("IMPLICATIONS: check burn monthly | raise before the cliff"));
    assert!(text.contains("FALSIFIERS: profitable from day one"));
    assert_eq!(cards[0].meta.title, "Default Alive");
    assert_eq!(cards[0].meta.subtopic, "fundraising");
}

#[test]
fn malformed_line_aborts_with_its_exact_line_number() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(
        &dir,
        concat!(
            r#"{"id":"ok","pack":"p"}"#,
            "\n\n",
            "{not json",
            "\n",
        ),
    );
    match load_cards(&path) {
        Err(EngineError::CorpusFormat { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected CorpusFormat, got {other:?}"),
    }
}

#[test]
fn missing_id_aborts_load() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(&dir, "{\"pack\":\"p\",\"title\":\"no id\"}\n");
    match load_cards(&path) {
        Err(EngineError::CorpusFormat { line, reason }) => {
            assert_eq!(line, 1);
            assert!(reason.contains("missing card id"));
        }
        other => panic!("expected CorpusFormat, got {other:?}"),
    }
}

#[test]
fn duplicate_id_aborts_load() {
    let dir = TempDir::new().unwrap();
    let path = write_corpus(
        &dir,
        concat!(
            r#"{"id":"dup","pack":"p"}"#,
            "\n",
            r#"{"id":"dup","pack":"q"}"#,
            "\n",
        ),
    );
    match load_cards(&path) {
        Err(EngineError::CorpusFormat { line, reason }) => {
            assert_eq!(line, 2);
            assert!(reason.contains("duplicate card id"));
        }
        other => panic!("expected CorpusFormat, got {other:?}"),
    }
}

#[test]
fn missing_file_is_corpus_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.jsonl");
    match load_cards(&path) {
        Err(EngineError::CorpusNotFound(reported)) => assert_eq!(reported, path),
        other => panic!("expected CorpusNotFound, got {other:?}"),
    }
}
