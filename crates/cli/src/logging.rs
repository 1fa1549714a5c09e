use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Pipeline phases reported to the user on stderr. Engine-internal
/// diagnostics go through `tracing` instead.
#[derive(Debug, Clone, Copy)]
pub enum Stage {
    Corpus,
    Analyze,
    Metrics,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Corpus => "corpus",
            Stage::Analyze => "analyze",
            Stage::Metrics => "metrics",
        }
    }
}

pub fn init(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Verbosity comes from the --verbose flag or, failing that, the
/// CANON_VERBOSE environment variable.
pub fn resolve_verbosity(flag: bool) -> bool {
    flag || env::var("CANON_VERBOSE")
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

pub fn stage(stage: Stage, message: impl AsRef<str>) {
    eprintln!("[canon {}] {}", stage.as_str(), message.as_ref());
}

/// Extra progress detail, shown only when verbose.
pub fn detail(message: impl AsRef<str>) {
    if VERBOSE.load(Ordering::Relaxed) {
        eprintln!("[canon] {}", message.as_ref());
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values_parse_like_booleans() {
        for on in ["1", "true", "YES", " on "] {
            assert!(parse_flag(on));
        }
        for off in ["0", "false", "", "maybe"] {
            assert!(!parse_flag(off));
        }
    }

    #[test]
    fn explicit_flag_wins_over_environment() {
        assert!(resolve_verbosity(true));
    }

    #[test]
    fn stages_render_distinct_names() {
        let names: Vec<&str> = [Stage::Corpus, Stage::Analyze, Stage::Metrics]
            .iter()
            .map(|stage| stage.as_str())
            .collect();
        assert_eq!(names, vec!["corpus", "analyze", "metrics"]);
    }
}
