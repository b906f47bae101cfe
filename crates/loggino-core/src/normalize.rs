//! Error-line normalization into dedup signatures

use regex::Regex;

/// Strips volatile substrings (timestamps, counters) from error lines.
///
/// Patterns come from configuration and are applied in list order; every
/// match is removed and the result trimmed. With no patterns the
/// normalizer only trims.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    patterns: Vec<Regex>,
}

impl Normalizer {
    /// Compile `patterns`, skipping (and logging) any that fail to compile.
    ///
    /// Patterns use the `regex` crate syntax: lookaround and backreferences
    /// are not supported and such patterns are skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(p.as_ref()) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(pattern = p.as_ref(), error = %e, "skipping cleaning pattern (lookaround and backreferences are unsupported)");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut line = raw.to_string();
        for re in &self.patterns {
            line = re.replace_all(&line, "").into_owned();
        }
        line.trim().to_string()
    }
}
