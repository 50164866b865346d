//! Line scanner for the catalog language.
//!
//! Strips comment lines (`#` as the first non-whitespace character) and
//! blank lines while preserving the original 1-based line numbers for
//! error reporting.

/// One significant line of catalog text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the original buffer
    pub number: usize,

    /// Line content, trimmed of surrounding whitespace
    pub text: String,
}

/// Scan a catalog buffer into significant lines.
pub fn scan(input: &str) -> Vec<Line> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                None
            } else {
                Some(Line {
                    number: idx + 1,
                    text: text.to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
