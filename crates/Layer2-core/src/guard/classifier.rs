//! Command classifier
//!
//! Lexical classification of a single command string. This is not a shell parser:
//! it normalizes whitespace, matches the catalog, and splits compound commands on
//! unquoted separators. Anything it cannot clear is left to the decision engine's
//! most conservative branch.

use super::catalog::{catalog, BlockedConstruct};
use super::mode_config::ModeConfig;

/// Trim and collapse every whitespace run to a single space.
///
/// The result is also the memo key for approve/deny.
pub fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First always-blocked reason matching the command
pub fn is_always_blocked(command: &str) -> Option<&'static str> {
    let normalized = normalize(command);
    catalog()
        .always_blocked()
        .iter()
        .find(|p| p.is_match(&normalized))
        .map(|p| p.label())
}

/// First blocked shell construct in the command
pub fn has_blocked_construct(command: &str) -> Option<BlockedConstruct> {
    let normalized = normalize(command);
    catalog()
        .constructs()
        .iter()
        .find(|p| p.is_match(&normalized))
        .map(|p| p.construct())
}

/// Whether the command matches the mode's read-only allowlist
pub fn is_read_only(command: &str, config: &ModeConfig) -> bool {
    matching_read_only_pattern(command, config).is_some()
}

/// Label of the allowlist entry that clears the command
pub fn matching_read_only_pattern(command: &str, config: &ModeConfig) -> Option<&'static str> {
    let normalized = normalize(command);
    if normalized.is_empty() {
        return None;
    }
    config.read_only_match(&normalized).map(|p| p.label())
}

// ============================================================
// Compound commands
// ============================================================

/// Result of scanning a command for separators
struct Split {
    segments: Vec<String>,
    separated: bool,
    /// A quote was still open at the end of input
    unterminated: bool,
}

impl Split {
    /// Treated as compound when the quoting could not be resolved
    fn is_compound(&self) -> bool {
        self.separated || self.unterminated
    }
}

/// Split on `|`, `|&`, `||`, `&&`, `;` and newlines outside quotes.
///
/// Understands `'...'`, `"..."` and ANSI-C `$'...'` (where `\'` does not close).
fn split_segments(command: &str) -> Split {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut separated = false;

    let mut in_single = false;
    let mut in_ansi = false;
    let mut in_double = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        if in_single {
            if c == '\'' {
                in_single = false;
            }
            current.push(c);
            continue;
        }

        if in_ansi {
            current.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                '\'' => in_ansi = false,
                _ => {}
            }
            continue;
        }

        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => {
                in_double = !in_double;
                current.push(c);
            }
            '\'' if !in_double => {
                in_single = true;
                current.push(c);
            }
            '$' if !in_double && chars.peek() == Some(&'\'') => {
                chars.next();
                in_ansi = true;
                current.push_str("$'");
            }
            _ if in_double => current.push(c),
            '|' => {
                // `||` and `|&` are one separator
                if matches!(chars.peek(), Some('|') | Some('&')) {
                    chars.next();
                }
                separated = true;
                segments.push(std::mem::take(&mut current));
            }
            '&' if chars.peek() == Some(&'&') => {
                chars.next();
                separated = true;
                segments.push(std::mem::take(&mut current));
            }
            ';' | '\n' => {
                separated = true;
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    segments.push(current);

    let unterminated = in_single || in_ansi || in_double;
    if unterminated {
        tracing::debug!(command, "Unterminated quote; treating command as compound");
    }

    Split {
        segments: segments
            .iter()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect(),
        separated,
        unterminated,
    }
}

/// Non-empty, normalized segments of a compound command
pub fn split_compound(command: &str) -> Vec<String> {
    split_segments(command).segments
}

/// Whether the command contains an unquoted separator.
///
/// Also true when a quote is left open, since the split can't be trusted.
pub fn is_compound(command: &str) -> bool {
    split_segments(command).is_compound()
}

/// True only when there is at least one segment, every segment is read-only
/// and all quotes are closed
pub fn is_compound_safe(command: &str, config: &ModeConfig) -> bool {
    let split = split_segments(command);
    !split.unterminated
        && !split.segments.is_empty()
        && split.segments.iter().all(|s| is_read_only(s, config))
}

// ============================================================
// Diagnostics
// ============================================================

/// One segment and the allowlist label that cleared it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentClassification {
    pub text: String,
    pub read_only: Option<&'static str>,
}

/// Everything the classifier knows about a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub normalized: String,
    pub always_blocked: Option<&'static str>,
    pub construct: Option<BlockedConstruct>,
    pub compound: bool,
    pub unterminated_quote: bool,
    pub segments: Vec<SegmentClassification>,
}

impl Classification {
    /// Every segment cleared by the allowlist
    pub fn is_read_only(&self) -> bool {
        !self.unterminated_quote
            && !self.segments.is_empty()
            && self.segments.iter().all(|s| s.read_only.is_some())
    }
}

/// Run every classifier check against `command` under `config`
pub fn classify(command: &str, config: &ModeConfig) -> Classification {
    let normalized = normalize(command);
    let split = split_segments(command);
    let compound = split.is_compound();

    let segments = if compound {
        split.segments
    } else if normalized.is_empty() {
        Vec::new()
    } else {
        vec![normalized.clone()]
    };

    Classification {
        always_blocked: is_always_blocked(&normalized),
        construct: has_blocked_construct(&normalized),
        compound,
        unterminated_quote: split.unterminated,
        segments: segments
            .into_iter()
            .map(|text| SegmentClassification {
                read_only: matching_read_only_pattern(&text, config),
                text,
            })
            .collect(),
        normalized,
    }
}
