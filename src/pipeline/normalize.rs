//! Text normalisation: deterministic cleanup of extractor output.
//!
//! PDF text extraction preserves layout artefacts that read badly when
//! spoken aloud — words hyphenated across line breaks, hard-wrapped lines
//! mid-sentence, runs of spaces from column alignment. This module applies
//! a handful of cheap, ordered rules so the synthesiser receives prose
//! rather than typesetting. Each rule is a pure `&str → String` function
//! with no shared state.
//!
//! ## Rule order
//!
//! Line endings are normalised first so the hyphenation rule only has to
//! match `\n`; hyphenation repair runs before whitespace collapsing so the
//! joined halves are not separated by an inserted space.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to raw extractor output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Rejoin words hyphenated across line breaks
/// 3. Collapse runs of spaces and tabs
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive newlines down to 2
/// 6. Trim leading/trailing whitespace of the whole text
pub fn normalize_text(input: &str) -> String {
    let s = normalize_line_endings(input);
    let s = rejoin_hyphenated_words(&s);
    let s = collapse_spaces(&s);
    let s = trim_line_ends(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Rejoin hyphenated words ──────────────────────────────────────────

static RE_HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Alphabetic})-\n[ \t]*(\p{Alphabetic})").unwrap());

fn rejoin_hyphenated_words(input: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(input, "${1}${2}").to_string()
}

// ── Rule 3: Collapse space runs ──────────────────────────────────────────────

static RE_SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

fn collapse_spaces(input: &str) -> String {
    RE_SPACE_RUN.replace_all(input, " ").to_string()
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_line_ends(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}
