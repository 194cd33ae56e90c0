//! Configuration constants and tag patterns for the condoc engine
//!
//! Centralized values used throughout the engine for:
//! - The data resolution fallback namespace
//! - The colour forced onto rewritten runs
//! - The compiled block and inline tag grammar
//!
//! # Tag grammar
//!
//! ```text
//! <IF=KEY[=VALUE]>            block open, at the start of a paragraph
//! <ELSE>                      block else, at the start of a paragraph
//! </IF>                       block end, at the start of a paragraph
//! <IF=KEY[=VALUE]>body</IF>   inline, anywhere in a paragraph
//! <IF=KEY[=VALUE]>a<ELSE>b</IF>
//! ```
//!
//! `KEY` is a run of word characters, `VALUE` a run of word characters and `=`.
//! Block markers only need to lead the paragraph text; whatever follows them
//! goes away with the marker paragraph.

use regex::Regex;
use std::sync::LazyLock;

/// Top-level data key consulted when a key is absent from the data context.
pub const SHARING_KEY: &str = "Sharing";

/// Hex RGB colour written to the first run of every rewritten paragraph.
pub const NEUTRAL_COLOR: &str = "000000";

/// Block-open marker: the paragraph starts with `<IF=cond>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static BLOCK_IF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<IF *=([\w=]+)>").expect("valid regex"));

/// Block-else marker: the paragraph starts with `<ELSE>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static BLOCK_ELSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<ELSE>").expect("valid regex"));

/// Block-end marker: the paragraph starts with `</IF>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static BLOCK_END_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*</IF>").expect("valid regex"));

/// Inline two-branch tag. Captures: (1) condition, (2) if text, (3) else text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static INLINE_IF_ELSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<IF *=([\w=]+)>(.+?)<ELSE>(.+?)</IF>").expect("valid regex")
});

/// Inline single-branch tag. Captures: (1) condition, (2) body text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static INLINE_IF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<IF *=([\w=]+)>(.+?)</IF>").expect("valid regex"));
