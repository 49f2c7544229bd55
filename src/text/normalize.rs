//! Markup stripping for cleaner embeddings.
//!
//! [`clean_markup`] turns markdown-flavored source text into plain prose:
//! code is removed outright (fenced blocks and inline spans), images are
//! dropped, links collapse to their display text, raw tags disappear, and
//! whitespace is squeezed.  The transform is deterministic and idempotent:
//! running it on its own output is a no-op.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Strip non-prose markup and collapse whitespace.
///
/// Images are removed before links so that image syntax vanishes entirely
/// instead of degrading into a stray `!` plus alt text.
pub fn clean_markup(text: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(text, "");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = TAG_RE.replace_all(&text, "");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    text.trim().to_string()
}
