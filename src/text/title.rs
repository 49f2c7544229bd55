//! Title resolution: first level-1 heading, else first level-2 heading,
//! else a humanized fallback identifier.

use std::sync::LazyLock;

use regex::Regex;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)$").unwrap());

/// Derive a human-readable title from `content`, falling back to `fallback`
/// (typically a file stem) with separators replaced and words title-cased.
///
/// Exactly one of the three paths fires; the search is top-to-bottom and the
/// first match wins.
pub fn resolve_title(content: &str, fallback: &str) -> String {
    if let Some(caps) = H1_RE.captures(content) {
        return caps[1].trim().to_string();
    }
    if let Some(caps) = H2_RE.captures(content) {
        return caps[1].trim().to_string();
    }
    humanize(fallback)
}

/// `my-notes` → `My Notes`, `db_setup` → `Db Setup`.
fn humanize(identifier: &str) -> String {
    identifier
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_heading_wins() {
        assert_eq!(resolve_title("# Title A\n## Title B", "fallback"), "Title A");
    }

    #[test]
    fn level_two_heading_is_second_choice() {
        assert_eq!(resolve_title("## Only B", "fallback"), "Only B");
    }

    #[test]
    fn first_heading_wins_even_when_later_in_file() {
        let content = "intro paragraph\n\n## Early H2\n\n# Late H1";
        // H1 takes precedence over H2 regardless of position.
        assert_eq!(resolve_title(content, "fallback"), "Late H1");
    }

    #[test]
    fn fallback_is_humanized() {
        assert_eq!(resolve_title("no headings here", "my-notes"), "My Notes");
        assert_eq!(resolve_title("plain text", "db_setup_guide"), "Db Setup Guide");
    }

    #[test]
    fn h2_marker_does_not_match_h1_pattern() {
        // `## x` must not be captured by the level-1 scan.
        assert_eq!(resolve_title("## Sub\ncontent", "f"), "Sub");
    }

    #[test]
    fn heading_text_is_trimmed() {
        assert_eq!(resolve_title("#   Spaced Out   ", "f"), "Spaced Out");
    }
}
