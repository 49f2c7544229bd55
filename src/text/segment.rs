//! Bounded, overlapping segmentation with boundary-preference heuristics.
//!
//! The splitter walks a window of `max_size` bytes across the text and, at
//! each step, prefers to end the segment at the last paragraph break inside
//! the window, then the last sentence end, then the last space, but only
//! when that break lies beyond the window's halfway point, so the search for
//! a good boundary never gives up more than half the window.  Failing all
//! three, it cuts mid-word at the hard limit.

/// Split `text` into ordered, non-empty, whitespace-trimmed segments.
///
/// Requires `max_size > overlap` (the coordinator validates this once via
/// [`crate::config::IngestConfig::validate`]).  Texts no longer than
/// `max_size` come back as a single trimmed segment.
pub fn segment(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    if text.len() <= max_size {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut segments = Vec::new();
    let mut start = 0usize;

    while start < text.len() {
        let tentative = start + max_size;
        if tentative >= text.len() {
            segments.push(text[start..].trim().to_string());
            break;
        }

        // Window slice for the backward boundary search.  The hard limit may
        // fall inside a multi-byte char; clamp it down to a boundary.
        let hard_end = floor_char_boundary(text, tentative);
        let window = &text[start..hard_end];
        let half = max_size / 2;

        let end = if let Some(pos) = window.rfind("\n\n").filter(|&p| p > half) {
            start + pos + 2
        } else if let Some(pos) = window.rfind(". ").filter(|&p| p > half) {
            start + pos + 2
        } else if let Some(pos) = window.rfind(' ').filter(|&p| p > half) {
            start + pos + 1
        } else {
            hard_end
        };

        segments.push(text[start..end].trim().to_string());

        // Advance; the overlap must never stall or rewind the window.
        let mut next = floor_char_boundary(text, end.saturating_sub(overlap));
        if next <= start {
            next = end;
        }
        start = next;
    }

    segments.retain(|s| !s.is_empty());
    segments
}

/// Largest index `<= at` that is a UTF-8 char boundary.
fn floor_char_boundary(text: &str, at: usize) -> usize {
    if at >= text.len() {
        return text.len();
    }
    let mut boundary = at;
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_trimmed_segment() {
        let segments = segment("  hello world  ", 100, 10);
        assert_eq!(segments, vec!["hello world".to_string()]);
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        assert!(segment("   \n\n  ", 100, 10).is_empty());
    }

    #[test]
    fn prefers_paragraph_breaks() {
        // One paragraph break past the halfway point of the first window.
        let text = format!("{}\n\n{}", "a".repeat(80), "b".repeat(80));
        let segments = segment(&text, 100, 10);
        assert_eq!(segments[0], "a".repeat(80));
        assert!(segments[1].starts_with('b') || segments[1].starts_with('a'));
    }

    #[test]
    fn falls_back_to_sentence_breaks() {
        let text = format!("{}. {}", "a".repeat(70), "b".repeat(70));
        let segments = segment(&text, 100, 10);
        // Ends just past the ". " at offset 70, trimmed of the trailing space.
        assert_eq!(segments[0], format!("{}.", "a".repeat(70)));
    }

    #[test]
    fn falls_back_to_word_breaks() {
        let text = format!("{} {}", "a".repeat(70), "b".repeat(70));
        let segments = segment(&text, 100, 10);
        assert_eq!(segments[0], "a".repeat(70));
    }

    #[test]
    fn hard_cut_when_no_break_beyond_half_window() {
        // A break at offset 10 is before half the 100-byte window, so the
        // splitter cuts mid-word at the hard limit instead.
        let text = format!("{} {}", "a".repeat(10), "b".repeat(200));
        let segments = segment(&text, 100, 10);
        assert_eq!(segments[0].len(), 100);
    }

    #[test]
    fn non_final_segments_stay_within_max_size() {
        let text = "word ".repeat(500);
        let max_size = 120;
        let segments = segment(&text, max_size, 20);
        assert!(segments.len() > 1);
        for s in &segments[..segments.len() - 1] {
            assert!(s.len() <= max_size, "segment of {} bytes", s.len());
        }
    }

    #[test]
    fn consecutive_segments_overlap() {
        let text = "word ".repeat(500);
        let segments = segment(&text, 120, 20);
        for pair in segments.windows(2) {
            // The tail of one segment reappears at the head of the next
            // (modulo trimming at both boundaries).
            let tail: String = pair[0].chars().rev().take(10).collect::<String>();
            let tail: String = tail.chars().rev().collect();
            assert!(
                pair[1].contains(tail.trim()),
                "expected {:?} inside {:?}",
                tail,
                &pair[1][..40.min(pair[1].len())]
            );
        }
    }

    #[test]
    fn paragraph_example_produces_three_segments() {
        // A few thousand chars with a paragraph break every ~600: windows of
        // 1500 with 200 overlap land each boundary on a paragraph break.
        let para = "x".repeat(598);
        let text = vec![para.clone(); 6].join("\n\n");
        assert_eq!(text.len(), 3598);
        let segments = segment(&text, 1500, 200);
        assert_eq!(segments.len(), 3);
        // Boundaries at the breaks ending bytes 1200 and 2400; the second
        // window starts 200 bytes before the first one ended.
        assert_eq!(segments[0].len(), 1198);
        // Every non-final boundary was chosen at a paragraph break, so each
        // segment starts and ends with paragraph content, never mid-word
        // residue from a hard cut.
        for s in &segments {
            assert!(s.starts_with('x') && s.ends_with('x'));
        }
    }

    #[test]
    fn multibyte_text_never_splits_a_char() {
        let text = "é".repeat(400); // 800 bytes, no spaces or breaks
        let segments = segment(&text, 101, 10);
        assert!(segments.len() > 1);
        for s in &segments {
            assert!(s.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn terminates_with_tight_overlap() {
        // overlap close to max_size must still make forward progress.
        let text = "ab".repeat(300);
        let segments = segment(&text, 10, 9);
        assert!(!segments.is_empty());
    }
}
