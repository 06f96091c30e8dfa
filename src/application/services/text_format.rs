//! Small text helpers for card rendering.

/// Marker appended to truncated text. Counts against the limit.
pub const ELLIPSIS: &str = "...";

const KEYCAP: char = '\u{20E3}';

/// Cuts `text` so that it is at most `max_chars` characters long, ellipsis included.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if max_chars < ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    if text.chars().count() > keep {
        let mut out: String = text.chars().take(keep).collect();
        out.push_str(ELLIPSIS);
        out
    } else {
        text.to_string()
    }
}

/// Renders a score as a direction glyph followed by keycap digits, e.g. `⬆️ 4⃣2⃣`.
#[must_use]
pub fn score_badge(score: i64) -> String {
    let glyph = match score.signum() {
        0 => "⏺️ ",
        -1 => "⬇️ ",
        _ => "⬆️ ",
    };
    let mut out = String::from(glyph);
    for digit in score.unsigned_abs().to_string().chars() {
        out.push(digit);
        out.push(KEYCAP);
    }
    out
}

/// Renders a score compactly, e.g. `🔺42`.
#[must_use]
pub fn score_inline(score: i64) -> String {
    let glyph = match score.signum() {
        0 => "🔹",
        -1 => "🔻",
        _ => "🔺",
    };
    format!("{glyph}{score}")
}

/// Wraps text in Discord spoiler bars.
#[must_use]
pub fn spoiler(text: &str) -> String {
    format!("||{text}||")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("short", 10, "short" ; "fits")]
    #[test_case("abcdefghij", 10, "abcdefg..." ; "at limit is cut")]
    #[test_case("abcdefg", 10, "abcdefg" ; "just below ellipsis threshold")]
    #[test_case("ééééééééééé", 8, "ééééé..." ; "counts characters not bytes")]
    #[test_case("abcdef", 2, "ab" ; "limit below ellipsis width")]
    #[test_case("abcdef", 0, "" ; "zero limit")]
    #[test_case("abcdef", 3, "..." ; "limit equal to ellipsis width")]
    fn test_truncate(input: &str, max: usize, expected: &str) {
        assert_eq!(truncate(input, max), expected);
        assert!(truncate(input, max).chars().count() <= max);
    }

    #[test_case(0, "⏺️ 0\u{20E3}")]
    #[test_case(42, "⬆️ 4\u{20E3}2\u{20E3}")]
    #[test_case(-7, "⬇️ 7\u{20E3}")]
    fn test_score_badge(score: i64, expected: &str) {
        assert_eq!(score_badge(score), expected);
    }

    #[test_case(0, "🔹0")]
    #[test_case(12, "🔺12")]
    #[test_case(-3, "🔻-3")]
    fn test_score_inline(score: i64, expected: &str) {
        assert_eq!(score_inline(score), expected);
    }
}
