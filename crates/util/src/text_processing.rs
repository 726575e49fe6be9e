//! Text helpers for terminal output.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Replaces line breaks and tabs with spaces and drops other control
/// characters so record data cannot move the cursor or restyle the terminal.
pub fn sanitize_for_terminal(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        input
            .chars()
            .filter_map(|ch| match ch {
                '\n' | '\r' | '\t' => Some(' '),
                ch if ch.is_control() => None,
                ch => Some(ch),
            })
            .collect(),
    )
}

/// Truncates `input` to at most `max_width` display columns, ending with an
/// ellipsis when anything was cut.
pub fn truncate_to_width(input: &str, max_width: usize) -> String {
    if input.width() <= max_width {
        return input.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut truncated = String::new();
    for ch in input.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert!(matches!(sanitize_for_terminal("plain"), Cow::Borrowed("plain")));
        assert_eq!(sanitize_for_terminal("a\nb\tc"), "a b c");
        assert_eq!(sanitize_for_terminal("\u{1b}[31mred"), "[31mred");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("London", 10), "London");
        assert_eq!(truncate_to_width("London", 4), "Lon…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
