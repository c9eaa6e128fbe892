//! Display formatting shared by the terminal views and the HTML export.

use crate::model::{RatingValue, Scalar};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const PLACEHOLDER: &str = "-";

/// One decimal when numeric, verbatim when free text, dash when absent.
pub fn format_rating(rating: Option<&RatingValue>) -> String {
    match rating {
        None => PLACEHOLDER.to_string(),
        Some(value) => match value.as_f64() {
            Some(v) => format!("{v:.1}"),
            None => match value {
                RatingValue::Text(s) if !s.trim().is_empty() => s.clone(),
                _ => PLACEHOLDER.to_string(),
            },
        },
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn scalar_or_dash(value: Option<&Scalar>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        items.join(" / ")
    }
}

/// Filled star count for a review rating: rounded, clamped to 0..=5.
pub fn star_count(rating: Option<&RatingValue>) -> u8 {
    let value = rating.and_then(RatingValue::as_f64).unwrap_or(0.0);
    value.round().clamp(0.0, 5.0) as u8
}

pub fn star_string(rating: Option<&RatingValue>) -> String {
    let filled = star_count(rating) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Badge text for a person: initials of the first two words for Latin names,
/// otherwise the first two characters.
pub fn initials(name: &str) -> String {
    let trimmed = name.trim();
    let Some(first) = trimmed.chars().next() else {
        return "?".to_string();
    };
    if first.is_ascii_alphabetic() {
        trimmed
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    } else {
        name.chars().take(2).collect()
    }
}

/// Local `YYYY-MM-DD HH:MM`, or the input verbatim when it is not a date.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw.trim()) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    // Flask serializes datetimes as RFC 1123 ("Tue, 14 Feb 2023 18:37:03 GMT").
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Escape the five HTML-special characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip control characters so user text cannot inject terminal escape sequences.
pub fn sanitize_terminal(input: &str) -> String {
    input
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_display_variants() {
        assert_eq!(format_rating(Some(&RatingValue::Text("8.7".into()))), "8.7");
        assert_eq!(format_rating(Some(&RatingValue::Number(9.0))), "9.0");
        assert_eq!(format_rating(None), "-");
        assert_eq!(format_rating(Some(&RatingValue::Text("N/A".into()))), "N/A");
        assert_eq!(format_rating(Some(&RatingValue::Text(" ".into()))), "-");
    }

    #[test]
    fn test_escape_all_five() {
        let escaped = escape_html(r#"<b onclick="x">Tom & 'Jerry'</b>"#);
        assert_eq!(
            escaped,
            "&lt;b onclick=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Frank Darabont"), "FD");
        assert_eq!(initials("morgan freeman jr"), "MF");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("弗兰克·德拉邦特"), "弗兰");
        assert_eq!(initials(""), "?");
    }

    #[test]
    fn test_star_rounding_and_clamp() {
        assert_eq!(star_string(Some(&RatingValue::Number(3.6))), "★★★★☆");
        assert_eq!(star_count(Some(&RatingValue::Number(9.0))), 5);
        assert_eq!(star_count(Some(&RatingValue::Number(-2.0))), 0);
        assert_eq!(star_count(None), 0);
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(format_timestamp("2024-03-05 08:09:10"), "2024-03-05 08:09");
        assert_eq!(format_timestamp("2024-03-05T08:09:10.123456"), "2024-03-05 08:09");
        assert_eq!(format_timestamp("last tuesday"), "last tuesday");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn test_timestamp_rfc1123_from_backend() {
        let expected = chrono::Utc
            .with_ymd_and_hms(2023, 2, 14, 18, 37, 3)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(format_timestamp("Tue, 14 Feb 2023 18:37:03 GMT"), expected);
        assert_eq!(format_timestamp(" Tue, 14 Feb 2023 18:37:03 GMT "), expected);
    }

    #[test]
    fn test_join_and_dash() {
        assert_eq!(join_or_dash(&[]), "-");
        assert_eq!(join_or_dash(&["a".into(), "b".into()]), "a / b");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(scalar_or_dash(Some(&Scalar::Text("142分钟".into()))), "142分钟");
    }

    #[test]
    fn test_sanitize_and_truncate() {
        assert_eq!(sanitize_terminal("ok\u{1b}[31mred\nline"), "ok[31mred line");
        assert_eq!(truncate_str("hello world", 6), "hello…");
        assert_eq!(truncate_str("霸王别姬", 5), "霸王…");
        assert_eq!(truncate_str("short", 10), "short");
    }
}
