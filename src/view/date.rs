//! Publication date formatting

use chrono::{DateTime, FixedOffset, Locale, Utc};
use chrono_tz::Tz;

/// Format a date with a date-fns style pattern in the given locale
///
/// # Examples
/// ```ignore
/// format_date(&date, None, "d MMM yyyy", Locale::pt_BR) // -> "19 abr 2021"
/// ```
pub fn format_date(
    date: &DateTime<FixedOffset>,
    timezone: Option<Tz>,
    pattern: &str,
    locale: Locale,
) -> String {
    let chrono_format = pattern_to_chrono_format(pattern);
    match timezone {
        Some(tz) => date
            .with_timezone(&tz)
            .format_localized(&chrono_format, locale)
            .to_string(),
        None => date
            .with_timezone(&Utc)
            .format_localized(&chrono_format, locale)
            .to_string(),
    }
}

/// Convert a date-fns pattern to a chrono format string
///
/// Letters are read in runs (`MMM`, `yyyy`); text in single quotes and
/// any other character is copied literally.
fn pattern_to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut result, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut result, c);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i] == c {
            i += 1;
        }
        let run = i - start;

        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('Y', 2) => "%g",
            ('Y', _) => "%G",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 4) => "%A",
            ('E', _) => "%a",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('a', _) => "%p",
            _ => {
                for _ in 0..run {
                    push_literal(&mut result, c);
                }
                continue;
            }
        };
        result.push_str(directive);
    }

    result
}

fn push_literal(result: &mut String, c: char) {
    if c == '%' {
        result.push_str("%%");
    } else {
        result.push(c);
    }
}
