//! Estimated reading time

use std::fmt;

use crate::config::{ReadingConfig, ReadingMode};
use crate::content::RawPost;

/// Estimated reading time in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    pub minutes: u64,
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

/// Reading time at 200 words per minute with split counting, as `"<N> min"`
pub fn estimate_reading_minutes(post: &RawPost) -> String {
    estimate_reading_time(post, &ReadingConfig::default()).to_string()
}

/// Sum the token count of every section and divide by the reading speed,
/// rounding up
pub fn estimate_reading_time(post: &RawPost, config: &ReadingConfig) -> ReadingTime {
    let total: u64 = post
        .section_texts()
        .map(|text| count_tokens(&text, config.mode))
        .sum();

    ReadingTime {
        minutes: total.div_ceil(config.words_per_minute.max(1)),
    }
}

/// Count the tokens of one section's plain text
///
/// `Split` mirrors splitting on `[^A-Za-z0-9_]` one UTF-16 code unit at a
/// time: every delimiter unit adds a piece, so the result is one more than
/// the number of delimiter units, empty pieces included. `Words` counts
/// runs of Unicode alphanumerics and underscores.
pub fn count_tokens(text: &str, mode: ReadingMode) -> u64 {
    match mode {
        ReadingMode::Split => {
            let delimiters: usize = text
                .chars()
                .filter(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
                .map(char::len_utf16)
                .sum();
            delimiters as u64 + 1
        }
        ReadingMode::Words => text
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| !word.is_empty())
            .count() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentSection, PostData};

    fn post_with_sections(texts: &[&str]) -> RawPost {
        let content = texts
            .iter()
            .map(|text| ContentSection {
                heading: "Heading".to_string(),
                body: serde_json::from_value(serde_json::json!([{ "text": text }])).unwrap(),
            })
            .collect();

        RawPost {
            id: String::new(),
            uid: Some("post".to_string()),
            doc_type: "post".to_string(),
            first_publication_date: None,
            last_publication_date: None,
            data: PostData {
                title: "Title".to_string(),
                banner: None,
                author: "Author".to_string(),
                content,
            },
        }
    }

    #[test]
    fn test_split_counts_empty_pieces() {
        assert_eq!(count_tokens("Hello world", ReadingMode::Split), 2);
        assert_eq!(count_tokens("", ReadingMode::Split), 1);
        assert_eq!(count_tokens("Hello, world.", ReadingMode::Split), 4);
        // non-ASCII letters are delimiters, astral characters count twice
        assert_eq!(count_tokens("não", ReadingMode::Split), 2);
        assert_eq!(count_tokens("🚀", ReadingMode::Split), 3);
    }

    #[test]
    fn test_words_mode() {
        assert_eq!(count_tokens("Hello, world.", ReadingMode::Words), 2);
        assert_eq!(count_tokens("não é", ReadingMode::Words), 2);
        assert_eq!(count_tokens("", ReadingMode::Words), 0);
    }

    #[test]
    fn test_no_sections_is_zero() {
        let post = post_with_sections(&[]);
        assert_eq!(estimate_reading_minutes(&post), "0 min");
    }

    #[test]
    fn test_rounds_up() {
        let post = post_with_sections(&["Hello world"]);
        assert_eq!(estimate_reading_minutes(&post), "1 min");

        // 200 words separated by 199 spaces give exactly 200 pieces
        let words = vec!["word"; 200].join(" ");
        let post = post_with_sections(&[words.as_str()]);
        assert_eq!(estimate_reading_minutes(&post), "1 min");

        let post = post_with_sections(&[words.as_str(), "x"]);
        assert_eq!(estimate_reading_minutes(&post), "2 min");
    }

    #[test]
    fn test_image_blocks_add_no_tokens() {
        let mut post = post_with_sections(&["Hello world"]);
        post.data.content[0].body = serde_json::from_value(serde_json::json!([
            { "type": "paragraph", "text": "Hello world", "spans": [] },
            { "type": "image", "url": "https://images.prismic.io/x.png" },
            { "type": "paragraph", "text": "Bye", "spans": [] }
        ]))
        .unwrap();

        let config = ReadingConfig {
            words_per_minute: 1,
            mode: ReadingMode::Split,
        };
        // "Hello world Bye" splits into three pieces
        assert_eq!(estimate_reading_time(&post, &config).minutes, 3);
    }

    #[test]
    fn test_custom_speed_and_mode() {
        let words = vec!["word"; 300].join(". ");
        let post = post_with_sections(&[words.as_str()]);

        let config = ReadingConfig {
            words_per_minute: 100,
            mode: ReadingMode::Words,
        };
        assert_eq!(estimate_reading_time(&post, &config).minutes, 3);

        let config = ReadingConfig {
            words_per_minute: 100,
            mode: ReadingMode::Split,
        };
        // 299 separators of two delimiters each
        assert_eq!(estimate_reading_time(&post, &config).minutes, 6);
    }
}
