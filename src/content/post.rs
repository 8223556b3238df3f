//! Post documents as returned by the content repository

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use super::richtext::{self, RichText};

/// A blog post document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    /// Repository document id
    #[serde(default)]
    pub id: String,

    /// Slug (URL-friendly identifier)
    #[serde(default)]
    pub uid: Option<String>,

    /// Document type
    #[serde(rename = "type", default)]
    pub doc_type: String,

    /// First publication date
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    /// Last publication date
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_publication_date: Option<DateTime<FixedOffset>>,

    /// Document fields
    pub data: PostData,
}

/// Fields of a post document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostData {
    pub title: String,

    /// Banner image; empty image fields arrive as `{}` or `null`
    #[serde(default)]
    pub banner: Option<Banner>,

    pub author: String,

    #[serde(default)]
    pub content: Vec<ContentSection>,
}

/// Banner image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A section of post content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: RichText,
}

impl RawPost {
    /// Banner URL, if the document has a non-empty one
    pub fn banner_url(&self) -> Option<&str> {
        self.data
            .banner
            .as_ref()
            .and_then(|b| b.url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Plain text of every section body
    pub fn section_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.data
            .content
            .iter()
            .map(|section| richtext::as_text(&section.body))
    }
}

/// Parse a repository timestamp such as `2021-04-19T19:25:28+0000`
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const DOCUMENT: &str = r#"{
        "id": "YH2lLhIAACMAQn5b",
        "uid": "como-utilizar-hooks",
        "type": "post",
        "first_publication_date": "2021-04-19T19:25:28+0000",
        "last_publication_date": "2021-04-20T10:00:00+0000",
        "data": {
            "title": "Como utilizar Hooks",
            "banner": { "url": "https://images.prismic.io/space/banner.png", "alt": null },
            "author": "Joseph Oliveira",
            "content": [
                {
                    "heading": "Proin et varius",
                    "body": [ { "type": "paragraph", "text": "Lorem ipsum dolor", "spans": [] } ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_document() {
        let post: RawPost = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(post.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(post.data.content.len(), 1);
        assert_eq!(
            post.banner_url(),
            Some("https://images.prismic.io/space/banner.png")
        );

        let published = post.first_publication_date.unwrap();
        assert_eq!(published.year(), 2021);
        assert_eq!(published.day(), 19);
        assert_eq!(published.hour(), 19);
    }

    #[test]
    fn test_empty_banner() {
        let json = r#"{
            "first_publication_date": null,
            "data": { "title": "T", "banner": {}, "author": "A", "content": [] }
        }"#;
        let post: RawPost = serde_json::from_str(json).unwrap();
        assert!(post.first_publication_date.is_none());
        assert!(post.banner_url().is_none());

        let json = r#"{ "data": { "title": "T", "banner": null, "author": "A" } }"#;
        let post: RawPost = serde_json::from_str(json).unwrap();
        assert!(post.banner_url().is_none());
        assert!(post.data.content.is_empty());
    }

    #[test]
    fn test_missing_author_fails() {
        let json = r#"{ "data": { "title": "T", "content": [] } }"#;
        assert!(serde_json::from_str::<RawPost>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2021-04-19T19:25:28+0000").is_some());
        assert!(parse_timestamp("2021-04-19T19:25:28+00:00").is_some());
        assert!(parse_timestamp("2021-04-19T19:25:28Z").is_some());
        assert!(parse_timestamp("19/04/2021").is_none());
    }
}
