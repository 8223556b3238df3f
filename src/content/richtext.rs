//! Structured rich text
//!
//! Post bodies arrive as a list of blocks (paragraphs, headings, list
//! items, images, embeds), each carrying plain text plus formatting spans.
//! Span offsets count UTF-16 code units, as produced by the repository's
//! JavaScript editor.

use serde::{Deserialize, Serialize};

use crate::templates::html_escape as escape;

/// A rich-text field
pub type RichText = Vec<Block>;

/// A rich-text block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default)]
    pub label: Option<String>,

    // image
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,

    // embed
    #[serde(default)]
    pub oembed: Option<Embed>,
}

/// Block type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

/// Inline formatting over `start..end` of a block's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// oEmbed payload of an embed block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

/// Plain text of a rich-text field, blocks joined by a single space
///
/// Blocks without text (images, embeds) are skipped.
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a rich-text field to HTML
pub fn as_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut list: Option<&'static str> = None;

    for block in blocks {
        let item_list = match block.kind {
            BlockKind::ListItem => Some("ul"),
            BlockKind::OrderedListItem => Some("ol"),
            _ => None,
        };

        if list != item_list {
            if let Some(tag) = list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = item_list {
                out.push_str(&format!("<{}>", tag));
            }
            list = item_list;
        }

        render_block(&mut out, block);
    }

    if let Some(tag) = list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

fn render_block(out: &mut String, block: &Block) {
    let class = block
        .label
        .as_deref()
        .map(|l| format!(r#" class="{}""#, escape(l)))
        .unwrap_or_default();

    let tag = match block.kind {
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
        BlockKind::Heading4 => "h4",
        BlockKind::Heading5 => "h5",
        BlockKind::Heading6 => "h6",
        BlockKind::Preformatted => "pre",
        BlockKind::ListItem | BlockKind::OrderedListItem => "li",
        BlockKind::Image => {
            out.push_str(&format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                escape(block.url.as_deref().unwrap_or_default()),
                escape(block.alt.as_deref().unwrap_or_default()),
            ));
            return;
        }
        BlockKind::Embed => {
            let embed = block.oembed.clone().unwrap_or_default();
            out.push_str(&format!(
                r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}"{}>{}</div>"#,
                escape(embed.embed_url.as_deref().unwrap_or_default()),
                escape(embed.kind.as_deref().unwrap_or_default()),
                escape(embed.provider_name.as_deref().unwrap_or_default()),
                class,
                embed.html.as_deref().unwrap_or_default(),
            ));
            return;
        }
        BlockKind::Paragraph | BlockKind::Unknown => "p",
    };

    out.push_str(&format!("<{}{}>", tag, class));
    out.push_str(&render_spans(&block.text, &block.spans));
    out.push_str(&format!("</{}>", tag));
}

/// Render text with its spans applied, reopening spans that overlap
/// without nesting
fn render_spans(text: &str, spans: &[Span]) -> String {
    let len: usize = text.chars().map(char::len_utf16).sum();
    let mut spans: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < len)
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;
    let mut offset = 0;

    for ch in text.chars() {
        close_spans(&mut out, &mut open, offset);
        while next < spans.len() && spans[next].start <= offset {
            open_tag(&mut out, spans[next]);
            open.push(spans[next]);
            next += 1;
        }
        push_escaped(&mut out, ch);
        offset += ch.len_utf16();
    }
    close_spans(&mut out, &mut open, usize::MAX);

    out
}

fn close_spans<'a>(out: &mut String, open: &mut Vec<&'a Span>, offset: usize) {
    while let Some(idx) = open.iter().position(|s| s.end <= offset) {
        let inner: Vec<&Span> = open.drain(idx..).collect();
        for span in inner.iter().rev() {
            close_tag(out, span);
        }
        for span in inner.into_iter().skip(1) {
            if span.end > offset {
                open_tag(out, span);
                open.push(span);
            }
        }
    }
}

fn open_tag(out: &mut String, span: &Span) {
    let data = span.data.clone().unwrap_or_default();
    match span.kind {
        SpanKind::Strong => out.push_str("<strong>"),
        SpanKind::Em => out.push_str("<em>"),
        SpanKind::Hyperlink => {
            out.push_str(&format!(
                r#"<a href="{}""#,
                escape(data.url.as_deref().unwrap_or_default())
            ));
            if let Some(target) = data.target.as_deref() {
                out.push_str(&format!(
                    r#" target="{}" rel="noopener noreferrer""#,
                    escape(target)
                ));
            }
            out.push('>');
        }
        SpanKind::Label => out.push_str(&format!(
            r#"<span class="{}">"#,
            escape(data.label.as_deref().unwrap_or_default())
        )),
        SpanKind::Unknown => out.push_str("<span>"),
    }
}

fn close_tag(out: &mut String, span: &Span) {
    out.push_str(match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label | SpanKind::Unknown => "</span>",
    });
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        '\n' => out.push_str("<br />"),
        _ => out.push(ch),
    }
}
