//! Content module - post documents and rich-text processing

mod post;
pub mod richtext;

pub use post::{parse_timestamp, Banner, ContentSection, PostData, RawPost};
pub use richtext::{Block, BlockKind, RichText};
