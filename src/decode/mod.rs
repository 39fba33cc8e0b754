//! Decoding of raw archive records into typed messages.
//!
//! The pipeline has three layers:
//!
//! - [`message`] classifies a record (user, slackbot or files message, or a
//!   suppressed join/leave event) and decodes its metadata
//! - [`blocks`] turns a record's `blocks` (or bare `text`) into [`Block`]s
//! - [`rich_text`] recursively decodes inline nodes into a flat list of
//!   [`RichTextElement`]s
//!
//! All decoders are pure functions over [`JsonNode`], so they can be driven
//! by any JSON representation.
//!
//! # Error Handling Strategy
//!
//! Every failure names the offending type or field. A day log is decoded
//! all-or-nothing by default ([`BatchPolicy::Abort`]); [`BatchPolicy::Skip`]
//! keeps the good records and returns the rejected ones in the report.
//!
//! [`Block`]: crate::slack::Block
//! [`RichTextElement`]: crate::slack::RichTextElement

pub mod blocks;
pub mod error;
pub mod json;
pub mod message;
pub mod rich_text;

use serde::{Deserialize, Serialize};

pub use blocks::{decode_block, decode_blocks};
pub use error::{DecodeError, DecodeResult};
pub use json::JsonNode;
pub use message::{DecodeReport, SkippedRecord, decode_day, decode_messages, decode_record};
pub use rich_text::decode_rich_text;

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest rich-text nesting accepted before a record is rejected
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What to do with a day log that contains undecodable records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPolicy {
    /// Fail the whole day on the first bad record
    #[default]
    Abort,
    /// Drop bad records and report them alongside the decoded messages
    Skip,
}
