//! Viewer for statically exported Slack archives.
//!
//! The heart of the crate is [`decode`], which turns loosely structured
//! export records into the closed set of types in [`slack`]. The
//! [`archive`] layer reads `channels.json`, per-channel `days.json` and
//! per-day logs from a directory or a web server, and [`render`] /
//! [`cli`] present the result in a terminal.
//!
//! # Example
//!
//! ```
//! use slack_archive::decode::{DecodeOptions, decode_messages};
//! use slack_archive::slack::{Block, Message, RichTextElement};
//!
//! let raw = serde_json::json!([
//!     {"user": "U123", "text": "hello", "ts": "1609459200.000200"},
//!     {"subtype": "channel_join", "user": "U456", "ts": "1609459260.000100"}
//! ]);
//! let messages = decode_messages(&raw, &DecodeOptions::default())?;
//!
//! assert_eq!(messages.len(), 1);
//! let Message::User(msg) = &messages[0] else { unreachable!() };
//! assert_eq!(msg.author, "U123");
//! assert_eq!(msg.blocks, vec![Block::RichText(vec![RichTextElement::Text("hello".into())])]);
//! # Ok::<(), slack_archive::decode::DecodeError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod render;
pub mod slack;
pub mod utils;

pub use config::Config;
pub use decode::{decode_messages, decode_record};
pub use error::{ArchiveError, ArchiveResult};
pub use slack::{format_date_key, parse_date_key};
