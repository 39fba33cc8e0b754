use chrono::{DateTime, Utc};
use tracing::{trace, warn};

use super::blocks::decode_blocks;
use super::error::{DecodeError, DecodeResult};
use super::json::{
    JsonNode, array_field, opt_array_field, opt_str_field, optional, str_field, u64_field,
};
use super::{BatchPolicy, DecodeOptions};
use crate::slack::{File, FilesMessage, Message, Reaction, SlackbotMessage, UserMessage};

const SUBTYPE_CHANNEL_JOIN: &str = "channel_join";
const SUBTYPE_CHANNEL_LEAVE: &str = "channel_leave";
const SUBTYPE_SLACKBOT_RESPONSE: &str = "slackbot_response";

/// Profile fields tried in order before falling back to the raw user ID
const NAME_FIELDS: [&str; 4] = ["display_name", "name", "real_name", "first_name"];

/// A record dropped from a day log under [`BatchPolicy::Skip`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: DecodeError,
}

/// Outcome of decoding one day log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    pub messages: Vec<Message>,
    pub skipped: Vec<SkippedRecord>,
}

/// Classify and decode one raw record.
///
/// Returns `Ok(None)` for channel join/leave events, which are dropped
/// from the log rather than treated as errors.
pub fn decode_record<V: JsonNode>(
    record: &V,
    options: &DecodeOptions,
) -> DecodeResult<Option<Message>> {
    if let Some(subtype) = optional(record, "subtype") {
        let subtype = subtype
            .as_str()
            .ok_or_else(|| DecodeError::wrong_type("subtype", "string"))?;
        return match subtype {
            SUBTYPE_CHANNEL_JOIN | SUBTYPE_CHANNEL_LEAVE => {
                trace!(subtype, "Suppressing membership event");
                Ok(None)
            }
            SUBTYPE_SLACKBOT_RESPONSE => {
                decode_slackbot(record).map(|m| Some(Message::Slackbot(m)))
            }
            other => Err(DecodeError::UnknownSubtype(other.to_string())),
        };
    }

    // A resolvable author commits the record to the user-message shape, so
    // content errors further down are reported instead of masked.
    let author_error = match resolve_author(record)? {
        Some(Ok(author)) => {
            return decode_user(record, author, options).map(|m| Some(Message::User(m)));
        }
        Some(Err(err)) => Some(err),
        None => None,
    };

    if has_files_shape(record) {
        return decode_files(record).map(|m| Some(Message::Files(m)));
    }

    Err(author_error.unwrap_or(DecodeError::UnrecognizedMessage))
}

/// Decode a whole day log, failing on the first bad record
pub fn decode_messages<V: JsonNode>(
    raw: &V,
    options: &DecodeOptions,
) -> DecodeResult<Vec<Message>> {
    decode_day(raw, options, BatchPolicy::Abort).map(|report| report.messages)
}

/// Decode a whole day log under the given batch policy
pub fn decode_day<V: JsonNode>(
    raw: &V,
    options: &DecodeOptions,
    policy: BatchPolicy,
) -> DecodeResult<DecodeReport> {
    let records = raw.as_array().ok_or(DecodeError::NotAnArray)?;
    let mut report = DecodeReport {
        messages: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };

    for (index, record) in records.iter().enumerate() {
        match decode_record(record, options) {
            Ok(Some(message)) => report.messages.push(message),
            Ok(None) => {}
            Err(error) => match policy {
                BatchPolicy::Abort => return Err(error.at_record(index)),
                BatchPolicy::Skip => {
                    warn!("Skipping record {}: {}", index, error);
                    report.skipped.push(SkippedRecord { index, error });
                }
            },
        }
    }

    Ok(report)
}

/// `None` when the record has no `user` field at all; otherwise the first
/// non-empty name among the profile fields and the user ID.
fn resolve_author<V: JsonNode>(record: &V) -> DecodeResult<Option<DecodeResult<String>>> {
    let Some(user_id) = opt_str_field(record, "user")? else {
        return Ok(None);
    };

    let profile = optional(record, "user_profile");
    let mut candidates = Vec::with_capacity(NAME_FIELDS.len() + 1);
    if let Some(profile) = profile {
        for field in NAME_FIELDS {
            candidates.push(optional(profile, field).and_then(|v| v.as_str()));
        }
    }
    candidates.push(Some(user_id));

    let name = candidates
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or(DecodeError::NoDisplayName);

    Ok(Some(name))
}

fn has_files_shape<V: JsonNode>(record: &V) -> bool {
    optional(record, "files").and_then(|f| f.as_array()).is_some()
        && optional(record, "text").and_then(|t| t.as_str()).is_some()
}

fn decode_user<V: JsonNode>(
    record: &V,
    author: String,
    options: &DecodeOptions,
) -> DecodeResult<UserMessage> {
    let avatar_url = optional(record, "user_profile")
        .and_then(|profile| optional(profile, "image_72"))
        .and_then(|url| url.as_str())
        .map(str::to_string);

    Ok(UserMessage {
        author,
        avatar_url,
        blocks: decode_blocks(record, options)?,
        files: decode_file_list(record)?,
        reactions: decode_reactions(record)?,
        timestamp: decode_timestamp(str_field(record, "ts")?)?,
        edited: optional(record, "edited").is_some(),
    })
}

fn decode_slackbot<V: JsonNode>(record: &V) -> DecodeResult<SlackbotMessage> {
    Ok(SlackbotMessage {
        text: str_field(record, "text")?.to_string(),
        reactions: decode_reactions(record)?,
        timestamp: decode_timestamp(str_field(record, "ts")?)?,
    })
}

fn decode_files<V: JsonNode>(record: &V) -> DecodeResult<FilesMessage> {
    Ok(FilesMessage {
        files: array_field(record, "files")?
            .iter()
            .map(decode_file)
            .collect::<DecodeResult<_>>()?,
        text: str_field(record, "text")?.to_string(),
        reactions: decode_reactions(record)?,
        timestamp: decode_timestamp(str_field(record, "ts")?)?,
    })
}

fn decode_file_list<V: JsonNode>(record: &V) -> DecodeResult<Vec<File>> {
    opt_array_field(record, "files")?
        .iter()
        .map(decode_file)
        .collect()
}

fn decode_file<V: JsonNode>(file: &V) -> DecodeResult<File> {
    Ok(File {
        name: str_field(file, "name")?.to_string(),
        mime_type: str_field(file, "mimetype")?.to_string(),
        size: u64_field(file, "size")?,
        url: str_field(file, "url_private")?.to_string(),
    })
}

fn decode_reactions<V: JsonNode>(record: &V) -> DecodeResult<Vec<Reaction>> {
    opt_array_field(record, "reactions")?
        .iter()
        .map(|reaction| {
            Ok(Reaction {
                name: str_field(reaction, "name")?.to_string(),
                count: u64_field(reaction, "count")?,
            })
        })
        .collect()
}

/// Slack timestamps are fractional seconds ("1609459200.000200"); the
/// fraction is a per-channel sequence number, so only whole seconds are kept.
pub(crate) fn decode_timestamp(ts: &str) -> DecodeResult<DateTime<Utc>> {
    let invalid = || DecodeError::InvalidTimestamp(ts.to_string());

    let seconds = ts.trim().parse::<f64>().map_err(|_| invalid())?;
    if !seconds.is_finite() {
        return Err(invalid());
    }

    let millis = (seconds.floor() as i64)
        .checked_mul(1000)
        .ok_or_else(invalid)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(invalid)
}
