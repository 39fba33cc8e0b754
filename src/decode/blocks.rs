use super::DecodeOptions;
use super::error::{DecodeError, DecodeResult};
use super::json::{JsonNode, array_field, nested_str_field, node_type, optional, str_field};
use super::rich_text::{decode_elements, decode_rich_text};
use crate::slack::{Accessory, Block, RichTextElement};

/// Decode the content of a raw record into blocks.
///
/// Records carrying a `blocks` array decode each block in order. Older,
/// plain messages only have `text`, which becomes a single rich-text block.
pub fn decode_blocks<V: JsonNode>(record: &V, options: &DecodeOptions) -> DecodeResult<Vec<Block>> {
    match optional(record, "blocks") {
        Some(blocks) => blocks
            .as_array()
            .ok_or_else(|| DecodeError::wrong_type("blocks", "array"))?
            .iter()
            .map(|block| decode_block(block, options))
            .collect(),
        None => {
            let text = str_field(record, "text")?;
            Ok(vec![Block::RichText(vec![RichTextElement::Text(
                text.to_string(),
            )])])
        }
    }
}

pub fn decode_block<V: JsonNode>(block: &V, options: &DecodeOptions) -> DecodeResult<Block> {
    match node_type(block)? {
        "rich_text" => Ok(Block::RichText(decode_elements(
            array_field(block, "elements")?,
            options,
            0,
        )?)),
        "header" => Ok(Block::Header(
            nested_str_field(block, "text", "text")?.to_string(),
        )),
        "image" => Ok(Block::Image {
            url: str_field(block, "image_url")?.to_string(),
            alt: str_field(block, "alt_text")?.to_string(),
        }),
        "divider" => Ok(Block::Divider),
        "section" => decode_section(block, options),
        "context" => Ok(Block::Context(decode_elements(
            array_field(block, "elements")?,
            options,
            0,
        )?)),
        other => Err(DecodeError::UnknownBlockType(other.to_string())),
    }
}

fn decode_section<V: JsonNode>(block: &V, options: &DecodeOptions) -> DecodeResult<Block> {
    let text = optional(block, "text");
    let fields = optional(block, "fields");
    if text.is_none() && fields.is_none() {
        return Err(DecodeError::MissingField("text".to_string()));
    }

    let mut content = match text {
        Some(text) => decode_rich_text(text, options)?,
        None => Vec::new(),
    };
    // Two-column layouts put their text objects under `fields`
    if fields.is_some() {
        content.extend(decode_elements(array_field(block, "fields")?, options, 0)?);
    }

    let accessory = optional(block, "accessory")
        .map(decode_accessory)
        .transpose()?;

    Ok(Block::Section { content, accessory })
}

fn decode_accessory<V: JsonNode>(accessory: &V) -> DecodeResult<Accessory> {
    match node_type(accessory)? {
        "image" => Ok(Accessory::Image {
            url: str_field(accessory, "image_url")?.to_string(),
            alt: str_field(accessory, "alt_text")?.to_string(),
        }),
        "button" => Ok(Accessory::Button {
            text: nested_str_field(accessory, "text", "text")?.to_string(),
            url: str_field(accessory, "url")?.to_string(),
        }),
        other => Err(DecodeError::UnknownAccessoryType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn decode(record: Value) -> DecodeResult<Vec<Block>> {
        decode_blocks(&record, &DecodeOptions::default())
    }

    fn text(s: &str) -> RichTextElement {
        RichTextElement::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_record_becomes_rich_text_block() {
        let blocks = decode(json!({"text": "hello"})).unwrap();
        assert_eq!(blocks, vec![Block::RichText(vec![text("hello")])]);
    }

    #[test]
    fn test_rich_text_section_is_flattened() {
        let blocks = decode(json!({
            "blocks": [{
                "type": "rich_text",
                "elements": [{
                    "type": "rich_text_section",
                    "elements": [{"type": "text", "text": "hi"}]
                }]
            }]
        }))
        .unwrap();

        assert_eq!(blocks, vec![Block::RichText(vec![text("hi")])]);
    }

    #[test]
    fn test_blocks_take_precedence_over_text() {
        let blocks = decode(json!({
            "text": "fallback",
            "blocks": [{"type": "divider"}]
        }))
        .unwrap();
        assert_eq!(blocks, vec![Block::Divider]);
    }

    #[test]
    fn test_empty_blocks_array() {
        let blocks = decode(json!({"text": "ignored", "blocks": []})).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_header_image_divider() {
        let blocks = decode(json!({
            "blocks": [
                {"type": "header", "text": {"type": "plain_text", "text": "Release notes"}},
                {"type": "image", "image_url": "https://img/cat.png", "alt_text": "a cat"},
                {"type": "divider"}
            ]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![
                Block::Header("Release notes".into()),
                Block::Image {
                    url: "https://img/cat.png".into(),
                    alt: "a cat".into(),
                },
                Block::Divider,
            ]
        );
    }

    #[test]
    fn test_section_with_button_accessory() {
        let blocks = decode(json!({
            "blocks": [{
                "type": "section",
                "text": {"type": "mrkdwn", "text": "*Deploy* finished"},
                "accessory": {
                    "type": "button",
                    "text": {"type": "plain_text", "text": "Open"},
                    "url": "https://ci/run/1"
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![Block::Section {
                content: vec![RichTextElement::Markdown("*Deploy* finished".into())],
                accessory: Some(Accessory::Button {
                    text: "Open".into(),
                    url: "https://ci/run/1".into(),
                }),
            }]
        );
    }

    #[test]
    fn test_section_with_image_accessory_and_fields() {
        let blocks = decode(json!({
            "blocks": [{
                "type": "section",
                "text": {"type": "plain_text", "text": "Status"},
                "fields": [
                    {"type": "mrkdwn", "text": "*Env*"},
                    {"type": "mrkdwn", "text": "prod"}
                ],
                "accessory": {"type": "image", "image_url": "https://img/ok.png", "alt_text": "ok"}
            }]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![Block::Section {
                content: vec![
                    text("Status"),
                    RichTextElement::Markdown("*Env*".into()),
                    RichTextElement::Markdown("prod".into()),
                ],
                accessory: Some(Accessory::Image {
                    url: "https://img/ok.png".into(),
                    alt: "ok".into(),
                }),
            }]
        );
    }

    #[test]
    fn test_section_without_text_or_fields_fails() {
        let err = decode(json!({"blocks": [{"type": "section"}]})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("text".into()));
    }

    #[test]
    fn test_unknown_accessory_type() {
        let err = decode(json!({
            "blocks": [{
                "type": "section",
                "text": {"type": "mrkdwn", "text": "pick"},
                "accessory": {"type": "static_select"}
            }]
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::UnknownAccessoryType("static_select".into()));
    }

    #[test]
    fn test_context_block() {
        let blocks = decode(json!({
            "blocks": [{
                "type": "context",
                "elements": [
                    {"type": "mrkdwn", "text": "Posted by"},
                    {"type": "user", "user_id": "U9"}
                ]
            }]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![Block::Context(vec![
                RichTextElement::Markdown("Posted by".into()),
                RichTextElement::User("U9".into()),
            ])]
        );
    }

    #[test]
    fn test_unknown_block_type_reports_type() {
        let err = decode(json!({"blocks": [{"type": "carousel"}]})).unwrap_err();
        assert_eq!(err, DecodeError::UnknownBlockType("carousel".into()));
        assert!(err.to_string().contains("carousel"));
    }

    #[test]
    fn test_record_without_blocks_or_text_fails() {
        let err = decode(json!({"ts": "1"})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("text".into()));
    }
}
