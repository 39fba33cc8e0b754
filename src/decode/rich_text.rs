//! Recursive decoder for inline rich-text nodes.
//!
//! Every node decodes to a *list* of elements. `rich_text_section` and
//! `rich_text_list` are transparent containers whose children are spliced
//! into the parent list; `rich_text_quote` and `rich_text_preformatted`
//! keep a single wrapping element around their children.

use super::DecodeOptions;
use super::error::{DecodeError, DecodeResult};
use super::json::{JsonNode, array_field, node_type, optional, required, str_field};
use crate::slack::RichTextElement;

/// Decode one rich-text node into zero or more elements
pub fn decode_rich_text<V: JsonNode>(
    node: &V,
    options: &DecodeOptions,
) -> DecodeResult<Vec<RichTextElement>> {
    decode_element(node, options, 0)
}

/// Decode a sibling list, concatenating each node's elements in order
pub(crate) fn decode_elements<V: JsonNode>(
    nodes: &[V],
    options: &DecodeOptions,
    depth: usize,
) -> DecodeResult<Vec<RichTextElement>> {
    let mut elements = Vec::with_capacity(nodes.len());
    for node in nodes {
        elements.extend(decode_element(node, options, depth)?);
    }
    Ok(elements)
}

fn decode_element<V: JsonNode>(
    node: &V,
    options: &DecodeOptions,
    depth: usize,
) -> DecodeResult<Vec<RichTextElement>> {
    if depth > options.max_depth {
        return Err(DecodeError::TooDeep {
            limit: options.max_depth,
        });
    }

    let element = match node_type(node)? {
        "rich_text_section" | "rich_text_list" => return decode_children(node, options, depth),
        "rich_text_preformatted" => {
            RichTextElement::Preformatted(decode_children(node, options, depth)?)
        }
        "rich_text_quote" => RichTextElement::Quote(decode_children(node, options, depth)?),
        "text" => decode_text(node)?,
        "mrkdwn" => RichTextElement::Markdown(owned(node, "text")?),
        "link" => decode_link(node)?,
        "emoji" => RichTextElement::Emoji(owned(node, "name")?),
        "plain_text" => RichTextElement::Text(plain_text(node)?),
        "user" => RichTextElement::User(owned(node, "user_id")?),
        "channel" => RichTextElement::Channel(owned(node, "channel_id")?),
        "color" => RichTextElement::Color(owned(node, "value")?),
        "broadcast" => RichTextElement::Broadcast(owned(node, "range")?),
        "usergroup" => RichTextElement::UserGroup(owned(node, "usergroup_id")?),
        other => return Err(DecodeError::UnknownElementType(other.to_string())),
    };

    Ok(vec![element])
}

fn decode_children<V: JsonNode>(
    node: &V,
    options: &DecodeOptions,
    depth: usize,
) -> DecodeResult<Vec<RichTextElement>> {
    decode_elements(array_field(node, "elements")?, options, depth + 1)
}

fn decode_text<V: JsonNode>(node: &V) -> DecodeResult<RichTextElement> {
    let text = owned(node, "text")?;
    let is_code = optional(node, "style")
        .and_then(|style| optional(style, "code"))
        .and_then(|code| code.as_bool())
        .unwrap_or(false);

    Ok(if is_code {
        RichTextElement::InlineCode(text)
    } else {
        RichTextElement::Text(text)
    })
}

fn decode_link<V: JsonNode>(node: &V) -> DecodeResult<RichTextElement> {
    let url = owned(node, "url")?;
    let text = match optional(node, "text") {
        Some(text) => text
            .as_str()
            .ok_or_else(|| DecodeError::wrong_type("text", "string"))?
            .to_string(),
        None => url.clone(),
    };
    Ok(RichTextElement::Link { url, text })
}

// `plain_text` carries its content under `text.text`; section and context
// text objects put the string directly in `text`.
fn plain_text<V: JsonNode>(node: &V) -> DecodeResult<String> {
    let text = required(node, "text")?;
    if let Some(s) = text.as_str() {
        return Ok(s.to_string());
    }
    str_field(text, "text")
        .map(str::to_string)
        .map_err(|_| DecodeError::MissingField("text.text".to_string()))
}

fn owned<V: JsonNode>(node: &V, key: &str) -> DecodeResult<String> {
    str_field(node, key).map(str::to_string)
}
