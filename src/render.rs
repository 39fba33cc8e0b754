//! Plain-text rendering of decoded messages for terminal output.

use chrono::{DateTime, Utc};

use crate::slack::{Accessory, Block, File, Message, Reaction, RichTextElement};
use crate::utils::format_size;

const SLACKBOT_AUTHOR: &str = "Slackbot";
const INDENT: &str = "    ";

/// Render one message as a header line followed by indented content
pub fn render_message(message: &Message) -> String {
    let mut lines = Vec::new();

    match message {
        Message::User(msg) => {
            let edited = if msg.edited { " (edited)" } else { "" };
            lines.push(format!(
                "[{}] {}{}",
                format_time(&msg.timestamp),
                msg.author,
                edited
            ));
            for block in &msg.blocks {
                lines.extend(render_block(block));
            }
        }
        Message::Slackbot(msg) => {
            lines.push(format!(
                "[{}] {}",
                format_time(&msg.timestamp),
                SLACKBOT_AUTHOR
            ));
            lines.extend(msg.text.lines().map(str::to_string));
        }
        Message::Files(msg) => {
            lines.push(format!("[{}] (file upload)", format_time(&msg.timestamp)));
            lines.extend(msg.text.lines().map(str::to_string));
        }
    }

    lines.extend(message.files().iter().map(render_file));
    if !message.reactions().is_empty() {
        lines.push(render_reactions(message.reactions()));
    }

    let mut lines = lines.into_iter();
    let mut out = lines.next().unwrap_or_default();
    for line in lines {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(&line);
    }
    out
}

fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a block as zero or more lines
pub fn render_block(block: &Block) -> Vec<String> {
    match block {
        Block::RichText(elements) | Block::Context(elements) => {
            split_lines(&render_elements(elements))
        }
        Block::Header(text) => vec![format!("# {}", text)],
        Block::Image { url, alt } => vec![format!("[image: {}] {}", alt, url)],
        Block::Divider => vec!["---".to_string()],
        Block::Section { content, accessory } => {
            let mut lines = split_lines(&render_elements(content));
            match accessory {
                Some(Accessory::Button { text, url }) => lines.push(format!("[{}] {}", text, url)),
                Some(Accessory::Image { url, alt }) => {
                    lines.push(format!("[image: {}] {}", alt, url))
                }
                None => {}
            }
            lines
        }
    }
}

/// Render inline elements to text; quotes and preformatted runs span lines
pub fn render_elements(elements: &[RichTextElement]) -> String {
    let mut out = String::new();
    for element in elements {
        match element {
            RichTextElement::Text(text) | RichTextElement::Markdown(text) => out.push_str(text),
            RichTextElement::Link { url, text } if text == url => out.push_str(url),
            RichTextElement::Link { url, text } => {
                out.push_str(&format!("{} <{}>", text, url));
            }
            RichTextElement::InlineCode(code) => out.push_str(&format!("`{}`", code)),
            RichTextElement::Emoji(name) => out.push_str(&format!(":{}:", name)),
            RichTextElement::User(id) | RichTextElement::UserGroup(id) => {
                out.push_str(&format!("@{}", id))
            }
            RichTextElement::Broadcast(range) => out.push_str(&format!("@{}", range)),
            RichTextElement::Channel(id) => out.push_str(&format!("#{}", id)),
            RichTextElement::Color(value) => out.push_str(value),
            RichTextElement::Quote(children) => {
                start_line(&mut out);
                let quoted = render_elements(children);
                let lines: Vec<_> = quoted.lines().map(|line| format!("> {}", line)).collect();
                out.push_str(&lines.join("\n"));
                out.push('\n');
            }
            RichTextElement::Preformatted(children) => {
                start_line(&mut out);
                out.push_str("```\n");
                out.push_str(render_elements(children).trim_end_matches('\n'));
                out.push_str("\n```\n");
            }
        }
    }
    out
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.trim_end_matches('\n')
        .lines()
        .map(str::to_string)
        .collect()
}

fn render_file(file: &File) -> String {
    format!(
        "[file: {} ({}, {})] {}",
        file.name,
        file.mime_type,
        format_size(file.size),
        file.url
    )
}

fn render_reactions(reactions: &[Reaction]) -> String {
    reactions
        .iter()
        .map(|r| format!(":{}: {}", r.name, r.count))
        .collect::<Vec<_>>()
        .join("  ")
}
