use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded archive record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    User(UserMessage),
    Slackbot(SlackbotMessage),
    Files(FilesMessage),
}

impl Message {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Message::User(msg) => msg.timestamp,
            Message::Slackbot(msg) => msg.timestamp,
            Message::Files(msg) => msg.timestamp,
        }
    }

    pub fn reactions(&self) -> &[Reaction] {
        match self {
            Message::User(msg) => &msg.reactions,
            Message::Slackbot(msg) => &msg.reactions,
            Message::Files(msg) => &msg.reactions,
        }
    }

    pub fn files(&self) -> &[File] {
        match self {
            Message::User(msg) => &msg.files,
            Message::Slackbot(_) => &[],
            Message::Files(msg) => &msg.files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMessage {
    pub author: String,
    pub avatar_url: Option<String>,
    pub blocks: Vec<Block>,
    pub files: Vec<File>,
    pub reactions: Vec<Reaction>,
    pub timestamp: DateTime<Utc>,
    pub edited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackbotMessage {
    pub text: String,
    pub reactions: Vec<Reaction>,
    pub timestamp: DateTime<Utc>,
}

/// File upload posted without a full author profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesMessage {
    pub files: Vec<File>,
    pub text: String,
    pub reactions: Vec<Reaction>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Block {
    RichText(Vec<RichTextElement>),
    Header(String),
    Image {
        url: String,
        alt: String,
    },
    Divider,
    Section {
        content: Vec<RichTextElement>,
        accessory: Option<Accessory>,
    },
    Context(Vec<RichTextElement>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Button { text: String, url: String },
    Image { url: String, alt: String },
}

/// Inline rich-text content. Container nodes such as sections and lists
/// are flattened into their parent; quotes and preformatted runs keep
/// their own wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RichTextElement {
    Text(String),
    Link { url: String, text: String },
    InlineCode(String),
    Emoji(String),
    Quote(Vec<RichTextElement>),
    Preformatted(Vec<RichTextElement>),
    User(String),
    Channel(String),
    Color(String),
    Markdown(String),
    /// `@here`, `@channel` or `@everyone`
    Broadcast(String),
    UserGroup(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    pub name: String,
    pub count: u64,
}

/// Entry of the archive's top-level `channels.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub created: Option<i64>,
    pub creator: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_general: bool,
    #[serde(default)]
    pub members: Vec<String>,
    pub topic: Option<ChannelTopic>,
    pub purpose: Option<ChannelPurpose>,
}

impl ChannelInfo {
    pub fn topic(&self) -> Option<&str> {
        self.topic
            .as_ref()
            .map(|t| t.value.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose
            .as_ref()
            .map(|p| p.value.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelTopic {
    pub value: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub last_set: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPurpose {
    pub value: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub last_set: i64,
}
