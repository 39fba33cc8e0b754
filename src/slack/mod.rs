pub mod date_key;
pub mod types;

pub use date_key::{DateKey, format_date_key, parse_date_key};
pub use types::{
    Accessory, Block, ChannelInfo, File, FilesMessage, Message, Reaction, RichTextElement,
    SlackbotMessage, UserMessage,
};
