//! Message bundles: ordered `key=template` entries.

use super::{MESSAGES, ParsedSource, Parser, utf8};
use crate::error::ParseError;
use crate::options::ParseOptions;
use indexmap::IndexMap;
use shapegen_core::read_entries;

/// One message of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub key: String,
    pub template: String,
    pub line: usize,
}

/// Parser for message bundles. Same lexical format as `.properties`, but
/// keys stay flat and values stay text.
pub struct MessageBundleParser;

impl Parser for MessageBundleParser {
    fn media_type(&self) -> &'static str {
        MESSAGES
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    fn parse(&self, input: &[u8], _options: &ParseOptions) -> Result<ParsedSource, ParseError> {
        let text = utf8(input, "messages")?;
        parse_messages(text).map(ParsedSource::Messages)
    }
}

/// Read bundle entries. A repeated key keeps its first position and its
/// last template.
pub fn parse_messages(text: &str) -> Result<Vec<MessageEntry>, ParseError> {
    let mut entries: IndexMap<String, MessageEntry> = IndexMap::new();
    for entry in read_entries(text).map_err(|e| ParseError::format("messages", e))? {
        entries.insert(
            entry.key.clone(),
            MessageEntry {
                key: entry.key,
                template: entry.value,
                line: entry.line,
            },
        );
    }
    tracing::debug!(messages = entries.len(), "parsed message bundle");
    Ok(entries.into_values().collect())
}
