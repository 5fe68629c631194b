use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a block, stable for the block's lifetime
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Allocate a fresh id. Ids are never reused.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BlockId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Block type. Determines how `content` is interpreted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Plain or formatter-produced marked-up text
    Text,
    /// Newline-delimited list items
    List,
    /// Source text, highlighted by `language`
    Code,
    /// Reserved in the persisted shape; nothing produces it
    Image,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Image => "image",
        }
    }

    /// Content a freshly created block of this kind starts with
    pub fn default_content(&self) -> &'static str {
        ""
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(BlockKind::Text),
            "list" => Ok(BlockKind::List),
            "code" => Ok(BlockKind::Code),
            "image" => Ok(BlockKind::Image),
            other => Err(format!("unknown block kind: {other}")),
        }
    }
}

/// Atomic unit of document content
///
/// The serialized shape matches the persisted document JSON: the kind is
/// stored under `type` and `language` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Block {
    /// The language of a code block, if one is set and non-blank
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }

    /// Non-empty lines of a list block's content
    pub fn list_items(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').filter(|item| !item.is_empty())
    }
}

/// Request to create a block, or the target of a transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlock {
    pub kind: BlockKind,
    pub content: Option<String>,
    pub language: Option<String>,
}

impl NewBlock {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            content: None,
            language: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Text).with_content(content)
    }

    pub fn list(content: impl Into<String>) -> Self {
        Self::new(BlockKind::List).with_content(content)
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(BlockKind::Code)
            .with_language(language)
            .with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
