use serde::{Deserialize, Serialize};

/// A normalized unit of document content
///
/// Bullet text is stored without the leading marker; the renderer
/// re-draws it with bullet styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    /// Body paragraph (justified, first-line indent)
    Paragraph(String),
    /// Bullet item (hanging indent, no first-line indent)
    Bullet(String),
}

impl Block {
    /// The text content without any marker
    pub fn text(&self) -> &str {
        match self {
            Block::Paragraph(text) | Block::Bullet(text) => text,
        }
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self, Block::Bullet(_))
    }
}
