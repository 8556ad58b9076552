use crate::models::Block;

use super::normalize;

/// Literal marker separating strategy prose from the trailing checklist
pub const ACTION_MARKER: &str = "TO-DO:";

/// Typed content of one section: main blocks plus extracted action items
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmented {
    pub blocks: Vec<Block>,
    pub action_items: Vec<String>,
}

impl Segmented {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.action_items.is_empty()
    }
}

/// Splits raw text into typed blocks and a trailing action-item list
///
/// The marker is matched in the original text before normalization, at
/// its first occurrence; the pre-marker and post-marker halves
/// partition the input with no duplication. Without a marker the whole
/// text becomes main blocks. Empty input yields empty output.
pub fn segment(raw: &str) -> Segmented {
    match raw.split_once(ACTION_MARKER) {
        Some((head, tail)) => Segmented {
            blocks: blocks(head),
            action_items: action_items(tail),
        },
        None => Segmented {
            blocks: blocks(raw),
            action_items: Vec::new(),
        },
    }
}

/// Normalizes text and types each paragraph as a block
///
/// A paragraph whose trimmed text begins with `•` becomes a bullet
/// (marker stripped); all others become paragraphs.
pub fn blocks(raw: &str) -> Vec<Block> {
    normalize(raw)
        .split("\n\n")
        .filter_map(|para| {
            let para = para.trim();
            if para.is_empty() {
                return None;
            }
            Some(match para.strip_prefix('•') {
                Some(rest) => Block::Bullet(rest.trim_start().to_string()),
                None => Block::Paragraph(para.to_string()),
            })
        })
        .collect()
}

/// Normalizes the post-marker tail into plain checklist strings
fn action_items(tail: &str) -> Vec<String> {
    normalize(tail)
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('•').unwrap_or(line).trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}
