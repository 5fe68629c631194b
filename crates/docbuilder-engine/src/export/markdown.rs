use crate::export::{Converter, ExportError};
use crate::models::{Block, BlockKind};

/// Markdown output: fenced code, `  - item` lists, paragraphs separated by
/// a blank line
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn convert_block(block: &Block) -> String {
        match block.kind {
            BlockKind::Code => format!(
                "```{}\n{}\n```\n\n",
                block.language.as_deref().unwrap_or(""),
                block.content
            ),
            BlockKind::List => {
                let items: Vec<String> =
                    block.list_items().map(|item| format!("  - {item}")).collect();
                format!("{}\n\n", items.join("\n"))
            }
            BlockKind::Text | BlockKind::Image => format!("{}\n\n", block.content),
        }
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, blocks: &[Block]) -> Result<String, ExportError> {
        let mut sorted: Vec<&Block> = blocks.iter().collect();
        sorted.sort_by_key(|block| block.order);
        Ok(sorted.into_iter().map(Self::convert_block).collect())
    }
}
