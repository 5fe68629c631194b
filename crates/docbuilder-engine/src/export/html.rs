use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::export::{Converter, ExportError};
use crate::models::{Block, BlockKind};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Documentation</title>
    <link href="https://cdn.jsdelivr.net/npm/prismjs@1.29.0/themes/prism.min.css" rel="stylesheet" />
    <style>
      body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.5; max-width: 800px; margin: 0 auto; padding: 2rem; }
      pre { background: #f5f5f5; padding: 1rem; border-radius: 4px; overflow-x: auto; }
      ul { padding-left: 1.5rem; }
    </style>
</head>
<body>
{{content}}
    <script src="https://cdn.jsdelivr.net/npm/prismjs@1.29.0/prism.min.js"></script>
    <script>Prism.highlightAll();</script>
</body>
</html>
"#;

/// Standalone HTML page with Prism highlighting for code blocks
///
/// Text and list content is formatter markup and is embedded as is; code is
/// escaped.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlConverter;

impl HtmlConverter {
    pub fn convert_block(block: &Block) -> String {
        match block.kind {
            BlockKind::Code => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                encode_double_quoted_attribute(block.language.as_deref().unwrap_or("")),
                encode_text(&block.content)
            ),
            BlockKind::List => {
                let items: Vec<String> = block
                    .list_items()
                    .map(|item| format!("      <li>{item}</li>"))
                    .collect();
                format!("    <ul>\n{}\n    </ul>", items.join("\n"))
            }
            BlockKind::Text | BlockKind::Image => format!("<p>{}</p>", block.content),
        }
    }
}

impl Converter for HtmlConverter {
    fn convert(&self, blocks: &[Block]) -> Result<String, ExportError> {
        let mut sorted: Vec<&Block> = blocks.iter().collect();
        sorted.sort_by_key(|block| block.order);
        let body: Vec<String> = sorted.into_iter().map(Self::convert_block).collect();
        Ok(TEMPLATE.replace("{{content}}", &body.join("\n")))
    }
}
