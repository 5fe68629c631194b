use crate::export::{Converter, ExportError};
use crate::models::Block;

const STYLES: &str = ".doc-viewer {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.5;
}

.doc-viewer pre {
  background: #f5f5f5;
  padding: 1rem;
  border-radius: 4px;
  overflow-x: auto;
}

.doc-viewer ul {
  padding-left: 1.5rem;
  margin: 1rem 0;
}

.doc-viewer li {
  margin: 0.25rem 0;
}

.doc-viewer p {
  margin: 1rem 0;
}
";

const RENDER_BODY: &str = r#"
  const renderBlock = (block) => {
    switch (block.type) {
      case 'code':
        return React.createElement('pre', { key: block.id },
          React.createElement('code', { className: `language-${block.language}` },
            block.content
          )
        );
      case 'list':
        return React.createElement('ul', { key: block.id },
          block.content.split('\n')
            .filter(Boolean)
            .map((item, i) => React.createElement('li', { key: i }, item))
        );
      default:
        return React.createElement('p', { key: block.id }, block.content);
    }
  };

  return React.createElement('div', { className: 'doc-viewer' },
    [...blocks].sort((a, b) => a.order - b.order).map(renderBlock)
  );
}"#;

/// Self-contained React component source with the blocks as a literal
#[derive(Debug, Default, Clone, Copy)]
pub struct JsxConverter;

impl Converter for JsxConverter {
    fn convert(&self, blocks: &[Block]) -> Result<String, ExportError> {
        let literal = serde_json::to_string_pretty(blocks)
            .map_err(|e| ExportError::Converter(e.to_string()))?;
        let styles =
            serde_json::to_string(STYLES).map_err(|e| ExportError::Converter(e.to_string()))?;

        Ok(format!(
            r#"
function DocumentViewer({{ React }}) {{
  const blocks = {literal};

  React.useEffect(() => {{
    const styleSheet = document.createElement('style');
    styleSheet.textContent = {styles};
    document.head.appendChild(styleSheet);

    return () => {{
      document.head.removeChild(styleSheet);
    }};
  }}, []);
{RENDER_BODY}"#
        ))
    }
}
