use std::fmt;

use crate::models::{Block, BlockKind};

/// A single kind-specific constraint violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All violations found for one block, reported together
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        f.write_str(&messages.join(", "))
    }
}

/// Check a block against the rules for its kind
pub fn validate(block: &Block) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match block.kind {
        BlockKind::Code => {
            if block.language().is_none() {
                errors.push(ValidationError {
                    field: "language",
                    message: "Language is required for code blocks",
                });
            }
        }
        BlockKind::List => {
            if block.content.trim().is_empty() {
                errors.push(ValidationError {
                    field: "content",
                    message: "List must have at least one item",
                });
            }
        }
        BlockKind::Text => {}
        BlockKind::Image => errors.push(ValidationError {
            field: "type",
            message: "Image blocks are not supported",
        }),
    }
    errors
}

/// `validate` folded into a `Result`
pub fn ensure_valid(block: &Block) -> Result<(), ValidationErrors> {
    let errors = validate(block);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
