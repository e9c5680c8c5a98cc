//! Context assembly from retrieved chunks

use crate::models::RetrievedChunk;

/// Characters of a chunk shown in `context_retrieved`
pub const PREVIEW_CHARS: usize = 200;

/// Marker appended to every preview
pub const PREVIEW_SUFFIX: &str = "...";

/// Joins retrieved chunks into the prompt context
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    separator: String,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            separator: "\n\n".to_string(),
        }
    }
}

impl ContextAssembler {
    /// Chunk texts in rank order, separated by blank lines
    #[must_use]
    pub fn assemble(&self, chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// One preview per chunk, in rank order
    #[must_use]
    pub fn previews(&self, chunks: &[RetrievedChunk]) -> Vec<String> {
        chunks.iter().map(|c| preview(&c.text)).collect()
    }
}

/// First [`PREVIEW_CHARS`] characters of `text` followed by [`PREVIEW_SUFFIX`].
///
/// The suffix is added even to texts shorter than the limit.
#[must_use]
pub fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(PREVIEW_SUFFIX);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> RetrievedChunk {
        RetrievedChunk {
            text: text.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_assemble_joins_with_blank_lines() {
        let chunks = vec![chunk("first"), chunk("second"), chunk("third")];
        assert_eq!(
            ContextAssembler::default().assemble(&chunks),
            "first\n\nsecond\n\nthird"
        );
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(ContextAssembler::default().assemble(&[]), "");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "a".repeat(450);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + PREVIEW_SUFFIX.len());
        assert!(p.ends_with("..."));
        assert!(p.starts_with(&"a".repeat(200)));
    }

    #[test]
    fn test_preview_of_short_text_keeps_marker() {
        assert_eq!(preview("short"), "short...");
    }

    #[test]
    fn test_preview_is_char_boundary_safe() {
        let text = "é".repeat(300);
        assert_eq!(preview(&text), format!("{}...", "é".repeat(200)));
    }

    #[test]
    fn test_previews_keep_order() {
        let chunks = vec![chunk("one"), chunk("two")];
        assert_eq!(
            ContextAssembler::default().previews(&chunks),
            vec!["one...", "two..."]
        );
    }
}
