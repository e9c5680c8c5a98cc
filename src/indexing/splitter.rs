//! Recursive character text splitter
//!
//! Splits on the coarsest separator present in the text (paragraphs, then
//! lines, then words, then single characters), merges adjacent pieces back up
//! to `chunk_size` characters and carries `chunk_overlap` characters of
//! trailing context into the next chunk. Separators are kept and attached to
//! the start of the piece that follows them. Sizes are counted in characters,
//! not bytes.

use std::collections::VecDeque;

use tracing::warn;

use crate::errors::RabotError;
use crate::errors::Result;

/// Paragraph, line, word, character
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into chunks for embedding
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// # Errors
    /// `ConfigError` when `chunk_size` is zero or the overlap is not smaller than it
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RabotError::ConfigError(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RabotError::ConfigError(format!(
                "chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
        })
    }

    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // First separator that occurs in the text; "" always matches
        let mut separator = separators.last().map_or("", String::as_str);
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }
            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }
            if remaining.is_empty() {
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.split_recursive(&piece, remaining));
            }
        }
        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily pack pieces into chunks, keeping up to `chunk_overlap`
    /// characters from the end of one chunk at the start of the next.
    ///
    /// Pieces already carry their separator, so they are concatenated as-is.
    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = join_pieces(&current) {
                        docs.push(doc);
                    }
                    // Drop from the front until what is left fits as overlap
                    // and leaves room for the incoming piece.
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }
        docs
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }
}

/// Split on `separator`, prefixing every piece after the first with it.
/// An empty separator splits into single characters. Empty pieces are dropped.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|part| format!("{separator}{part}")));
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> RecursiveCharacterSplitter {
        RecursiveCharacterSplitter::new(size, overlap).unwrap()
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let text = "My name is Ravikumar. I have 5 years of experience in software engineering.";
        assert_eq!(splitter(500, 100).split_text(text), vec![text.to_string()]);
    }

    #[test]
    fn test_paragraphs_that_fit_stay_together() {
        let text = "Para one.\n\nPara two.";
        assert_eq!(splitter(500, 100).split_text(text), vec![text.to_string()]);
    }

    #[test]
    fn test_word_overlap() {
        let chunks = splitter(10, 5).split_text("aaaa bbbb cccc dddd eeee");
        assert_eq!(
            chunks,
            vec!["aaaa bbbb", "bbbb cccc", "cccc dddd", "dddd eeee"]
        );
    }

    #[test]
    fn test_character_fallback_without_separators() {
        let text: String = (0..1200u32)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let chunks = splitter(500, 100).split_text(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], text[..500]);
        assert_eq!(chunks[1], text[400..900]);
        assert_eq!(chunks[2], text[800..]);
    }

    #[test]
    fn test_chunks_respect_size() {
        let paragraph = "Ravikumar led the migration of the billing platform to Rust. \
                         He mentored junior engineers and reviewed designs.";
        let text = vec![paragraph; 30].join("\n\n");
        let chunks = splitter(120, 30).split_text(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 120));
        assert!(chunks.iter().all(|c| c.trim() == c && !c.is_empty()));
    }

    #[test]
    fn test_long_word_is_split_by_characters() {
        let long_word = "x".repeat(25);
        let text = format!("short {long_word} words");
        let chunks = splitter(10, 0).split_text(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat().replace(' ', ""), text.replace(' ', ""));
    }

    #[test]
    fn test_sizes_count_characters_not_bytes() {
        let text = "é".repeat(30);
        let chunks = splitter(10, 0).split_text(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() == 10));
    }

    #[test]
    fn test_deterministic() {
        let text = "Line one\nLine two\n\nAnother paragraph with more words in it";
        let s = splitter(20, 5);
        assert_eq!(s.split_text(text), s.split_text(text));
    }

    #[test]
    fn test_blank_input_yields_no_chunks() {
        assert!(splitter(100, 10).split_text("").is_empty());
        assert!(splitter(100, 10).split_text("  \n\n  ").is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(RecursiveCharacterSplitter::new(0, 0).is_err());
        assert!(RecursiveCharacterSplitter::new(100, 100).is_err());
    }

    #[test]
    fn test_separator_is_kept_on_following_piece() {
        assert_eq!(
            split_keeping_separator("a\n\n\n\nb", "\n\n"),
            vec!["a", "\n\n", "\n\nb"]
        );
        assert_eq!(split_keeping_separator("\n\nb", "\n\n"), vec!["\n\nb"]);
    }
}
