//! Sentence-aware text chunking
//!
//! Accumulates sentences up to the target chunk size, carrying a small
//! character overlap from chunk to chunk so retrieval does not lose context
//! at the boundaries.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// Splits text into overlapping chunks along sentence boundaries
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    min_size: usize,
}

impl TextChunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        // A zero target would make the split loop below spin forever
        let chunk_size = config.chunk_size.max(1);
        Self {
            chunk_size,
            overlap: config.chunk_overlap.min(chunk_size / 2),
            min_size: config.min_chunk_size,
        }
    }

    /// Split text into chunks of roughly `chunk_size` characters
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if text.len() <= self.chunk_size {
            return if text.len() >= self.min_size {
                vec![text.to_string()]
            } else {
                Vec::new()
            };
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in text.split_sentence_bounds() {
            // A single sentence longer than the target gets hard-split; the
            // tail of its last piece seeds the overlap for what follows
            if sentence.len() > self.chunk_size {
                if !current.trim().is_empty() {
                    self.push_chunk(&mut chunks, &current);
                }
                let pieces = hard_split(sentence, self.chunk_size);
                for piece in &pieces {
                    self.push_chunk(&mut chunks, piece);
                }
                current = pieces
                    .last()
                    .map(|piece| self.overlap_tail(piece))
                    .unwrap_or_default();
                continue;
            }

            if current.len() + sentence.len() > self.chunk_size && !current.trim().is_empty() {
                self.push_chunk(&mut chunks, &current);
                current = self.overlap_tail(&current);
            }
            current.push_str(sentence);
        }

        if current.trim().len() >= self.min_size {
            self.push_chunk(&mut chunks, &current);
        }

        chunks
    }

    fn push_chunk(&self, chunks: &mut Vec<String>, text: &str) {
        let trimmed = text.trim();
        if trimmed.len() >= self.min_size {
            chunks.push(trimmed.to_string());
        }
    }

    /// Last `overlap` characters of a chunk, respecting char boundaries
    fn overlap_tail(&self, text: &str) -> String {
        if self.overlap == 0 || text.len() <= self.overlap {
            return String::new();
        }
        let mut start = text.len() - self.overlap;
        while !text.is_char_boundary(start) {
            start += 1;
        }
        text[start..].to_string()
    }
}

/// Split an oversized sentence into pieces no longer than `max`
fn hard_split(text: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + max).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        pieces.push(&text[start..end]);
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize, min_size: usize) -> TextChunker {
        TextChunker::new(&ChunkingConfig {
            chunk_size,
            chunk_overlap: overlap,
            min_chunk_size: min_size,
        })
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunks = chunker(500, 20, 10).chunk_text("Anemia is a shortage of red blood cells.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Anemia is a shortage of red blood cells.");
    }

    #[test]
    fn test_empty_and_tiny_text_produce_nothing() {
        let c = chunker(500, 20, 50);
        assert!(c.chunk_text("").is_empty());
        assert!(c.chunk_text("   \n ").is_empty());
        assert!(c.chunk_text("Too short.").is_empty());
    }

    #[test]
    fn test_long_text_splits_on_sentence_boundaries() {
        let sentence = "The heart pumps blood through the circulatory system. ";
        let text = sentence.repeat(20);
        let chunks = chunker(200, 20, 50).chunk_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 200 + 20, "chunk too long: {}", chunk.len());
            assert!(chunk.len() >= 50);
        }
        // Each chunk starts at a sentence or overlap boundary, not mid-word
        assert!(chunks[0].starts_with("The heart"));
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let sentence = "Iron deficiency causes fatigue and pallor in most patients. ";
        let text = sentence.repeat(15);
        let c = chunker(150, 30, 20);
        let chunks = c.chunk_text(&text);
        assert!(chunks.len() > 1);

        let tail: String = chunks[0].chars().rev().take(10).collect::<String>();
        let tail: String = tail.chars().rev().collect();
        assert!(
            chunks[1].contains(tail.trim()),
            "second chunk should repeat the end of the first"
        );
    }

    #[test]
    fn test_oversized_sentence_is_hard_split() {
        let text = "x".repeat(1200);
        let chunks = chunker(500, 20, 50).chunk_text(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 500));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped_and_terminates() {
        let c = chunker(0, 20, 1);
        let chunks = c.chunk_text("A single short sentence.");
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|chunk| chunk.len() == 1));
    }

    #[test]
    fn test_overlap_carries_across_hard_split() {
        let text = format!("{}. Tail sentence follows here.", "b".repeat(250));
        let chunks = chunker(100, 20, 10).chunk_text(&text);

        let last = chunks.last().unwrap();
        assert!(last.contains("Tail sentence follows here."));
        // The closing sentence rides with the tail of the split-up one
        assert!(last.starts_with('b'));
    }

    #[test]
    fn test_hard_split_respects_char_boundaries() {
        let text = "é".repeat(300);
        let pieces = hard_split(&text, 100);
        for piece in pieces {
            assert!(piece.chars().all(|c| c == 'é'));
        }
    }
}
