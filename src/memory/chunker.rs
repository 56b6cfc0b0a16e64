use super::types::{Chunker, TextChunk};

/// Paragraph chunker for conversation excerpts.
/// Packs blank-line separated paragraphs up to `max_chunk_chars`; a single
/// paragraph longer than that is cut on character boundaries.
pub struct ExcerptChunker {
    max_chunk_chars: usize,
}

impl ExcerptChunker {
    pub fn new() -> Self {
        Self {
            max_chunk_chars: 1000,
        }
    }

    pub fn with_max_chunk_chars(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }
}

impl Default for ExcerptChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for ExcerptChunker {
    fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let mut pieces: Vec<String> = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            let para_chars = paragraph.chars().count();

            if para_chars > self.max_chunk_chars {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                pieces.extend(split_by_chars(paragraph, self.max_chunk_chars));
                continue;
            }

            let current_chars = current.chars().count();
            if !current.is_empty() && current_chars + 2 + para_chars > self.max_chunk_chars {
                pieces.push(std::mem::take(&mut current));
            }

            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| TextChunk {
                content,
                chunk_index,
            })
            .collect()
    }
}

fn split_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect::<String>())
        .collect()
}
