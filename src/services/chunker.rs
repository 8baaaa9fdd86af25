//! Deterministic text normalization and chunking prior to embedding.

use crate::models::{ChunkingConfig, ContentType};
use crate::utils::text::{normalize_whitespace, split_numbered, strip_mentions, strip_urls};

/// Splits raw input into bounded-size, cleaned text units.
///
/// Pure and deterministic: the same input and configuration always produce
/// the same chunk sequence.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk length in characters.
    max_chunk_size: usize,
}

impl TextChunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_chunk_size)
    }

    /// Turn raw text into cleaned chunks ready for embedding.
    ///
    /// Social-media input is first split on leading ordinal markers
    /// (`"1. ..."` exports) and stripped of URLs and mentions. All input is
    /// whitespace-normalized and greedily packed into chunks of at most
    /// `max_chunk_size` characters without splitting inside a word; a single
    /// word longer than the limit forms its own chunk. Empty chunks are
    /// never emitted.
    pub fn chunk(&self, raw: &str, content_type: ContentType) -> Vec<String> {
        let units: Vec<String> = if content_type.is_social() {
            split_numbered(raw)
                .iter()
                .map(|unit| strip_mentions(&strip_urls(unit)))
                .collect()
        } else {
            vec![raw.to_string()]
        };

        units
            .iter()
            .map(|unit| normalize_whitespace(unit))
            .filter(|unit| !unit.is_empty())
            .flat_map(|unit| pack_words(&unit, self.max_chunk_size))
            .collect()
    }
}

/// Greedily accumulate whitespace-delimited words until appending the next
/// word would exceed `max_chunk_size`, then start a new chunk. The trailing
/// partial chunk is always emitted when non-empty.
fn pack_words(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_tweet_export() {
        let chunker = TextChunker::new(8000);
        let raw = "1. Check this out https://x.co @alice\n2. Second one";
        let chunks = chunker.chunk(raw, ContentType::Tweet);
        assert_eq!(chunks, vec!["Check this out", "Second one"]);
    }

    #[test]
    fn test_article_keeps_urls_and_mentions() {
        let chunker = TextChunker::new(8000);
        let chunks = chunker.chunk("read https://a.io by @bob", ContentType::Article);
        assert_eq!(chunks, vec!["read https://a.io by @bob"]);
    }

    #[test]
    fn test_chunk_length_bound() {
        let chunker = TextChunker::new(20);
        let raw = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = chunker.chunk(raw, ContentType::Custom);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 20, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_word_round_trip() {
        let chunker = TextChunker::new(12);
        let raw = "  one   two\tthree\n four five six seven ";
        let chunks = chunker.chunk(raw, ContentType::Custom);
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, "one two three four five six seven");
    }

    #[test]
    fn test_never_splits_inside_word() {
        let chunker = TextChunker::new(5);
        let chunks = chunker.chunk("supercalifragilistic ok", ContentType::Custom);
        // The oversized word forms its own chunk.
        assert_eq!(chunks, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = TextChunker::new(100);
        assert!(chunker.chunk("", ContentType::Tweet).is_empty());
        assert!(chunker.chunk("   \n\t  ", ContentType::Article).is_empty());
    }

    #[test]
    fn test_unit_reduced_to_nothing_is_dropped() {
        let chunker = TextChunker::new(100);
        // A tweet that is only a URL and a mention cleans down to nothing.
        let chunks = chunker.chunk("1. https://x.co @alice\n2. real text", ContentType::Tweet);
        assert_eq!(chunks, vec!["real text"]);
    }

    #[test]
    fn test_deterministic() {
        let chunker = TextChunker::new(16);
        let raw = "1. aaa bbb ccc https://u.rl\n2. ddd eee @fff ggg";
        let first = chunker.chunk(raw, ContentType::Thread);
        let second = chunker.chunk(raw, ContentType::Thread);
        assert_eq!(first, second);
    }

    #[test]
    fn test_whitespace_only_chunks_never_emitted() {
        let chunker = TextChunker::new(50);
        let chunks = chunker.chunk("1.  \n2.   \n3. x", ContentType::Tweet);
        assert_eq!(chunks, vec!["x"]);
        for chunk in &chunks {
            assert!(!chunk.trim().is_empty());
        }
    }
}
