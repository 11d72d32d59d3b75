/// Separators in order of preference, coarsest first
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " "];

/// Splits text into chunks of at most `chunk_size` characters, each starting
/// with up to `chunk_overlap` characters carried over from the previous one.
pub struct TextChunker {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return vec![];
        }

        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        self.split_at_level(text, 0)
    }

    fn split_at_level(&self, text: &str, level: usize) -> Vec<String> {
        let Some(separator) = SEPARATORS.get(level) else {
            return self.split_by_chars(text);
        };

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut carried = 0;

        for piece in text.split_inclusive(*separator) {
            let piece_len = char_len(piece);
            let current_len = char_len(&current);

            if current_len + piece_len > self.chunk_size && current_len > carried {
                self.flush(&mut chunks, &current, level);
                current = chunks
                    .last()
                    .map(|last| self.overlap_tail(last))
                    .unwrap_or_default();
                carried = char_len(&current);
                if carried + piece_len > self.chunk_size {
                    current.clear();
                    carried = 0;
                }
            }
            current.push_str(piece);
        }

        if char_len(&current) > carried {
            self.flush(&mut chunks, &current, level);
        }

        chunks
    }

    /// Push `text` as a chunk, descending to a finer separator if it is still too long
    fn flush(&self, chunks: &mut Vec<String>, text: &str, level: usize) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if char_len(trimmed) > self.chunk_size {
            chunks.extend(self.split_at_level(trimmed, level + 1));
        } else {
            chunks.push(trimmed.to_string());
        }
    }

    fn overlap_tail(&self, chunk: &str) -> String {
        if self.chunk_overlap == 0 {
            return String::new();
        }
        let skip = char_len(chunk).saturating_sub(self.chunk_overlap);
        chunk.chars().skip(skip).collect()
    }

    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
