//! Splitting lesson text into message-sized chunks.
//!
//! Lengths are counted in UTF-16 code units, the unit the chat transport
//! uses for its message limit.

/// Upper bound for a single outbound message.
pub const MAX_CHUNK_LEN: usize = 4096;

/// Splits `text` on whitespace into chunks of at most `max_units` code units.
///
/// Words inside a chunk are joined by a single space, so runs of whitespace
/// (including line breaks) collapse. A word longer than `max_units` is
/// emitted as its own oversized chunk rather than being cut. Blank input
/// yields no chunks.
#[must_use]
pub fn split_text(text: &str, max_units: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_units = 0_usize;

    for word in text.split_whitespace() {
        let word_units = utf16_len(word);
        if current.is_empty() {
            current.push_str(word);
            current_units = word_units;
        } else if current_units + 1 + word_units > max_units {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_units = word_units;
        } else {
            current.push(' ');
            current.push_str(word);
            current_units += 1 + word_units;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Length of `s` in UTF-16 code units.
#[must_use]
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_text("hello  world\n", 4096), vec!["hello world"]);
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(split_text("", 10).is_empty());
        assert!(split_text(" \n\t ", 10).is_empty());
    }

    #[test]
    fn splits_on_word_boundaries() {
        let chunks = split_text("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn oversized_word_stands_alone() {
        let chunks = split_text("a bbbbbbbbbb c", 4);
        assert_eq!(chunks, vec!["a", "bbbbbbbbbb", "c"]);
    }

    #[test]
    fn counts_utf16_code_units() {
        // Each emoji is two UTF-16 code units.
        assert_eq!(utf16_len("😀😀"), 4);
        let chunks = split_text("😀😀 😀", 4);
        assert_eq!(chunks, vec!["😀😀", "😀"]);
        // Cyrillic stays within the BMP.
        assert_eq!(utf16_len("урок"), 4);
    }

    #[test]
    fn exact_fit_is_not_split() {
        let text = format!("{} {}", "a".repeat(2047), "b".repeat(2048));
        let chunks = split_text(&text, MAX_CHUNK_LEN);
        assert_eq!(chunks.len(), 1);
        assert_eq!(utf16_len(&chunks[0]), MAX_CHUNK_LEN);
    }

    proptest! {
        #[test]
        fn rejoined_chunks_equal_normalized_text(text in "[a-zа-я😀 \n\t]{0,400}", max in 1usize..64) {
            let chunks = split_text(&text, max);
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(chunks.join(" "), normalized);
        }

        #[test]
        fn chunks_respect_limit_unless_single_word(text in "[a-z ]{0,400}", max in 1usize..64) {
            for chunk in split_text(&text, max) {
                prop_assert!(!chunk.is_empty());
                let single_word = !chunk.contains(' ');
                prop_assert!(utf16_len(&chunk) <= max || single_word);
            }
        }
    }
}
