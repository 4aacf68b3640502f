use unicode_segmentation::UnicodeSegmentation;

/// Split text into word tokens, with each punctuation mark as its own token.
/// Apostrophes and hyphens inside a word stay attached (`don't`, `auth-token`).
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut segments = text.split_word_bounds().peekable();
    // Whether the last token is a word ending right before the next segment.
    let mut after_word = false;

    while let Some(segment) = segments.next() {
        if segment.trim().is_empty() {
            after_word = false;
            continue;
        }
        let hyphen_joins = segment == "-"
            && after_word
            && segments
                .peek()
                .is_some_and(|next| next.chars().next().is_some_and(char::is_alphanumeric));
        if hyphen_joins {
            if let (Some(last), Some(next)) = (tokens.last_mut(), segments.next()) {
                last.push('-');
                last.push_str(next);
            }
            continue;
        }
        after_word = segment.chars().any(char::is_alphanumeric);
        tokens.push(segment.to_string());
    }
    tokens
}

/// Keep the first `max_tokens` word tokens, joined by single spaces.
pub fn compress_text(text: &str, max_tokens: usize) -> String {
    word_tokenize(text)
        .into_iter()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{compress_text, word_tokenize};

    #[test]
    fn punctuation_is_split_out() {
        assert_eq!(
            word_tokenize("fn main() { println!(\"hi\"); }"),
            vec![
                "fn", "main", "(", ")", "{", "println", "!", "(", "\"", "hi", "\"", ")", ";", "}"
            ]
        );
    }

    #[test]
    fn inner_apostrophes_and_hyphens_stay() {
        assert_eq!(
            word_tokenize("don't drop the auth-token -now"),
            vec!["don't", "drop", "the", "auth-token", "-", "now"]
        );
    }

    #[test]
    fn non_ascii_words_stay_whole() {
        assert_eq!(
            word_tokenize("café naïve, über-cool"),
            vec!["café", "naïve", ",", "über-cool"]
        );
    }

    #[test]
    fn compress_keeps_leading_tokens() {
        assert_eq!(compress_text("a  b,\nc d", 3), "a b ,");
        assert_eq!(compress_text("short", 10), "short");
        assert_eq!(compress_text("anything", 0), "");
    }
}
