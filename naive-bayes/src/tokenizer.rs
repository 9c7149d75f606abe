/// Default sanitizer, strips ASCII punctuation from words
#[inline(always)]
pub fn strip_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Split a document into lowercase words.
/// Characters for which `sanitize` returns true are removed from each word,
/// words left empty are dropped.
pub fn tokenize(text: &str, sanitize: fn(char) -> bool) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(move |word| {
            word.chars()
                .filter(|c| !sanitize(*c))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_words_without_punctuation() {
        let words: Vec<String> =
            tokenize("Hello, World!  hello -- again", strip_punctuation).collect();
        assert_eq!(words, vec!["hello", "world", "hello", "again"]);
    }

    #[test]
    fn custom_sanitizer() {
        let words: Vec<String> = tokenize("R2-D2 beeps 3 times", |c| c.is_ascii_digit()).collect();
        assert_eq!(words, vec!["r-d", "beeps", "times"]);
    }

    #[test]
    fn empty_document() {
        assert_eq!(tokenize("  \t\n", strip_punctuation).count(), 0);
    }
}
