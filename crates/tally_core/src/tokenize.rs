/// Splits text into maximal runs of word characters (letters, digits and `_`).
///
/// Punctuation and whitespace separate tokens and are never returned, so
/// `"don't"` yields `"don"` and `"t"`. Case is left untouched.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let tokens: Vec<_> = tokenize("The cat sat on the mat. The cat ran.").collect();
        assert_eq!(
            tokens,
            ["The", "cat", "sat", "on", "the", "mat", "The", "cat", "ran"]
        );
    }

    #[test]
    fn keeps_digits_and_underscores_inside_tokens() {
        let tokens: Vec<_> = tokenize("abc123 snake_case, 42!").collect();
        assert_eq!(tokens, ["abc123", "snake_case", "42"]);
    }

    #[test]
    fn empty_and_punctuation_only_inputs_yield_nothing() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" ... --- !!").count(), 0);
    }
}
