use crate::types::WordToken;

/// Word characters are Unicode alphanumerics and `_`.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Drop every char that is neither a word char nor whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect()
}

/// Split text into normalized/original word pairs.
///
/// Hyphenated tokens become one token per part; every part after the first
/// keeps its leading `-` in `original` so the parts still spell the visual
/// word. Tokens that are pure punctuation are dropped.
pub fn normalize(text: &str) -> Vec<WordToken> {
    let mut out = Vec::new();
    for token in text.split_whitespace() {
        if token.contains('-') {
            for (i, part) in token.split('-').enumerate() {
                let original = if i == 0 {
                    part.to_string()
                } else {
                    format!("-{part}")
                };
                push_token(&mut out, original);
            }
        } else {
            push_token(&mut out, token.to_string());
        }
    }
    out
}

fn push_token(out: &mut Vec<WordToken>, original: String) {
    let normalized = strip_punctuation(&original);
    if normalized.is_empty() {
        return;
    }
    out.push(WordToken {
        normalized,
        original,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn normalized(text: &str) -> Vec<String> {
        normalize(text).into_iter().map(|t| t.normalized).collect()
    }

    fn originals(text: &str) -> Vec<String> {
        normalize(text).into_iter().map(|t| t.original).collect()
    }

    #[test]
    fn empty_text_produces_no_tokens() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t ").is_empty());
    }

    #[test]
    fn punctuation_is_stripped_but_kept_in_original() {
        let tokens = normalize("Hello, world!");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].normalized, "Hello");
        assert_eq!(tokens[0].original, "Hello,");
        assert_eq!(tokens[1].normalized, "world");
        assert_eq!(tokens[1].original, "world!");
    }

    #[test]
    fn hyphenated_word_splits_with_visual_hyphen() {
        let tokens = normalize("well-known");
        assert_eq!(normalized("well-known"), ["well", "known"]);
        assert_eq!(originals("well-known"), ["well", "-known"]);
        let rebuilt: String = tokens.iter().map(|t| t.original.as_str()).collect();
        assert_eq!(rebuilt, "well-known");
    }

    #[test]
    fn multi_hyphen_word() {
        assert_eq!(
            originals("state-of-the-art."),
            ["state", "-of", "-the", "-art."]
        );
        assert_eq!(normalized("state-of-the-art."), ["state", "of", "the", "art"]);
    }

    #[test]
    fn dangling_hyphens_are_dropped() {
        assert_eq!(originals("pre- -post"), ["pre", "-post"]);
        assert!(normalize("--").is_empty());
        assert!(normalize("— – ...").is_empty());
    }

    #[test]
    fn unicode_letters_and_digits_survive() {
        let words = normalized("Café naïve 42% snake_case");
        assert_eq!(words, ["Café", "naïve", "42", "snake_case"]);
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(normalized("GPU Api"), ["GPU", "Api"]);
    }

    #[test]
    fn random_text_never_yields_empty_normalized() {
        const ALPHABET: &[char] = &[
            'a', 'b', 'Z', '9', '-', '-', ',', '.', '!', '?', '\'', '"', ' ', ' ', '\n', '_',
            '(', ')', 'é',
        ];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let text: String = (0..len)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
                .collect();
            for token in normalize(&text) {
                assert!(!token.normalized.is_empty(), "empty token from {text:?}");
                assert!(!token.original.chars().any(char::is_whitespace));
            }
        }
    }
}
