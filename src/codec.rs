//! LZ-String compression in its URI-component flavour.
//!
//! Task lists travel inside a single query parameter (`tasksZ`). Editors
//! produce that value with the LZ-String "encoded URI component" scheme: an
//! LZW variant over UTF-16 code units whose output bits are packed six at a
//! time into a URL-safe alphabet. Both directions are exposed so the CLI can
//! mint values as well as read them.

use thiserror::Error;

const URI_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoded value is empty")]
    Empty,
    #[error("character {0:?} is not part of the URI-safe alphabet")]
    InvalidCharacter(char),
    #[error("encoded stream is truncated or corrupt")]
    Corrupt,
    #[error("decoded text is not valid UTF-16")]
    InvalidUtf16,
}

/// Compress text into a URI-safe string.
pub fn compress_to_uri_component(input: &str) -> String {
    lz_str::compress_to_encoded_uri_component(input)
}

/// Reverse [`compress_to_uri_component`]. Spaces are read as `+`, which is
/// what a form decoder turns an unescaped `+` into.
pub fn decompress_from_uri_component(input: &str) -> Result<String, CodecError> {
    if input.is_empty() {
        return Err(CodecError::Empty);
    }
    let normalized: String = input.chars().map(|ch| if ch == ' ' { '+' } else { ch }).collect();
    if let Some(bad) = normalized.chars().find(|ch| !URI_ALPHABET.contains(*ch)) {
        return Err(CodecError::InvalidCharacter(bad));
    }
    let units = lz_str::decompress_from_encoded_uri_component(normalized.as_str())
        .ok_or(CodecError::Corrupt)?;
    String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_matches_reference_encoder() {
        assert_eq!(compress_to_uri_component("hello"), "BYUwNmD2Q");
        assert_eq!(compress_to_uri_component("Hello, world!"), "BIUwNmD2A0AEDukBOYAmBCIA");
        assert_eq!(compress_to_uri_component(""), "Q");
        assert_eq!(decompress_from_uri_component("BYUwNmD2Q").unwrap(), "hello");
    }

    #[test]
    fn test_round_trips_task_json() {
        let json = r#"[{"type":"questionQuiz","question":"Where is the armchair?","options":["In the bedroom","In the living room","In the kitchen"],"answers":[1]}]"#;
        let packed = compress_to_uri_component(json);
        assert_eq!(decompress_from_uri_component(&packed).unwrap(), json);
    }

    #[test]
    fn test_output_is_uri_safe() {
        let packed = compress_to_uri_component("Вопрос: где кресло? 🪑 and some ASCII too");
        assert!(packed.chars().all(|c| URI_ALPHABET.contains(c)));
    }

    #[test]
    fn test_round_trips_non_bmp_and_repetition() {
        for text in ["a", "aaaaaaaaaaaaaaaaaaaa", "Задание 🙂 ✅", "abababababcabcabcabc"] {
            let packed = compress_to_uri_component(text);
            assert_eq!(decompress_from_uri_component(&packed).unwrap(), text, "{text:?}");
        }
    }

    #[test]
    fn test_spaces_read_as_plus() {
        let packed = compress_to_uri_component("london answer France");
        assert_eq!(packed, "DYewdgJuAECGYGcDuBTATtAYm+BjFQA");
        let spaced = packed.replace('+', " ");
        assert_eq!(decompress_from_uri_component(&spaced).unwrap(), "london answer France");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(decompress_from_uri_component(""), Err(CodecError::Empty));
        assert_eq!(decompress_from_uri_component("abc%"), Err(CodecError::InvalidCharacter('%')));
    }

    #[test]
    fn test_truncated_stream_does_not_reproduce_input() {
        let text = "a fairly long sentence that needs several characters";
        let packed = compress_to_uri_component(text);
        let cut = &packed[..packed.len() / 2];
        assert_ne!(decompress_from_uri_component(cut).ok().as_deref(), Some(text));
    }

    proptest! {
        #[test]
        fn prop_round_trip(text in "\\PC+") {
            let packed = compress_to_uri_component(&text);
            prop_assert_eq!(decompress_from_uri_component(&packed).unwrap(), text);
        }
    }
}
