//! Tolerant UTF-8 decoding.

use srcfix_types::config::DecodeFallback;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// Number of invalid byte sequences dropped or replaced.
    pub invalid_sequences: usize,
}

impl Decoded {
    pub fn is_lossy(&self) -> bool {
        self.invalid_sequences > 0
    }
}

/// Decode `bytes` as UTF-8 without ever failing.
pub fn decode_lossy(bytes: &[u8], fallback: DecodeFallback) -> Decoded {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Decoded {
            text: text.to_string(),
            invalid_sequences: 0,
        };
    }

    let mut text = String::with_capacity(bytes.len());
    let mut invalid_sequences = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            invalid_sequences += 1;
            if fallback == DecodeFallback::Replace {
                text.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    Decoded {
        text,
        invalid_sequences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_input_is_lossless() {
        let d = decode_lossy("45° angle".as_bytes(), DecodeFallback::Drop);
        assert_eq!(d.text, "45° angle");
        assert!(!d.is_lossy());
    }

    #[test]
    fn drop_discards_invalid_bytes() {
        // Latin-1 degree sign.
        let d = decode_lossy(b"45\xB0 angle", DecodeFallback::Drop);
        assert_eq!(d.text, "45 angle");
        assert_eq!(d.invalid_sequences, 1);
    }

    #[test]
    fn replace_substitutes_replacement_char() {
        let d = decode_lossy(b"a\xFFb\xFEc", DecodeFallback::Replace);
        assert_eq!(d.text, "a\u{FFFD}b\u{FFFD}c");
        assert_eq!(d.invalid_sequences, 2);
    }
}
