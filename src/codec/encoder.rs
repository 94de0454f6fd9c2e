//! Token encoder
//!
//! Turns one user-entered field value into its canonical hex payload. Tokens
//! are ambiguous (`12` could be hex or decimal, `ABC` could be hex or text),
//! so the rules below are tried in a fixed order:
//!
//! 1. `'TEXT` is always text, transcoded to code page 037.
//! 2. `-123` is a negative decimal, stored as a two's-complement register value.
//! 3. An odd number of decimal digits is a positive decimal promoted to a full
//!    register, since an odd digit count cannot be a hex byte string.
//! 4. Anything made only of hex digits is hex, left-padded to whole bytes.
//! 5. Everything else is text.

use log::debug;

use super::ebcdic::encode_cp037;
use super::payload::HexPayload;
use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::error::{FieldDataError, FieldDataResult};

/// Encode a token with the default 32-bit configuration.
///
/// ```
/// use tpf2_fielddata::codec::encode;
///
/// assert_eq!(encode("5").unwrap().as_str(), "00000005");
/// assert_eq!(encode("ab").unwrap().as_str(), "AB");
/// assert_eq!(encode("-1").unwrap().as_str(), "FFFFFFFF");
/// assert_eq!(encode("'A1").unwrap().as_str(), "C1F1");
/// ```
pub fn encode(token: &str) -> FieldDataResult<HexPayload> {
    encode_with(token, &DEFAULT_CONFIG)
}

/// Encode a token for a fixed-width register slot with the default
/// configuration. See [`encode_register_with`].
pub fn encode_register(token: &str) -> FieldDataResult<HexPayload> {
    encode_register_with(token, &DEFAULT_CONFIG)
}

pub fn encode_with(token: &str, config: &CodecConfig) -> FieldDataResult<HexPayload> {
    let data = token.trim().to_uppercase();
    if data.is_empty() {
        return Err(FieldDataError::EmptyToken);
    }

    if let Some(text) = data.strip_prefix('\'') {
        if text.is_empty() {
            return Err(FieldDataError::EmptyQuotedText);
        }
        debug!("Encoding quoted token {data:?} as text");
        return encode_text(text);
    }

    if let Some(digits) = data.strip_prefix('-') {
        debug!("Encoding token {data:?} as negative number");
        return encode_negative(&data, digits, config);
    }

    if data.len() % 2 == 1 && is_decimal(&data) {
        debug!("Encoding odd-length token {data:?} as number");
        return encode_number(&data, config);
    }

    if data.bytes().all(|b| b.is_ascii_hexdigit()) {
        debug!("Encoding token {data:?} as hex");
        let hex = if data.len() % 2 == 1 { format!("0{data}") } else { data };
        return Ok(HexPayload::from_canonical(hex));
    }

    debug!("Encoding token {data:?} as text");
    encode_text(&data)
}

/// Encode a token for a register slot.
///
/// The encoded value keeps its first `word_hex_digits` characters and is then
/// zero-padded on the left to exactly that width, so `"ABCDEF0123"` becomes
/// `"ABCDEF01"` and `"AB"` becomes `"000000AB"`.
pub fn encode_register_with(token: &str, config: &CodecConfig) -> FieldDataResult<HexPayload> {
    let width = config.word_hex_digits();
    let encoded = encode_with(token, config)?;
    let hex = encoded.as_str();
    let head = &hex[..hex.len().min(width)];
    Ok(HexPayload::from_canonical(format!("{head:0>width$}")))
}

fn encode_text(text: &str) -> FieldDataResult<HexPayload> {
    let bytes = encode_cp037(text).map_err(|ch| FieldDataError::UnrepresentableText { ch })?;
    Ok(HexPayload::from_bytes(&bytes))
}

fn encode_negative(token: &str, digits: &str, config: &CodecConfig) -> FieldDataResult<HexPayload> {
    if !is_decimal(digits) {
        return Err(FieldDataError::InvalidNegativeNumber { token: token.to_string() });
    }
    let out_of_range = || FieldDataError::NegativeOutOfRange {
        token: token.to_string(),
        min: config.min_signed(),
    };
    // Overflowing u64 is certainly below the register minimum.
    let magnitude: u64 = digits.parse().map_err(|_| out_of_range())?;
    if magnitude > config.min_signed().unsigned_abs() {
        return Err(out_of_range());
    }
    let value = -(magnitude as i64);
    let masked = (value as u64) & config.reg_max();
    Ok(register_hex(masked, config))
}

fn encode_number(token: &str, config: &CodecConfig) -> FieldDataResult<HexPayload> {
    let out_of_range = || FieldDataError::NumberOutOfRange {
        token: token.to_string(),
        max: config.max_signed(),
    };
    let number: u64 = token.parse().map_err(|_| out_of_range())?;
    if number > config.max_signed() as u64 {
        return Err(out_of_range());
    }
    Ok(register_hex(number, config))
}

fn register_hex(value: u64, config: &CodecConfig) -> HexPayload {
    let width = config.word_hex_digits();
    HexPayload::from_canonical(format!("{value:0width$X}"))
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(token: &str) -> String {
        encode(token).unwrap().into_string()
    }

    #[test]
    fn test_quoted_text() {
        assert_eq!(enc("'ABC"), "C1C2C3");
        // Quoted digits are still text
        assert_eq!(enc("'123"), "F1F2F3");
        // Lower case is folded before transcoding
        assert_eq!(enc("'abc"), "C1C2C3");
        assert_eq!(enc("'A B"), "C140C2");
    }

    #[test]
    fn test_quote_without_text() {
        assert_eq!(encode("'"), Err(FieldDataError::EmptyQuotedText));
        assert_eq!(encode("  '  "), Err(FieldDataError::EmptyQuotedText));
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(enc("-1"), "FFFFFFFF");
        assert_eq!(enc("-2"), "FFFFFFFE");
        assert_eq!(enc("-32768"), "FFFF8000");
        assert_eq!(enc("-2147483648"), "80000000");
        assert_eq!(enc("-0"), "00000000");
    }

    #[test]
    fn test_negative_out_of_range() {
        assert!(matches!(encode("-2147483649"), Err(FieldDataError::NegativeOutOfRange { .. })));
        assert!(matches!(
            encode("-99999999999999999999999"),
            Err(FieldDataError::NegativeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_invalid_negative() {
        assert_eq!(
            encode("-"),
            Err(FieldDataError::InvalidNegativeNumber { token: "-".to_string() })
        );
        assert_eq!(
            encode("-1A"),
            Err(FieldDataError::InvalidNegativeNumber { token: "-1A".to_string() })
        );
        assert!(matches!(encode("--1"), Err(FieldDataError::InvalidNegativeNumber { .. })));
    }

    #[test]
    fn test_odd_length_decimal_is_number() {
        assert_eq!(enc("5"), "00000005");
        assert_eq!(enc("32767"), "00007FFF");
        assert_eq!(enc("100"), "00000064");
        assert_eq!(enc("999999999"), "3B9AC9FF");
        assert_eq!(enc("0000005"), "00000005");
    }

    #[test]
    fn test_decimal_out_of_range() {
        // 2147483648 has even length, so it is hex, not a number
        assert_eq!(enc("2147483648"), "2147483648");
        assert!(matches!(encode("21474836470"), Err(FieldDataError::NumberOutOfRange { .. })));
        assert!(matches!(encode("99999999999"), Err(FieldDataError::NumberOutOfRange { .. })));
    }

    #[test]
    fn test_even_length_hex_unchanged() {
        assert_eq!(enc("AB"), "AB");
        assert_eq!(enc("12"), "12");
        assert_eq!(enc("c1c2"), "C1C2");
        assert_eq!(enc("  00FF  "), "00FF");
    }

    #[test]
    fn test_odd_length_hex_padded() {
        assert_eq!(enc("ABC"), "0ABC");
        assert_eq!(enc("F"), "0F");
        assert_eq!(enc("1A2"), "01A2");
    }

    #[test]
    fn test_non_hex_falls_back_to_text() {
        assert_eq!(enc("XYZ"), "E7E8E9");
        assert_eq!(enc("HELLO"), "C8C5D3D3D6");
        // Prefixed hex is not hex
        assert_eq!(enc("0X1F"), "F0E7F1C6");
        assert_eq!(enc("AB CD"), "C1C240C3C4");
    }

    #[test]
    fn test_unrepresentable_text() {
        assert_eq!(encode("'\u{20AC}"), Err(FieldDataError::UnrepresentableText { ch: '\u{20AC}' }));
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(encode(""), Err(FieldDataError::EmptyToken));
        assert_eq!(encode("   "), Err(FieldDataError::EmptyToken));
    }

    #[test]
    fn test_register_width() {
        let reg = |t: &str| encode_register(t).unwrap().into_string();
        assert_eq!(reg("AB"), "000000AB");
        assert_eq!(reg("5"), "00000005");
        assert_eq!(reg("-1"), "FFFFFFFF");
        // Keeps the leading characters, not the trailing ones
        assert_eq!(reg("ABCDEF0123"), "ABCDEF01");
        assert_eq!(reg("'HELLO"), "C8C5D3D3");
        assert_eq!(reg("'A"), "000000C1");
    }

    #[test]
    fn test_sixteen_bit_config() {
        let config = CodecConfig::from_json(r#"{"reg_bits": 16}"#).unwrap();
        assert_eq!(encode_with("-1", &config).unwrap().as_str(), "FFFF");
        assert_eq!(encode_with("5", &config).unwrap().as_str(), "0005");
        assert!(matches!(
            encode_with("-32769", &config),
            Err(FieldDataError::NegativeOutOfRange { .. })
        ));
        assert!(matches!(encode_with("32768", &config), Err(FieldDataError::NumberOutOfRange { .. })));
        assert_eq!(encode_register_with("ABCDEF", &config).unwrap().as_str(), "ABCD");
    }

    #[test]
    fn test_range_messages_follow_register_width() {
        let config = CodecConfig::from_json(r#"{"reg_bits": 16}"#).unwrap();
        assert_eq!(
            encode_with("-32769", &config).unwrap_err().to_string(),
            "Negative Number cannot be less than -32768 - -32769"
        );
        assert_eq!(
            encode_with("32768", &config).unwrap_err().to_string(),
            "Number cannot be greater than 32767 - 32768"
        );
        assert_eq!(
            encode("-2147483649").unwrap_err().to_string(),
            "Negative Number cannot be less than -2147483648 - -2147483649"
        );
    }
}
