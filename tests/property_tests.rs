//! Property tests for the token encoder and payload decoder

use proptest::prelude::*;

use tpf2_fielddata::codec::{decode, encode, encode_register, NumericValue};

// Characters that are ASCII, printable and sit at 0x40 or above in code page 037.
const PRINTABLE: &str = " .<(+|&!$*);-/,%_>?`:#@'=\"abcdefghijklmnopqrstuvwxyz~^[]{}\\ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn printable_text() -> impl Strategy<Value = String> {
    let chars: Vec<char> = PRINTABLE.chars().collect();
    prop::collection::vec(prop::sample::select(chars), 1..24).prop_map(|cs| cs.into_iter().collect())
}

proptest! {
    #[test]
    fn even_length_hex_is_unchanged(bytes in prop::collection::vec(any::<u8>(), 1..16)) {
        let hex = hex::encode_upper(&bytes);
        let encoded = encode(&hex).unwrap();
        prop_assert_eq!(encoded.as_str(), hex.as_str());
    }

    #[test]
    fn quoted_text_round_trips(text in printable_text()) {
        // Tokens are upper-cased before encoding and trailing blanks are trimmed.
        let expected = text.to_uppercase().trim_end().to_string();
        prop_assume!(!expected.is_empty());
        let payload = encode(&format!("'{text}")).unwrap();
        prop_assert_eq!(decode(&payload.to_bytes()).text, expected);
    }

    #[test]
    fn odd_length_decimal_is_register_number(n in 0u32..=0x7FFF_FFFF) {
        let token = n.to_string();
        prop_assume!(token.len() % 2 == 1);
        prop_assert_eq!(encode(&token).unwrap().into_string(), format!("{n:08X}"));
    }

    #[test]
    fn negative_is_twos_complement(n in -0x8000_0000i64..=-1) {
        let expected = format!("{:08X}", (n as u64) & 0xFFFF_FFFF);
        prop_assert_eq!(encode(&n.to_string()).unwrap().into_string(), expected);
    }

    #[test]
    fn negative_decodes_back(n in -0x8000_0000i64..=-1) {
        let payload = encode(&n.to_string()).unwrap();
        prop_assert_eq!(decode(&payload.to_bytes()).number, NumericValue::Number(n));
    }

    #[test]
    fn register_payload_is_eight_hex(token in "[A-F][0-9A-F]{0,19}|[0-9]{1,9}|-[0-9]{1,9}|'[A-Z][A-Z ]{0,11}") {
        let payload = encode_register(&token).unwrap();
        prop_assert_eq!(payload.as_str().len(), 8);
        prop_assert!(payload.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn decode_hex_matches_input(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let decoded = decode(&bytes);
        prop_assert_eq!(decoded.hex, hex::encode_upper(&bytes));
        prop_assert_eq!(decoded.text.chars().count(), bytes.len());
        prop_assert_eq!(decoded.number == NumericValue::NotANumber, bytes.is_empty() || bytes.len() > 4);
    }
}
