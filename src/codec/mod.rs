//! Field data codec
//!
//! The single implementation of field-data encoding and decoding shared by
//! every form and response handler:
//!
//! - [`ebcdic`] - code page 037 translation
//! - [`encoder`] - user token to canonical hex payload
//! - [`decoder`] - byte payload to hex / number / text
//! - [`payload`] - the canonical hex payload type
//!
//! # Examples
//!
//! ```
//! use tpf2_fielddata::codec::{decode, encode};
//!
//! let payload = encode("'TPF").unwrap();
//! assert_eq!(payload.as_str(), "E3D7C6");
//!
//! let decoded = decode(&payload.to_bytes());
//! assert_eq!(decoded.text, "TPF");
//! ```

pub mod decoder;
pub mod ebcdic;
pub mod encoder;
pub mod payload;

pub use decoder::{
    decode, decode_regs, decode_regs_with, decode_with, DecodedData, DecodedRegister, NumericValue,
    NOT_A_NUMBER,
};
pub use encoder::{encode, encode_register, encode_register_with, encode_with};
pub use payload::HexPayload;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let payload = encode("'HELLO, WORLD").unwrap();
        assert_eq!(decode(&payload.to_bytes()).text, "HELLO, WORLD");
    }

    #[test]
    fn test_number_round_trip() {
        let payload = encode("-42").unwrap();
        assert_eq!(decode(&payload.to_bytes()).number, NumericValue::Number(-42));

        let payload = encode("32767").unwrap();
        assert_eq!(decode(&payload.to_bytes()).number, NumericValue::Number(32767));
    }

    #[test]
    fn test_decoded_hex_resubmits_unchanged() {
        let decoded = decode(&[0x01, 0x02, 0xAB]);
        assert_eq!(encode(&decoded.hex).unwrap().as_str(), "0102AB");
    }
}
