//! Payload decoder
//!
//! Renders a byte payload returned by the test-data service three ways for
//! display: hex, a signed number when the payload fits a register, and
//! code page 037 text with unprintable bytes replaced by a diamond.

use std::fmt;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use super::ebcdic::display_char;
use crate::config::{CodecConfig, DEFAULT_CONFIG};

/// Text shown in place of a number for payloads that are empty or wider than a register
pub const NOT_A_NUMBER: &str = "Not a number";

const HALFWORD_HEX_DIGITS: usize = 4;
const HALFWORD_SIGN_LIMIT: i64 = 0x7FFF;
const HALFWORD_MODULUS: i64 = 0x1_0000;

/// Numeric reading of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericValue {
    Number(i64),
    NotANumber,
}

impl NumericValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericValue::Number(n) => Some(*n),
            NumericValue::NotANumber => None,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Number(n) => write!(f, "{n}"),
            NumericValue::NotANumber => f.write_str(NOT_A_NUMBER),
        }
    }
}

impl Serialize for NumericValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericValue::Number(n) => serializer.serialize_i64(*n),
            NumericValue::NotANumber => serializer.serialize_str(NOT_A_NUMBER),
        }
    }
}

/// Hex, number and text renderings of one payload.
///
/// Serializes as the array `[hex, number, text]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedData {
    pub hex: String,
    pub number: NumericValue,
    pub text: String,
}

impl DecodedData {
    pub fn empty() -> Self {
        Self {
            hex: String::new(),
            number: NumericValue::NotANumber,
            text: String::new(),
        }
    }
}

impl Serialize for DecodedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.hex)?;
        tuple.serialize_element(&self.number)?;
        tuple.serialize_element(&self.text)?;
        tuple.end()
    }
}

/// One register of a decoded register map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedRegister {
    pub name: String,
    /// Unsigned rendering, zero-padded to the register width
    pub hex: String,
    /// Value as received
    pub value: i64,
}

/// Decode a payload with the default 32-bit configuration.
///
/// ```
/// use tpf2_fielddata::codec::{decode, NumericValue};
///
/// let decoded = decode(&[0xFF, 0xFE]);
/// assert_eq!(decoded.hex, "FFFE");
/// assert_eq!(decoded.number, NumericValue::Number(-2));
/// ```
pub fn decode(bytes: &[u8]) -> DecodedData {
    decode_with(bytes, &DEFAULT_CONFIG)
}

pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> DecodedData {
    if bytes.is_empty() {
        return DecodedData::empty();
    }
    let hex = hex::encode_upper(bytes);
    let number = decode_number(bytes, hex.len(), config);
    let text = bytes.iter().map(|&b| display_char(b)).collect();
    DecodedData { hex, number, text }
}

// Halfwords and full registers are read as signed; other widths up to a
// register are unsigned.
fn decode_number(bytes: &[u8], hex_len: usize, config: &CodecConfig) -> NumericValue {
    let word = config.word_hex_digits();
    if hex_len > word {
        return NumericValue::NotANumber;
    }
    let mut value = bytes.iter().fold(0i64, |acc, &b| (acc << 8) | i64::from(b));
    if hex_len == HALFWORD_HEX_DIGITS && value > HALFWORD_SIGN_LIMIT {
        value -= HALFWORD_MODULUS;
    }
    if hex_len == word && value > (config.reg_max() >> 1) as i64 {
        value -= (config.reg_max() + 1) as i64;
    }
    NumericValue::Number(value)
}

/// Decode a register map with the default configuration
pub fn decode_regs<I, K>(regs: I) -> Vec<DecodedRegister>
where
    I: IntoIterator<Item = (K, i64)>,
    K: Into<String>,
{
    decode_regs_with(regs, &DEFAULT_CONFIG)
}

pub fn decode_regs_with<I, K>(regs: I, config: &CodecConfig) -> Vec<DecodedRegister>
where
    I: IntoIterator<Item = (K, i64)>,
    K: Into<String>,
{
    let width = config.word_hex_digits();
    regs.into_iter()
        .map(|(name, value)| DecodedRegister {
            name: name.into(),
            hex: format!("{:0width$X}", (value as u64) & config.reg_max()),
            value,
        })
        .collect()
}
