/// CODEC: Field data encoding and decoding
/// Token encoder, payload decoder and code page 037 translation
pub mod codec;

/// Codec and validator configuration
pub mod config;

pub mod error;

/// Field name resolution
pub mod field_lookup;

/// `FIELD:DATA,...` list parsing
pub mod field_list;

/// Register, base register, length, PNR and TPFDF input validation
pub mod form_validators;

/// Base64 transport and test-data response decoding
pub mod wire;

pub use codec::{decode, encode, encode_register, DecodedData, HexPayload, NumericValue};
pub use config::{CodecConfig, REG_BITS, REG_MAX};
pub use error::{ConfigError, FieldDataError, FieldDataResult};
pub use field_list::{parse_field_list, FieldList};
pub use field_lookup::{FieldCatalog, FieldLookup, FieldReference};
