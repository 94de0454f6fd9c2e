//! Validators for the inputs that accompany field data
//!
//! Each function takes the raw form value, normalizes it (trim, upper case)
//! and returns the normalized value or a user-facing [`FieldDataError`].

use crate::codec::{encode_register_with, encode_with, HexPayload};
use crate::config::CodecConfig;
use crate::error::{FieldDataError, FieldDataResult};
use crate::field_lookup::{FieldLookup, FieldReference};

const PNR_LOCATOR_LENGTH: usize = 6;
const TPFDF_KEY_LENGTH: usize = 2;

/// Single field data entry; same rules as the token encoder
pub fn validate_field_data(token: &str, config: &CodecConfig) -> FieldDataResult<HexPayload> {
    encode_with(token, config)
}

/// Register name, e.g. `r5` -> `R5`
pub fn validate_register(register: &str, config: &CodecConfig) -> FieldDataResult<String> {
    let register = register.trim().to_uppercase();
    if config.is_register(&register) {
        Ok(register)
    } else {
        Err(FieldDataError::InvalidRegister { register })
    }
}

/// Register plus its value, the value fitted to the register width
pub fn validate_register_field_data(
    register: &str,
    token: &str,
    config: &CodecConfig,
) -> FieldDataResult<(String, HexPayload)> {
    let register = validate_register(register, config)?;
    let payload = encode_register_with(token, config)?;
    Ok((register, payload))
}

/// Field length between 1 and the configured maximum
pub fn validate_field_length(length: i64, config: &CodecConfig) -> FieldDataResult<u32> {
    let invalid = || FieldDataError::InvalidFieldLength {
        length,
        max_length: config.max_field_length,
    };
    if !(1..=config.max_field_length).contains(&length) {
        return Err(invalid());
    }
    u32::try_from(length).map_err(|_| invalid())
}

/// Base register for a macro's fields.
///
/// Blank or `R0` is only accepted for macros that are addressed without a
/// base register. Returns `None` for blank.
pub fn validate_base_register(
    base_reg: &str,
    macro_name: &str,
    config: &CodecConfig,
) -> FieldDataResult<Option<String>> {
    let base_reg = base_reg.trim().to_uppercase();
    if !base_reg.is_empty() && !config.is_register(&base_reg) {
        return Err(FieldDataError::InvalidBaseRegister { register: base_reg });
    }
    let macro_name = macro_name.trim().to_uppercase();
    if (base_reg.is_empty() || base_reg == "R0") && !config.is_default_macro(&macro_name) {
        return Err(FieldDataError::BaseRegisterRequired { macro_name });
    }
    Ok(Some(base_reg).filter(|r| !r.is_empty()))
}

/// PNR locator: blank for the AAA working copy, otherwise 6 alphanumerics
pub fn validate_pnr_locator(locator: &str) -> FieldDataResult<Option<String>> {
    let locator = locator.trim().to_uppercase();
    if locator.is_empty() {
        return Ok(None);
    }
    if locator.chars().count() != PNR_LOCATOR_LENGTH || !locator.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldDataError::InvalidPnrLocator { locator });
    }
    Ok(Some(locator))
}

/// PNR element key from the configured list (keys are lower case)
pub fn validate_pnr_key(key: &str, config: &CodecConfig) -> FieldDataResult<String> {
    let key = key.trim().to_lowercase();
    if config.is_pnr_key(&key) {
        Ok(key)
    } else {
        Err(FieldDataError::InvalidPnrKey { key })
    }
}

/// PNR text elements, comma separated; upper-cased and trimmed
pub fn normalize_pnr_text(text: &str) -> Vec<String> {
    let text = text.trim().to_uppercase();
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|element| element.trim().to_string()).collect()
}

/// TPFDF record key: exactly two hex characters
pub fn validate_tpfdf_key(key: &str) -> FieldDataResult<String> {
    let key = key.trim().to_uppercase();
    if key.len() != TPFDF_KEY_LENGTH || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FieldDataError::InvalidTpfdfKey { key });
    }
    Ok(key)
}

/// TPFDF macro name: the lookup must resolve the name to itself
pub fn validate_tpfdf_macro<L>(macro_name: &str, lookup: &L) -> FieldDataResult<FieldReference>
where
    L: FieldLookup + ?Sized,
{
    let macro_name = macro_name.trim().to_uppercase();
    match lookup.lookup(&macro_name) {
        Some(reference) if reference.name == macro_name => Ok(reference),
        _ => Err(FieldDataError::InvalidTpfdfMacro { macro_name }),
    }
}
