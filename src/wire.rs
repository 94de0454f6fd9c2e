//! Wire helpers
//!
//! Payloads travel base64-encoded inside JSON. This module converts between
//! that form and the codec types, and rewrites a whole test-data document
//! from the service so every payload in it is replaced by its decoded triple.

use std::cmp::Ordering;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde_json::{Map, Value};

use crate::codec::{decode_regs_with, decode_with, DecodedData, HexPayload};
use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::error::{FieldDataError, FieldDataResult};

pub fn to_base64(payload: &HexPayload) -> String {
    payload.to_base64()
}

pub fn from_base64(encoded: &str) -> FieldDataResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| FieldDataError::InvalidBase64 { reason: e.to_string() })
}

/// Decode a base64 payload straight to its display triple
pub fn decode_base64_field(encoded: &str) -> FieldDataResult<DecodedData> {
    decode_base64_field_with(encoded, &DEFAULT_CONFIG)
}

pub fn decode_base64_field_with(encoded: &str, config: &CodecConfig) -> FieldDataResult<DecodedData> {
    if encoded.is_empty() {
        return Ok(DecodedData::empty());
    }
    Ok(decode_with(&from_base64(encoded)?, config))
}

/// Decode every payload in a test-data document with the default configuration
pub fn decode_test_data(test_data: Value) -> FieldDataResult<Value> {
    decode_test_data_with(test_data, &DEFAULT_CONFIG)
}

/// Decode every payload in a test-data document.
///
/// - `regs`: `{name: int}` becomes `{name: [hex, int]}`
/// - `cores[].hex_data` and every `field_data[].data` become `[hex, number, text]`
/// - `fixed_files[]` and their `pool_files[]` get `rec_id` as bare upper-case hex
///   and their `file_items[]` are decoded too
/// - `pnr` is sorted by variation, locator, key and `cores` by variation, macro
///
/// Sections that are absent are left alone.
pub fn decode_test_data_with(mut test_data: Value, config: &CodecConfig) -> FieldDataResult<Value> {
    let document = test_data.as_object_mut().ok_or_else(|| FieldDataError::MalformedTestData {
        reason: "test data is not an object".to_string(),
    })?;

    if let Some(regs) = document.get_mut("regs") {
        decode_regs_in_place(regs, config)?;
    }

    for core in section(document, "cores")? {
        if let Some(hex_data) = core.get_mut("hex_data") {
            decode_data_in_place(hex_data, config)?;
        }
        decode_field_data(core, config)?;
    }
    for pnr in section(document, "pnr")? {
        decode_field_data(pnr, config)?;
    }
    for tpfdf in section(document, "tpfdf")? {
        decode_field_data(tpfdf, config)?;
    }
    for fixed_file in section(document, "fixed_files")? {
        decode_file(fixed_file, config)?;
        let Some(pool_files) = fixed_file.get_mut("pool_files") else {
            continue;
        };
        for pool_file in items_mut(pool_files, "pool_files")? {
            decode_file(pool_file, config)?;
        }
    }

    if let Some(Value::Array(pnr)) = document.get_mut("pnr") {
        pnr.sort_by(|a, b| {
            compare_int(a, b, "variation")
                .then_with(|| compare_str(a, b, "locator"))
                .then_with(|| compare_str(a, b, "key"))
        });
    }
    if let Some(Value::Array(cores)) = document.get_mut("cores") {
        cores.sort_by(|a, b| compare_int(a, b, "variation").then_with(|| compare_str(a, b, "macro_name")));
    }

    Ok(test_data)
}

fn section<'a>(document: &'a mut Map<String, Value>, key: &str) -> FieldDataResult<std::slice::IterMut<'a, Value>> {
    match document.get_mut(key) {
        Some(value) => items_mut(value, key),
        None => Ok(Default::default()),
    }
}

fn items_mut<'a>(value: &'a mut Value, key: &str) -> FieldDataResult<std::slice::IterMut<'a, Value>> {
    match value {
        Value::Array(items) => Ok(items.iter_mut()),
        Value::Null => Ok(Default::default()),
        _ => Err(FieldDataError::MalformedTestData {
            reason: format!("'{key}' is not a list"),
        }),
    }
}

fn decode_file(file: &mut Value, config: &CodecConfig) -> FieldDataResult<()> {
    if let Some(rec_id) = file.get_mut("rec_id") {
        let id = rec_id.as_u64().ok_or_else(|| FieldDataError::MalformedTestData {
            reason: format!("rec_id {rec_id} is not an unsigned integer"),
        })?;
        *rec_id = Value::String(format!("{id:X}"));
    }
    decode_field_data(file, config)?;
    if let Some(file_items) = file.get_mut("file_items") {
        for file_item in items_mut(file_items, "file_items")? {
            decode_field_data(file_item, config)?;
        }
    }
    Ok(())
}

fn decode_field_data(container: &mut Value, config: &CodecConfig) -> FieldDataResult<()> {
    let Some(field_data) = container.get_mut("field_data") else {
        return Ok(());
    };
    for item in items_mut(field_data, "field_data")? {
        if let Some(data) = item.get_mut("data") {
            decode_data_in_place(data, config)?;
        }
    }
    Ok(())
}

fn decode_data_in_place(slot: &mut Value, config: &CodecConfig) -> FieldDataResult<()> {
    let decoded = match slot {
        Value::String(encoded) => decode_base64_field_with(encoded, config)?,
        Value::Null => DecodedData::empty(),
        other => {
            return Err(FieldDataError::MalformedTestData {
                reason: format!("expected a base64 string, found {other}"),
            })
        }
    };
    *slot = serde_json::to_value(&decoded).map_err(|e| FieldDataError::MalformedTestData {
        reason: e.to_string(),
    })?;
    Ok(())
}

fn decode_regs_in_place(regs: &mut Value, config: &CodecConfig) -> FieldDataResult<()> {
    let entries = match regs {
        Value::Object(map) => map,
        Value::Null => return Ok(()),
        _ => {
            return Err(FieldDataError::MalformedTestData {
                reason: "'regs' is not an object".to_string(),
            })
        }
    };
    let values = entries
        .iter()
        .map(|(name, value)| {
            value.as_i64().map(|v| (name.clone(), v)).ok_or_else(|| FieldDataError::MalformedTestData {
                reason: format!("register {name} value {value} is not an integer"),
            })
        })
        .collect::<FieldDataResult<Vec<_>>>()?;
    debug!("Decoding {} registers", values.len());
    *entries = decode_regs_with(values, config)
        .into_iter()
        .map(|reg| (reg.name, Value::Array(vec![Value::String(reg.hex), Value::from(reg.value)])))
        .collect();
    Ok(())
}

fn compare_int(a: &Value, b: &Value, key: &str) -> Ordering {
    let get = |v: &Value| v.get(key).and_then(Value::as_i64).unwrap_or_default();
    get(a).cmp(&get(b))
}

fn compare_str(a: &Value, b: &Value, key: &str) -> Ordering {
    let get = |v: &Value| v.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    get(a).cmp(&get(b))
}
