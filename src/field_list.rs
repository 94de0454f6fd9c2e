//! Multi-field list parsing
//!
//! Core, PNR and TPFDF forms accept several fields at once as
//! `FIELD:DATA,FIELD:DATA`. Every field must resolve and belong to the same
//! macro; each data token goes through the token encoder.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::{encode_with, HexPayload};
use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::error::{FieldDataError, FieldDataResult};
use crate::field_lookup::FieldLookup;

const RECORD_ID_MAX_BYTES: usize = 8;

/// Encoded fields of one macro, in the order they were entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    macro_name: String,
    entries: Vec<(String, HexPayload)>,
}

/// Request body shape for a field list: base64 data keyed by field name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFieldList {
    pub macro_name: String,
    pub field_data: Map<String, Value>,
}

/// One already-canonical `FIELD:HEX` entry converted for transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDataItem {
    pub field: String,
    /// Base64 of the payload bytes
    pub data: String,
}

impl FieldList {
    fn new(macro_name: String) -> Self {
        Self {
            macro_name,
            entries: Vec::new(),
        }
    }

    // A repeated field keeps its first position and takes the latest value.
    fn insert(&mut self, field: String, payload: HexPayload) {
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = payload,
            None => self.entries.push((field, payload)),
        }
    }

    pub fn macro_name(&self) -> &str {
        &self.macro_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&HexPayload> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, payload)| payload)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HexPayload)> {
        self.entries.iter().map(|(name, payload)| (name.as_str(), payload))
    }

    /// Base64-encode every payload for a JSON request body
    pub fn to_wire(&self) -> WireFieldList {
        let field_data = self
            .iter()
            .map(|(name, payload)| (name.to_string(), Value::String(payload.to_base64())))
            .collect();
        WireFieldList {
            macro_name: self.macro_name.clone(),
            field_data,
        }
    }

    /// Render as `FIELD:HEX,FIELD:HEX`, the form TPFDF records are submitted in
    pub fn to_field_string(&self) -> String {
        self.iter()
            .map(|(name, payload)| format!("{name}:{payload}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse a field list with the default configuration.
///
/// The macro is fixed by `expected_macro` when given, otherwise by the first
/// field in the list.
pub fn parse_field_list<L>(
    text: &str,
    expected_macro: Option<&str>,
    lookup: &L,
) -> FieldDataResult<FieldList>
where
    L: FieldLookup + ?Sized,
{
    parse_field_list_with(text, expected_macro, lookup, &DEFAULT_CONFIG)
}

pub fn parse_field_list_with<L>(
    text: &str,
    expected_macro: Option<&str>,
    lookup: &L,
    config: &CodecConfig,
) -> FieldDataResult<FieldList>
where
    L: FieldLookup + ?Sized,
{
    let mut macro_name = expected_macro
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty());
    let mut list: Option<FieldList> = None;

    for item in text.split(',') {
        let (field, data) = split_item(item)?;
        let field = field.trim().to_uppercase();
        let reference = lookup
            .lookup(&field)
            .ok_or_else(|| FieldDataError::UnknownField { field: field.clone() })?;

        let expected = macro_name.get_or_insert_with(|| reference.name.clone());
        if *expected != reference.name {
            return Err(FieldDataError::MacroMismatch {
                field,
                macro_name: expected.clone(),
            });
        }

        let payload = encode_with(data, config)?;
        list.get_or_insert_with(|| FieldList::new(expected.clone()))
            .insert(field, payload);
    }

    // split(',') always yields at least one item, so the list is set.
    list.ok_or(FieldDataError::EmptyToken)
}

/// Convert an already-canonical `FIELD:HEX,...` string to transport items.
///
/// Empty items are skipped; the hex must be even-length.
pub fn convert_field_data(text: &str) -> FieldDataResult<Vec<FieldDataItem>> {
    text.split(',')
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (field, data) = split_item(item)?;
            let payload = HexPayload::parse(data)?;
            Ok(FieldDataItem {
                field: field.to_string(),
                data: payload.to_base64(),
            })
        })
        .collect()
}

/// Parse a hex record id, fixed ordinal or pool record id to its integer.
///
/// The hex is read big-endian; blank input is 0.
pub fn parse_record_id(hex: &str) -> FieldDataResult<u64> {
    let payload = HexPayload::parse(hex)?;
    if payload.byte_len() > RECORD_ID_MAX_BYTES {
        return Err(FieldDataError::RecordIdTooWide { rec_id: hex.trim().to_string() });
    }
    Ok(payload.to_bytes().iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

fn split_item(item: &str) -> FieldDataResult<(&str, &str)> {
    match item.split_once(':') {
        Some((field, data)) if !data.contains(':') => Ok((field, data)),
        _ => Err(FieldDataError::MalformedListItem { item: item.to_string() }),
    }
}
