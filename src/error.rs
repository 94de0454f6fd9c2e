//! Error types for field-data validation
//!
//! Every failure here is a user input problem surfaced back to the form that
//! collected it. The messages are written for the end user and name the
//! offending token, field or item.

use std::error::Error as StdError;
use std::fmt;

/// Validation failure for a token, field list or accompanying form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDataError {
    /// Token was empty after trimming
    EmptyToken,
    /// A single quote with nothing after it
    EmptyQuotedText,
    /// Leading `-` followed by something other than decimal digits
    InvalidNegativeNumber { token: String },
    /// Negative number below the most negative register value
    NegativeOutOfRange { token: String, min: i64 },
    /// Decimal number above the largest positive register value
    NumberOutOfRange { token: String, max: i64 },
    /// Character with no code page 037 slot
    UnrepresentableText { ch: char },
    /// List item without exactly one colon
    MalformedListItem { item: String },
    /// Field lookup returned nothing
    UnknownField { field: String },
    /// Field belongs to a different macro than the rest of the list
    MacroMismatch { field: String, macro_name: String },
    /// Register name outside R0..R15
    InvalidRegister { register: String },
    /// Base register given but not a register name
    InvalidBaseRegister { register: String },
    /// Blank or R0 base register for a macro that needs one
    BaseRegisterRequired { macro_name: String },
    /// Field length outside the allowed range
    InvalidFieldLength { length: i64, max_length: i64 },
    /// PNR locator not 6 alphanumerics
    InvalidPnrLocator { locator: String },
    /// PNR element key not in the configured list
    InvalidPnrKey { key: String },
    /// TPFDF key not exactly 2 hex characters
    InvalidTpfdfKey { key: String },
    /// Name does not resolve to a macro
    InvalidTpfdfMacro { macro_name: String },
    /// Payload from the remote side is not valid base64
    InvalidBase64 { reason: String },
    /// Canonical payload expected but data is not even-length hex
    InvalidHex { data: String },
    /// Record id or ordinal wider than 8 bytes
    RecordIdTooWide { rec_id: String },
    /// Test-data document does not have the expected shape
    MalformedTestData { reason: String },
}

impl fmt::Display for FieldDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDataError::EmptyToken =>
                write!(f, "Field data cannot be empty"),
            FieldDataError::EmptyQuotedText =>
                write!(f, "There needs to be some text after a single quote"),
            FieldDataError::InvalidNegativeNumber { token } =>
                write!(f, "Invalid Negative Number - {token}"),
            FieldDataError::NegativeOutOfRange { token, min } =>
                write!(f, "Negative Number cannot be less than {min} - {token}"),
            FieldDataError::NumberOutOfRange { token, max } =>
                write!(f, "Number cannot be greater than {max} - {token}"),
            FieldDataError::UnrepresentableText { ch } =>
                write!(f, "Character '{ch}' cannot be converted to EBCDIC"),
            FieldDataError::MalformedListItem { item } =>
                write!(f, "Include a single colon : to separate field and data - {item}"),
            FieldDataError::UnknownField { field } =>
                write!(f, "Field name not found - {field}"),
            FieldDataError::MacroMismatch { field, macro_name } =>
                write!(f, "Field not in the same macro - {field} not in {macro_name}"),
            FieldDataError::InvalidRegister { register } =>
                write!(f, "Invalid Register - Register can be from R0 to R15 - {register}"),
            FieldDataError::InvalidBaseRegister { register } =>
                write!(f, "Invalid Base Register - Register can be from R0 to R15 - {register}"),
            FieldDataError::BaseRegisterRequired { macro_name } =>
                write!(f, "Base Register cannot be blank or R0 for macro {macro_name}"),
            FieldDataError::InvalidFieldLength { length, max_length } =>
                write!(f, "Length can be from 1 to {max_length} - {length}"),
            FieldDataError::InvalidPnrLocator { locator } =>
                write!(f, "PNR Locator needs to be 6 character alpha numeric - {locator}"),
            FieldDataError::InvalidPnrKey { key } =>
                write!(f, "Invalid PNR element key - {key}"),
            FieldDataError::InvalidTpfdfKey { key } =>
                write!(f, "Please enter 2 hex characters only - {key}"),
            FieldDataError::InvalidTpfdfMacro { macro_name } =>
                write!(f, "This is not a valid macro name - {macro_name}"),
            FieldDataError::InvalidBase64 { reason } =>
                write!(f, "Invalid base64 payload: {reason}"),
            FieldDataError::InvalidHex { data } =>
                write!(f, "Invalid hex data - {data}"),
            FieldDataError::RecordIdTooWide { rec_id } =>
                write!(f, "Record id can be at most 16 hex characters - {rec_id}"),
            FieldDataError::MalformedTestData { reason } =>
                write!(f, "Malformed test data: {reason}"),
        }
    }
}

impl StdError for FieldDataError {}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    FileError { path: String, error: String },
    /// Configuration file is not valid JSON for the expected shape
    ParseError { path: String, error: String },
    /// A parameter has an unusable value
    InvalidParameter { parameter: String, value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileError { path, error } =>
                write!(f, "Configuration file error '{path}': {error}"),
            ConfigError::ParseError { path, error } =>
                write!(f, "Configuration parse error '{path}': {error}"),
            ConfigError::InvalidParameter { parameter, value, reason } =>
                write!(f, "Invalid configuration parameter '{parameter}' = '{value}': {reason}"),
        }
    }
}

impl StdError for ConfigError {}

pub type FieldDataResult<T> = Result<T, FieldDataError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
