//! Codec configuration
//!
//! Register width, the register name list, macros that do not need a base
//! register and the accepted PNR element keys. The `*_with` variants of the
//! encoder, decoder and validators take a [`CodecConfig`] explicitly; the plain
//! variants use [`CodecConfig::default`].

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Width of a general purpose register in bits
pub const REG_BITS: u32 = 32;

/// Largest unsigned value a register holds
pub const REG_MAX: u64 = (1 << REG_BITS) - 1;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "TPF2_FIELDDATA_CONFIG";

const DEFAULT_MAX_FIELD_LENGTH: i64 = 4095;

/// Shared configuration behind the plain (non-`_with`) entry points
pub(crate) static DEFAULT_CONFIG: Lazy<CodecConfig> = Lazy::new(CodecConfig::default);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Register width in bits; a multiple of 8 between 16 and 32
    pub reg_bits: u32,
    /// Valid register names, upper case
    pub registers: Vec<String>,
    /// Macros whose fields are addressed without a base register
    pub default_macros: Vec<String>,
    /// Accepted PNR element keys
    pub pnr_keys: Vec<String>,
    /// Upper bound for a field length
    pub max_field_length: i64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            reg_bits: REG_BITS,
            registers: (0..16).map(|n| format!("R{n}")).collect(),
            default_macros: ["WA0AA", "EB0EB", "GLOBAL", "MI0MI"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pnr_keys: [
                "header", "name", "fqtv", "itin", "subs_card_seg", "group_plan", "rcvd_from",
                "phone", "ticket", "remarks", "ssr", "osi", "prs_seats",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
        }
    }
}

impl CodecConfig {
    /// Largest unsigned register value, e.g. `0xFFFFFFFF` for 32 bits
    pub fn reg_max(&self) -> u64 {
        (1u64 << self.reg_bits) - 1
    }

    /// Number of hex digits in a full register
    pub fn word_hex_digits(&self) -> usize {
        (self.reg_bits / 4) as usize
    }

    /// Most negative signed register value
    pub fn min_signed(&self) -> i64 {
        -(1i64 << (self.reg_bits - 1))
    }

    /// Largest positive signed register value
    pub fn max_signed(&self) -> i64 {
        (1i64 << (self.reg_bits - 1)) - 1
    }

    pub fn is_register(&self, name: &str) -> bool {
        self.registers.iter().any(|r| r == name)
    }

    pub fn is_default_macro(&self, macro_name: &str) -> bool {
        self.default_macros.iter().any(|m| m == macro_name)
    }

    pub fn is_pnr_key(&self, key: &str) -> bool {
        self.pnr_keys.iter().any(|k| k == key)
    }

    /// Check that derived limits are meaningful
    pub fn validate(&self) -> ConfigResult<()> {
        if !(16..=32).contains(&self.reg_bits) || self.reg_bits % 8 != 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "reg_bits".to_string(),
                value: self.reg_bits.to_string(),
                reason: "must be 16, 24 or 32".to_string(),
            });
        }
        if self.registers.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "registers".to_string(),
                value: "[]".to_string(),
                reason: "at least one register is required".to_string(),
            });
        }
        if self.max_field_length < 1 || self.max_field_length > i64::from(u32::MAX) {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_field_length".to_string(),
                value: self.max_field_length.to_string(),
                reason: format!("must be between 1 and {}", u32::MAX),
            });
        }
        Ok(())
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate configuration from JSON; missing keys keep defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let mut config: CodecConfig = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            error: e.to_string(),
        })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::ParseError { error, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                error,
            },
            other => other,
        })
    }

    /// Load from [`default_config_path`] if present, otherwise defaults
    pub fn load_or_default() -> Self {
        let path = default_config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default codec configuration: {e}");
                Self::default()
            }
        }
    }

    // Register and macro names are compared upper case.
    fn normalize(&mut self) {
        for name in self.registers.iter_mut().chain(self.default_macros.iter_mut()) {
            *name = name.trim().to_uppercase();
        }
    }
}

/// Resolve the config file location.
/// Priority:
/// 1) TPF2_FIELDDATA_CONFIG env var
/// 2) Platform config dir: <config>/tpf2-fielddata/config.json
/// 3) Current directory fallback: ./config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(p);
    }
    dirs::config_dir()
        .map(|dir| dir.join("tpf2-fielddata").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = CodecConfig::default();
        assert_eq!(config.reg_max(), 0xFFFF_FFFF);
        assert_eq!(config.reg_max(), REG_MAX);
        assert_eq!(config.word_hex_digits(), 8);
        assert_eq!(config.min_signed(), -0x8000_0000);
        assert_eq!(config.max_signed(), 0x7FFF_FFFF);
        assert_eq!(config.registers.len(), 16);
        assert!(config.is_register("R0"));
        assert!(config.is_register("R15"));
        assert!(!config.is_register("R16"));
        assert!(config.is_default_macro("WA0AA"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CodecConfig::from_json(r#"{"default_macros": ["wa0aa", "ui2pf"]}"#).unwrap();
        assert_eq!(config.default_macros, vec!["WA0AA".to_string(), "UI2PF".to_string()]);
        assert_eq!(config.reg_bits, 32);
        assert_eq!(config.registers.len(), 16);
    }

    #[test]
    fn test_invalid_reg_bits_rejected() {
        let err = CodecConfig::from_json(r#"{"reg_bits": 12}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { ref parameter, .. } if parameter == "reg_bits"));
    }

    #[test]
    fn test_shared_default_matches_default() {
        assert_eq!(*DEFAULT_CONFIG, CodecConfig::default());
        assert!(std::ptr::eq(&*DEFAULT_CONFIG, &*DEFAULT_CONFIG));
    }

    #[test]
    fn test_max_field_length_bounds() {
        let err = CodecConfig::from_json(r#"{"max_field_length": 4294967296}"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidParameter { ref parameter, .. } if parameter == "max_field_length")
        );
        assert!(CodecConfig::from_json(r#"{"max_field_length": 0}"#).is_err());
        assert!(CodecConfig::from_json(r#"{"max_field_length": 4294967295}"#).is_ok());
    }

    #[test]
    fn test_sixteen_bit_limits() {
        let config = CodecConfig::from_json(r#"{"reg_bits": 16}"#).unwrap();
        assert_eq!(config.reg_max(), 0xFFFF);
        assert_eq!(config.word_hex_digits(), 4);
        assert_eq!(config.min_signed(), -0x8000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_field_length": 256}}"#).unwrap();
        let config = CodecConfig::load(file.path()).unwrap();
        assert_eq!(config.max_field_length, 256);
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CodecConfig::load(file.path()).unwrap_err();
        match err {
            ConfigError::ParseError { path, .. } => assert_eq!(path, file.path().display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = CodecConfig::default();
        let json = config.to_json().expect("Serialization should work");
        assert_eq!(CodecConfig::from_json(&json).unwrap(), config);
    }
}
