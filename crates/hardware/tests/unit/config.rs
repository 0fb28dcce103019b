//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization (including hex
//! strings), validation and file loading.

use std::io::Write;
use std::path::PathBuf;

use cosim_core::common::HarnessError;
use cosim_core::config::*;
use rstest::rstest;
use tempfile::NamedTempFile;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.max_cycles, 10_000);
    assert_eq!(config.general.halt_address, None);
    assert_eq!(config.general.clock_half_period, 1);
    assert_eq!(config.memory.words, 16 * 1024 * 1024);
    assert_eq!(config.memory.load_offset, 0x1000);
    assert_eq!(config.memory.boot_image, None);
    assert_eq!(config.trace.vcd, None);
    assert_eq!(config.trace.signature, None);
    assert!(!config.display.enabled);
    assert_eq!((config.display.width, config.display.height), (640, 480));
}

#[test]
fn test_empty_json_matches_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.general.max_cycles, Config::default().general.max_cycles);
    assert_eq!(config.memory.words, Config::default().memory.words);
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: Config = serde_json::from_str(r#"{ "memory": { "words": 1024 } }"#).unwrap();
    assert_eq!(config.memory.words, 1024);
    assert_eq!(config.memory.load_offset, 0x1000);
}

#[test]
fn test_hex_strings_and_integers() {
    let json = r#"{
        "general": { "max_cycles": "0x100", "halt_address": 4092 },
        "memory": { "load_offset": "0x2000" },
        "trace": { "signature": { "begin": "0x8000", "end": 32784, "path": "out.sig" } },
        "display": { "enabled": true, "frames_dir": "frames", "max_frames": 3 }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.general.max_cycles, 256);
    assert_eq!(config.general.halt_address, Some(0x0FFC));
    assert_eq!(config.memory.load_offset, 0x2000);
    assert_eq!(
        config.trace.signature,
        Some(SignatureWindow {
            begin: 0x8000,
            end: 0x8010,
            path: PathBuf::from("out.sig"),
        })
    );
    assert!(config.display.enabled);
    assert_eq!(config.display.max_frames, Some(3));
}

#[test]
fn test_unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<Config>(r#"{ "general": { "cycles": 5 } }"#).is_err());
}

#[test]
fn test_out_of_range_address_is_rejected() {
    let json = r#"{ "general": { "halt_address": "0x1_0000_0000" } }"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn test_validate_rejects_reversed_window() {
    let mut config = Config::default();
    config.trace.signature = Some(SignatureWindow {
        begin: 0x8010,
        end: 0x8000,
        path: PathBuf::from("x.sig"),
    });
    assert!(matches!(
        config.validate(),
        Err(HarnessError::InvalidSignatureWindow {
            begin: 0x8010,
            end: 0x8000
        })
    ));
}

#[test]
fn test_validate_accepts_empty_window() {
    let mut config = Config::default();
    config.trace.signature = Some(SignatureWindow {
        begin: 0x8000,
        end: 0x8000,
        path: PathBuf::from("x.sig"),
    });
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "max_cycles": 42 }} }}"#).unwrap();
    let config = Config::from_json_file(file.path()).unwrap();
    assert_eq!(config.general.max_cycles, 42);
}

#[test]
fn test_from_json_file_malformed() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(
        Config::from_json_file(file.path()),
        Err(HarnessError::Json { .. })
    ));
}

#[test]
fn test_from_json_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::from_json_file(&dir.path().join("absent.json")),
        Err(HarnessError::Io { .. })
    ));
}

#[rstest]
#[case("0", 0)]
#[case("4096", 4096)]
#[case("0x1000", 0x1000)]
#[case("0XFFC", 0xFFC)]
#[case("0xbabe_cafe", 0xBABE_CAFE)]
#[case(" 12 ", 12)]
fn test_parse_number(#[case] text: &str, #[case] expected: u32) {
    assert_eq!(parse_number(text).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("0x")]
#[case("-1")]
#[case("ten")]
#[case("0x100000000")]
fn test_parse_number_rejects(#[case] text: &str) {
    assert!(matches!(parse_number(text), Err(HarnessError::InvalidNumber(_))));
}

#[test]
fn test_parse_number_u64_accepts_wide_values() {
    assert_eq!(parse_number_u64("0x1_0000_0000").unwrap(), 1 << 32);
}
