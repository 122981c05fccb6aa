/// Unit tests for core rfiscan types
/// Tests evasion modes, methods, findings, and scan configuration
use rfiscan::models::{Evasion, Finding, Method};
use rfiscan::probe::TEST_SCRIPT;
use rfiscan::scanner::{ErrorPolicy, ScanConfig};

#[test]
fn test_evasion_names() {
    assert_eq!(Evasion::None.to_string(), "none");
    assert_eq!(Evasion::NullByte.to_string(), "null-byte");
    assert_eq!(Evasion::DoubleEncode.to_string(), "double-encode");
}

#[test]
fn test_evasion_parse() {
    assert_eq!(Evasion::parse("none"), Some(Evasion::None));
    assert_eq!(Evasion::parse("null-byte"), Some(Evasion::NullByte));
    assert_eq!(Evasion::parse("double-encode"), Some(Evasion::DoubleEncode));
    assert_eq!(Evasion::parse("NULL-BYTE"), None);
    assert_eq!(Evasion::parse("terminate"), None);
}

#[test]
fn test_method_conversion() {
    assert_eq!(Method::Get.as_reqwest(), reqwest::Method::GET);
    assert_eq!(Method::Post.as_reqwest(), reqwest::Method::POST);
    assert_eq!(Method::Get.to_string(), "GET");
}

#[test]
fn test_finding_serializes_with_kebab_case_evasion() {
    let finding = Finding {
        url: "https://example.com/page.php?vuln=bar".to_string(),
        param: "vuln".to_string(),
        evasion: Evasion::NullByte,
        inclusion_url: "https://example.com/page.php?vuln=x%00".to_string(),
    };

    let json = serde_json::to_value(&finding).unwrap();
    assert_eq!(json["param"], "vuln");
    assert_eq!(json["evasion"], "null-byte");
}

#[test]
fn test_scan_config_defaults() {
    let config = ScanConfig::default();
    assert_eq!(config.test_script, TEST_SCRIPT);
    assert_eq!(config.method, Method::Get);
    assert_eq!(config.evasions, Evasion::ALL.to_vec());
    assert!(config.params.is_none());
    assert_eq!(config.error_policy, ErrorPolicy::FailFast);
}

#[test]
fn test_default_test_script_is_https() {
    assert!(TEST_SCRIPT.starts_with("https://"));
    assert!(TEST_SCRIPT.ends_with("test.php"));
}
