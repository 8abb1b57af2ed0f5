//! Test definition validation and host sanity checks

use crate::{
    defaults,
    error::{AppError, Result},
    models::{TestDefinition, ValidatedTest},
    size::parse_size,
};
use std::collections::HashSet;
use std::time::Duration;

/// Check a test definition and return a corrected copy ready to execute.
///
/// The name must be non-empty, the operation must be `download` or `upload`
/// and the size must parse within the protocol limit. A non-positive
/// `repeat` is not an error; it becomes 1. The input is never modified.
pub fn validate_test(test: &TestDefinition) -> Result<ValidatedTest> {
    let reject = |reason: String| AppError::invalid_test(test.name.clone(), reason);

    if test.name.is_empty() {
        return Err(reject("test name is required".to_string()));
    }
    if !test.operation.is_known() {
        return Err(reject(format!(
            "operation must be 'download' or 'upload', got '{}'",
            test.operation
        )));
    }
    if test.size.trim().is_empty() {
        return Err(reject("size is required".to_string()));
    }

    let size = parse_size(&test.size).map_err(|e| reject(format!("invalid size format: {}", e)))?;

    let timeout = match test.timeout.as_deref() {
        Some(spec) => parse_timeout(spec).map_err(reject)?,
        None => defaults::DEFAULT_TIMEOUT,
    };

    Ok(ValidatedTest {
        name: test.name.clone(),
        operation: test.operation.clone(),
        repeat: normalize_repeat(test.repeat),
        size_spec: test.size.clone(),
        size,
        timeout,
    })
}

/// Zero or negative repeat counts mean a single attempt
pub fn normalize_repeat(repeat: i64) -> u32 {
    if repeat < 1 {
        1
    } else {
        u32::try_from(repeat).unwrap_or(u32::MAX)
    }
}

/// Parse a timeout such as "250ms", "10s", "2m" or a bare number of seconds
pub fn parse_timeout(spec: &str) -> std::result::Result<Duration, String> {
    let spec = spec.trim().to_lowercase();

    let (digits, unit): (&str, fn(u64) -> Duration) = if let Some(rest) = spec.strip_suffix("ms") {
        (rest, Duration::from_millis)
    } else if let Some(rest) = spec.strip_suffix('s') {
        (rest, Duration::from_secs)
    } else if let Some(rest) = spec.strip_suffix('m') {
        (rest, |minutes| Duration::from_secs(minutes.saturating_mul(60)))
    } else {
        (spec.as_str(), Duration::from_secs)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid timeout '{}'", spec));
    }

    let value = digits
        .parse::<u64>()
        .map_err(|_| format!("invalid timeout '{}'", spec))?;
    if value == 0 {
        return Err("timeout must be greater than 0".to_string());
    }

    Ok(unit(value))
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

/// Non-fatal finding about the resolved host list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }
}

/// Flag hosts that are unlikely to dial. Hosts are never rejected here;
/// dialing decides.
pub fn check_hosts(hosts: &[String]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for host in hosts {
        let has_port = host
            .rsplit_once(':')
            .map(|(addr, port)| !addr.is_empty() && port.parse::<u16>().is_ok())
            .unwrap_or(false);
        if !has_port {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Host '{}' does not look like address:port", host),
            ));
        }
        if !seen.insert(host.as_str()) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Host '{}' is listed more than once and will be tested each time", host),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn reason(result: Result<ValidatedTest>) -> String {
        match result {
            Err(AppError::InvalidTest { reason, .. }) => reason,
            other => panic!("expected invalid test, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_definition() {
        let definition = TestDefinition::new("small", "download", 3, "1KB");
        let validated = validate_test(&definition).unwrap();

        assert_eq!(validated.name, "small");
        assert_eq!(validated.operation, Operation::Download);
        assert_eq!(validated.repeat, 3);
        assert_eq!(validated.size, 1024);
        assert_eq!(validated.size_spec, "1KB");
        assert_eq!(validated.timeout, defaults::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_repeat_is_clamped_without_touching_input() {
        for repeat in [0, -1, i64::MIN] {
            let definition = TestDefinition::new("t", "upload", repeat, "1B");
            let validated = validate_test(&definition).unwrap();
            assert_eq!(validated.repeat, 1);
            assert_eq!(definition.repeat, repeat);
        }
        assert_eq!(normalize_repeat(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_rejections() {
        assert!(reason(validate_test(&TestDefinition::new("", "download", 1, "1KB"))).contains("name"));
        assert!(reason(validate_test(&TestDefinition::new("t", "ping", 1, "1KB"))).contains("operation"));
        assert!(reason(validate_test(&TestDefinition::new("t", "DOWNLOAD", 1, "1KB"))).contains("operation"));
        assert!(reason(validate_test(&TestDefinition::new("t", "upload", 1, ""))).contains("size is required"));
        assert!(reason(validate_test(&TestDefinition::new("t", "upload", 1, "abcKB"))).contains("invalid size"));
        assert!(reason(validate_test(&TestDefinition::new("t", "upload", 1, "17MB"))).contains("exceeds"));
    }

    #[test]
    fn test_invalid_test_carries_name() {
        match validate_test(&TestDefinition::new("huge", "upload", 1, "1GB")) {
            Err(AppError::InvalidTest { name, .. }) => assert_eq!(name, "huge"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_custom_timeout() {
        let definition = TestDefinition::new("t", "download", 1, "1KB").with_timeout("250ms");
        assert_eq!(validate_test(&definition).unwrap().timeout, Duration::from_millis(250));

        let definition = TestDefinition::new("t", "download", 1, "1KB").with_timeout("soon");
        assert!(reason(validate_test(&definition)).contains("invalid timeout"));
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_timeout("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_timeout(" 1500MS ").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_timeout("2m").unwrap(), Duration::from_secs(120));

        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("0ms").is_err());
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("s").is_err());
        assert!(parse_timeout("-5s").is_err());
        assert!(parse_timeout("1.5s").is_err());
        assert!(parse_timeout("1h").is_err());
    }

    #[test]
    fn test_check_hosts() {
        let hosts = vec![
            "127.0.0.1:9000".to_string(),
            "example.com".to_string(),
            "127.0.0.1:9000".to_string(),
            "[::1]:9000".to_string(),
        ];
        let warnings = check_hosts(&hosts);

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].level, ValidationLevel::Warning);
        assert!(warnings[0].message.contains("example.com"));
        assert_eq!(warnings[1].level, ValidationLevel::Info);
        assert!(warnings[1].message.contains("127.0.0.1:9000"));
    }
}
