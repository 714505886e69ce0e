//! Rules-file loading and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, RuleError};
use crate::schema::PreferenceRule;

const MAX_DAYS_IN_ADVANCE: u32 = 30;

/// Load and validate all rules from a YAML file.
///
/// Rules come back sorted by court name.
pub fn load_rules(path: &Path) -> Result<Vec<PreferenceRule>> {
    let yaml = fs::read_to_string(path)?;
    let rules = parse_rules(&yaml)?;
    info!(path = %path.display(), count = rules.len(), "loaded preference rules");
    Ok(rules)
}

/// Parse a YAML map of court name → rule.
pub fn parse_rules(yaml: &str) -> Result<Vec<PreferenceRule>> {
    let by_court: BTreeMap<String, PreferenceRule> = serde_yaml::from_str(yaml)?;
    by_court
        .into_iter()
        .map(|(court, mut rule)| {
            rule.court = court;
            validate(&rule)?;
            Ok(rule)
        })
        .collect()
}

fn validate(rule: &PreferenceRule) -> Result<()> {
    if rule.court.trim().is_empty() {
        return Err(RuleError::Validation("court name must not be blank".into()));
    }
    if !(1..=MAX_DAYS_IN_ADVANCE).contains(&rule.days_in_advance) {
        return Err(RuleError::Validation(format!(
            "{}: days_in_advance must be between 1 and {MAX_DAYS_IN_ADVANCE}, got {}",
            rule.court, rule.days_in_advance
        )));
    }
    if let Some(url) = &rule.url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RuleError::Validation(format!(
                "{}: url must be http(s), got {url:?}",
                rule.court
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const TWO_COURTS: &str = r#"
riverside:
  url: https://example.com/booking/riverside
  days_in_advance: 3
  min_booking_time:
    weekday: "17:00"
  min_duration: 60
hillcrest:
  days_in_advance: 7
"#;

    #[test]
    fn parse_sorts_and_names_rules() {
        let rules = parse_rules(TWO_COURTS).unwrap();
        let courts: Vec<_> = rules.iter().map(|r| r.court.as_str()).collect();
        assert_eq!(courts, vec!["hillcrest", "riverside"]);
        assert_eq!(rules[1].days_in_advance, 3);
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().expect("create tempdir");
        let path = dir.path().join("courts.yml");
        fs::write(&path, TWO_COURTS).unwrap();
        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().expect("create tempdir");
        let err = load_rules(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, RuleError::Io(_)));
    }

    #[test]
    fn window_out_of_range_is_rejected() {
        let err = parse_rules("far:\n  days_in_advance: 45\n").unwrap_err();
        match err {
            RuleError::Validation(msg) => assert!(msg.contains("far")),
            other => panic!("expected Validation error, got: {other:?}"),
        }
        assert!(parse_rules("zero:\n  days_in_advance: 0\n").is_err());
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = parse_rules("odd:\n  url: ftp://example.com\n").unwrap_err();
        assert!(matches!(err, RuleError::Validation(_)));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_rules("riverside: [unclosed").unwrap_err();
        assert!(matches!(err, RuleError::Parse(_)));
    }
}
