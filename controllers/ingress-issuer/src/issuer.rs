//! Cluster issuer routing rules.
//!
//! An `IssuerRuleSet` is the ordered list of (issuer name, hostname pattern)
//! pairs read from `CLUSTER_ISSUERS` and `CLUSTER_ISSUER_<i>_REGEX` at startup.
//! It is never modified afterwards.

use crate::error::ControllerError;
use regex::Regex;

/// Comma-separated, ordered list of cluster issuer names
pub const CLUSTER_ISSUERS_ENV: &str = "CLUSTER_ISSUERS";

/// Environment key holding the hostname pattern of the issuer at 1-based `position`
pub fn pattern_env_key(position: usize) -> String {
    format!("CLUSTER_ISSUER_{}_REGEX", position)
}

/// A single cluster issuer and the hostnames it is responsible for.
#[derive(Debug, Clone)]
pub struct IssuerRule {
    name: String,
    pattern: Regex,
}

impl IssuerRule {
    /// Creates a rule, compiling `pattern`.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, ControllerError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ControllerError::InvalidConfig(
                "cluster issuer name must not be empty".to_string(),
            ));
        }
        let pattern = Regex::new(pattern).map_err(|source| ControllerError::InvalidPattern {
            key: format!("pattern of cluster issuer {}", name),
            source,
        })?;
        Ok(Self { name, pattern })
    }

    /// Issuer name, written verbatim into the issuer annotation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text of the hostname pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True when the pattern matches anywhere in `host`.
    ///
    /// The match is unanchored: `\.dev\.example\.com` matches
    /// `a.dev.example.com.evil.org` too. Anchor the pattern with `^`/`$` to
    /// require a full match.
    pub fn matches(&self, host: &str) -> bool {
        self.pattern.is_match(host)
    }
}

/// Ordered, non-empty collection of issuer rules.
#[derive(Debug, Clone)]
pub struct IssuerRuleSet {
    rules: Vec<IssuerRule>,
}

impl IssuerRuleSet {
    /// Builds a rule set from already constructed rules.
    pub fn new(rules: Vec<IssuerRule>) -> Result<Self, ControllerError> {
        if rules.is_empty() {
            return Err(ControllerError::InvalidConfig(
                "at least one cluster issuer is required".to_string(),
            ));
        }
        Ok(Self { rules })
    }

    /// Builds the rule set from environment-style keys resolved by `lookup`.
    ///
    /// Reads `CLUSTER_ISSUERS`, then `CLUSTER_ISSUER_<i>_REGEX` for every
    /// listed issuer, `i` being its 1-based position. Any missing key is an
    /// error naming that key; no issuer is ever dropped silently.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let names = lookup(CLUSTER_ISSUERS_ENV)
            .ok_or_else(|| ControllerError::MissingEnv(CLUSTER_ISSUERS_ENV.to_string()))?;
        if names.trim().is_empty() {
            return Err(ControllerError::MissingEnv(CLUSTER_ISSUERS_ENV.to_string()));
        }

        let mut rules = Vec::new();
        for (index, name) in names.split(',').enumerate() {
            let position = index + 1;
            let name = name.trim();
            if name.is_empty() {
                return Err(ControllerError::InvalidConfig(format!(
                    "{} entry {} is empty",
                    CLUSTER_ISSUERS_ENV, position
                )));
            }

            let key = pattern_env_key(position);
            let pattern = lookup(&key)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ControllerError::MissingEnv(key.clone()))?;
            let rule = IssuerRule::new(name, &pattern).map_err(|e| match e {
                ControllerError::InvalidPattern { source, .. } => {
                    ControllerError::InvalidPattern { key, source }
                }
                other => other,
            })?;
            rules.push(rule);
        }

        Self::new(rules)
    }

    /// Rules in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, IssuerRule> {
        self.rules.iter()
    }

    #[allow(clippy::len_without_is_empty)] // never empty
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl<'a> IntoIterator for &'a IssuerRuleSet {
    type Item = &'a IssuerRule;
    type IntoIter = std::slice::Iter<'a, IssuerRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DEV_PATTERN: &str = r"(.*)\.dev\.cloud\.domain\.de";
    const TEST_PATTERN: &str = r"(.*)\.test\.cloud\.domain\.de";

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(vars: &HashMap<String, String>) -> Result<IssuerRuleSet, ControllerError> {
        IssuerRuleSet::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_issuers_in_declaration_order() {
        let vars = env(&[
            ("CLUSTER_ISSUERS", "dev-cloud-issuer,test-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", DEV_PATTERN),
            ("CLUSTER_ISSUER_2_REGEX", TEST_PATTERN),
        ]);

        let issuers = build(&vars).unwrap();
        let rules: Vec<_> = issuers.iter().collect();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name(), "dev-cloud-issuer");
        assert_eq!(rules[0].pattern(), DEV_PATTERN);
        assert_eq!(rules[1].name(), "test-cloud-issuer");
        assert_eq!(rules[1].pattern(), TEST_PATTERN);
    }

    #[test]
    fn test_missing_pattern_for_second_issuer_fails() {
        let vars = env(&[
            ("CLUSTER_ISSUERS", "dev-cloud-issuer,test-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", DEV_PATTERN),
        ]);

        match build(&vars) {
            Err(ControllerError::MissingEnv(key)) => assert_eq!(key, "CLUSTER_ISSUER_2_REGEX"),
            other => panic!("expected missing CLUSTER_ISSUER_2_REGEX, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_issuer_list_fails() {
        let vars = env(&[("CLUSTER_ISSUER_1_REGEX", DEV_PATTERN)]);

        match build(&vars) {
            Err(ControllerError::MissingEnv(key)) => assert_eq!(key, "CLUSTER_ISSUERS"),
            other => panic!("expected missing CLUSTER_ISSUERS, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_issuer_list_fails() {
        let vars = env(&[("CLUSTER_ISSUERS", "  ")]);
        assert!(matches!(build(&vars), Err(ControllerError::MissingEnv(_))));

        let vars = env(&[
            ("CLUSTER_ISSUERS", "dev-cloud-issuer,,test-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", DEV_PATTERN),
            ("CLUSTER_ISSUER_2_REGEX", ".*"),
            ("CLUSTER_ISSUER_3_REGEX", TEST_PATTERN),
        ]);
        assert!(matches!(build(&vars), Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_pattern_counts_as_missing() {
        let vars = env(&[
            ("CLUSTER_ISSUERS", "dev-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", ""),
        ]);

        assert!(matches!(build(&vars), Err(ControllerError::MissingEnv(_))));
    }

    #[test]
    fn test_invalid_pattern_names_key() {
        let vars = env(&[
            ("CLUSTER_ISSUERS", "dev-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", "(unclosed"),
        ]);

        match build(&vars) {
            Err(ControllerError::InvalidPattern { key, .. }) => {
                assert_eq!(key, "CLUSTER_ISSUER_1_REGEX")
            }
            other => panic!("expected invalid pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_names_are_trimmed() {
        let vars = env(&[
            ("CLUSTER_ISSUERS", " dev-cloud-issuer , test-cloud-issuer"),
            ("CLUSTER_ISSUER_1_REGEX", DEV_PATTERN),
            ("CLUSTER_ISSUER_2_REGEX", TEST_PATTERN),
        ]);

        let names: Vec<_> = build(&vars).unwrap().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["dev-cloud-issuer", "test-cloud-issuer"]);
    }

    #[test]
    fn test_match_is_unanchored() {
        let rule = IssuerRule::new("dev-cloud-issuer", DEV_PATTERN).unwrap();

        assert!(rule.matches("x.dev.cloud.domain.de"));
        assert!(rule.matches("x.dev.cloud.domain.de.example.org"));
        assert!(!rule.matches("x.test.cloud.domain.de"));
        // needs at least one character before ".dev"
        assert!(!rule.matches("dev.cloud.domain.de"));
    }

    #[test]
    fn test_empty_rule_set_rejected() {
        assert!(IssuerRuleSet::new(Vec::new()).is_err());
        assert!(IssuerRule::new("", ".*").is_err());
    }
}
