//! Controller configuration.
//!
//! Everything is read from environment variables once at startup. Parsing
//! goes through a lookup function so tests can supply their own variables.

use crate::error::ControllerError;
use crate::issuer::IssuerRuleSet;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const RECONCILE_INTERVAL_ENV: &str = "RECONCILE_INTERVAL_SECONDS";
pub const LIST_FAILURE_POLICY_ENV: &str = "LIST_FAILURE_POLICY";
pub const ISSUER_MATCH_POLICY_ENV: &str = "ISSUER_MATCH_POLICY";
pub const WATCH_NAMESPACE_ENV: &str = "WATCH_NAMESPACE";

/// Delay between the end of one pass and the start of the next
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(10);

/// What the scheduler does when a pass cannot list Ingresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFailurePolicy {
    /// Stop the scheduler and exit the process with the error
    #[default]
    Exit,
    /// Log the error and run the next pass after the usual interval
    Retry,
}

impl FromStr for ListFailurePolicy {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exit" => Ok(Self::Exit),
            "retry" => Ok(Self::Retry),
            other => Err(ControllerError::InvalidConfig(format!(
                "{} must be 'exit' or 'retry', got '{}'",
                LIST_FAILURE_POLICY_ENV, other
            ))),
        }
    }
}

impl fmt::Display for ListFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => f.write_str("exit"),
            Self::Retry => f.write_str("retry"),
        }
    }
}

/// How many matching issuers are applied to a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Every matching issuer is applied in declaration order; the last one
    /// applied owns the annotation at the end of the pass.
    #[default]
    All,
    /// Only the first matching issuer in declaration order is applied.
    First,
}

impl FromStr for MatchPolicy {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first" => Ok(Self::First),
            other => Err(ControllerError::InvalidConfig(format!(
                "{} must be 'all' or 'first', got '{}'",
                ISSUER_MATCH_POLICY_ENV, other
            ))),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::First => f.write_str("first"),
        }
    }
}

/// Fully parsed controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub issuers: IssuerRuleSet,
    pub reconcile_interval: Duration,
    pub list_failure_policy: ListFailurePolicy,
    pub match_policy: MatchPolicy,
    /// `None` means all namespaces
    pub namespace: Option<String>,
}

impl ControllerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issuers = IssuerRuleSet::from_lookup(&lookup)?;

        let reconcile_interval = match lookup(RECONCILE_INTERVAL_ENV) {
            Some(raw) => parse_interval(&raw)?,
            None => DEFAULT_RECONCILE_INTERVAL,
        };

        let list_failure_policy = lookup(LIST_FAILURE_POLICY_ENV)
            .map(|raw| raw.parse::<ListFailurePolicy>())
            .transpose()?
            .unwrap_or_default();

        let match_policy = lookup(ISSUER_MATCH_POLICY_ENV)
            .map(|raw| raw.parse::<MatchPolicy>())
            .transpose()?
            .unwrap_or_default();

        let namespace = lookup(WATCH_NAMESPACE_ENV).filter(|ns| !ns.trim().is_empty());

        Ok(Self {
            issuers,
            reconcile_interval,
            list_failure_policy,
            match_policy,
            namespace,
        })
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ControllerError> {
    let seconds = raw.trim().parse::<u64>().map_err(|_| {
        ControllerError::InvalidConfig(format!(
            "{} must be a whole number of seconds, got '{}'",
            RECONCILE_INTERVAL_ENV, raw
        ))
    })?;
    if seconds == 0 {
        return Err(ControllerError::InvalidConfig(format!(
            "{} must be greater than zero",
            RECONCILE_INTERVAL_ENV
        )));
    }
    Ok(Duration::from_secs(seconds))
}
