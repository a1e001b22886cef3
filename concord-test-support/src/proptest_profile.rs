//! Environment-driven proptest configuration shared by property suites.

use std::env;

use proptest::test_runner::Config as ProptestConfig;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "CONCORD_PROPTEST_CASES";

/// Builds a proptest configuration, honouring [`CASES_ENV_KEY`] when set.
///
/// Invalid or zero overrides are ignored with a warning.
///
/// # Examples
/// ```
/// use concord_test_support::proptest_profile::suite_config;
///
/// let config = suite_config(64);
/// assert!(config.cases > 0);
/// ```
#[must_use]
pub fn suite_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: resolve_cases(env::var(CASES_ENV_KEY).ok().as_deref(), default_cases),
        ..ProptestConfig::default()
    }
}

fn resolve_cases(raw: Option<&str>, default_cases: u32) -> u32 {
    let Some(raw) = raw else {
        return default_cases;
    };
    match parse_cases(raw) {
        Ok(cases) => cases,
        Err(reason) => {
            tracing::warn!(
                env = CASES_ENV_KEY,
                raw = %raw,
                reason = %reason,
                "invalid property-test case override; using default",
            );
            default_cases
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}
