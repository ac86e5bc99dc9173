//! Invalid-token metrics.
//!
//! One counter per rejection cause under a single metric name, registered on
//! an injected Prometheus registry.

use crate::jwt::InvalidTokenCause;
use prometheus::{CounterVec, Opts, Registry};

/// Name of the invalid-token counter.
pub const INVALID_TOKENS_METRIC_NAME: &str = "security_authentication_invalid_tokens_errors_total";

const INVALID_TOKENS_METRIC_HELP: &str =
    "Indicates validation error count of the tokens presented by the clients.";

/// Label carrying the rejection cause.
pub const INVALID_TOKENS_CAUSE_LABEL: &str = "cause";

/// Per-cause counters for rejected tokens.
#[derive(Clone)]
pub struct SecurityMeters {
    invalid_tokens: CounterVec,
}

impl SecurityMeters {
    /// Creates the counters and registers them.
    ///
    /// Every counted cause gets its series up front so all of them report
    /// zero before the first failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is already registered on `registry`.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let invalid_tokens = CounterVec::new(
            Opts::new(INVALID_TOKENS_METRIC_NAME, INVALID_TOKENS_METRIC_HELP),
            &[INVALID_TOKENS_CAUSE_LABEL],
        )?;
        registry.register(Box::new(invalid_tokens.clone()))?;

        for cause in InvalidTokenCause::COUNTED {
            if let Some(tag) = cause.metric_tag() {
                invalid_tokens.with_label_values(&[tag]);
            }
        }

        Ok(Self { invalid_tokens })
    }

    /// Records a rejected token. Causes without a metric tag are ignored.
    pub fn track(&self, cause: InvalidTokenCause) {
        if let Some(tag) = cause.metric_tag() {
            self.invalid_tokens.with_label_values(&[tag]).inc();
        }
    }

    /// Records a token with a bad signature.
    pub fn track_token_invalid_signature(&self) {
        self.track(InvalidTokenCause::InvalidSignature);
    }

    /// Records an expired token.
    pub fn track_token_expired(&self) {
        self.track(InvalidTokenCause::Expired);
    }

    /// Records an unsupported token.
    pub fn track_token_unsupported(&self) {
        self.track(InvalidTokenCause::Unsupported);
    }

    /// Records a malformed token.
    pub fn track_token_malformed(&self) {
        self.track(InvalidTokenCause::Malformed);
    }

    /// Current value of the series for `cause`; always zero for uncounted causes.
    #[must_use]
    pub fn count(&self, cause: InvalidTokenCause) -> f64 {
        cause
            .metric_tag()
            .map_or(0.0, |tag| self.invalid_tokens.with_label_values(&[tag]).get())
    }

    /// Sum over all counted causes.
    #[must_use]
    pub fn total(&self) -> f64 {
        InvalidTokenCause::COUNTED
            .iter()
            .map(|cause| self.count(*cause))
            .sum()
    }
}

impl std::fmt::Debug for SecurityMeters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityMeters")
            .field("metric", &INVALID_TOKENS_METRIC_NAME)
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meters() -> (Registry, SecurityMeters) {
        let registry = Registry::new();
        let meters = SecurityMeters::new(&registry).unwrap();
        (registry, meters)
    }

    #[test]
    fn test_counters_by_cause_are_created() {
        let (registry, _meters) = meters();

        let families = registry.gather();
        let family = families
            .iter()
            .find(|f| f.get_name() == INVALID_TOKENS_METRIC_NAME)
            .unwrap();

        let mut causes: Vec<&str> = family
            .get_metric()
            .iter()
            .flat_map(|m| m.get_label())
            .filter(|l| l.get_name() == INVALID_TOKENS_CAUSE_LABEL)
            .map(|l| l.get_value())
            .collect();
        causes.sort_unstable();

        assert_eq!(causes, vec!["expired", "invalid-signature", "malformed", "unsupported"]);
        assert!(family.get_metric().iter().all(|m| m.get_counter().get_value() == 0.0));
    }

    #[test]
    fn test_track_methods_bound_to_correct_counters() {
        let (_registry, meters) = meters();

        assert_eq!(meters.count(InvalidTokenCause::Expired), 0.0);
        meters.track_token_expired();
        assert_eq!(meters.count(InvalidTokenCause::Expired), 1.0);

        assert_eq!(meters.count(InvalidTokenCause::Unsupported), 0.0);
        meters.track_token_unsupported();
        assert_eq!(meters.count(InvalidTokenCause::Unsupported), 1.0);

        assert_eq!(meters.count(InvalidTokenCause::InvalidSignature), 0.0);
        meters.track_token_invalid_signature();
        assert_eq!(meters.count(InvalidTokenCause::InvalidSignature), 1.0);

        assert_eq!(meters.count(InvalidTokenCause::Malformed), 0.0);
        meters.track_token_malformed();
        assert_eq!(meters.count(InvalidTokenCause::Malformed), 1.0);

        assert_eq!(meters.total(), 4.0);
    }

    #[test]
    fn test_illegal_argument_not_counted() {
        let (_registry, meters) = meters();
        meters.track(InvalidTokenCause::IllegalArgument);
        assert_eq!(meters.total(), 0.0);
        assert_eq!(meters.count(InvalidTokenCause::IllegalArgument), 0.0);
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        SecurityMeters::new(&registry).unwrap();
        assert!(SecurityMeters::new(&registry).is_err());
    }
}
