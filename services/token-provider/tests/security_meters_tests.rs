//! Invalid-token counters as seen through `validate_token`.

use jsonwebtoken::Algorithm;
use prometheus::Registry;
use test_utils::fixtures::{
    decode_secret, payload_only_token, token_signed_with, with_prefix_char, SampleIdentity,
    BASE64_SECRET, ONE_MINUTE_MS, OTHER_BASE64_SECRET,
};
use token_provider::metrics::INVALID_TOKENS_METRIC_NAME;
use token_provider::{
    Authentication, GrantedAuthority, InvalidTokenCause, JwtConfig, SecurityMeters, TokenProvider,
};

struct Fixture {
    registry: Registry,
    provider: TokenProvider,
}

fn fixture(validity_ms: i64) -> Fixture {
    let registry = Registry::new();
    let meters = SecurityMeters::new(&registry).unwrap();
    let config = JwtConfig::default()
        .with_base64_secret(BASE64_SECRET)
        .with_token_validity_ms(validity_ms);
    let provider = TokenProvider::new(&config, meters).unwrap();
    Fixture { registry, provider }
}

fn anonymous() -> Authentication {
    let identity = SampleIdentity::anonymous();
    Authentication::new(
        identity.login.as_str(),
        identity.login.as_str(),
        identity
            .authorities
            .iter()
            .map(|a| GrantedAuthority::new(a.as_str()))
            .collect(),
    )
}

/// Reads the counter for `cause` straight from the registry.
fn gathered(registry: &Registry, cause: &str) -> f64 {
    registry
        .gather()
        .iter()
        .filter(|family| family.get_name() == INVALID_TOKENS_METRIC_NAME)
        .flat_map(|family| family.get_metric())
        .filter(|metric| {
            metric
                .get_label()
                .iter()
                .any(|label| label.get_name() == "cause" && label.get_value() == cause)
        })
        .map(|metric| metric.get_counter().get_value())
        .sum()
}

fn aggregate(registry: &Registry) -> f64 {
    ["invalid-signature", "expired", "unsupported", "malformed"]
        .iter()
        .map(|cause| gathered(registry, cause))
        .sum()
}

#[test]
fn test_valid_token_should_not_count_anything() {
    let f = fixture(ONE_MINUTE_MS);
    assert_eq!(aggregate(&f.registry), 0.0);

    let token = f.provider.create_token(&anonymous(), false).unwrap();
    assert!(f.provider.validate_token(&token));

    assert_eq!(aggregate(&f.registry), 0.0);
}

#[test]
fn test_token_expired_count() {
    let f = fixture(-ONE_MINUTE_MS);
    assert_eq!(gathered(&f.registry, "expired"), 0.0);

    let token = f.provider.create_token(&anonymous(), false).unwrap();
    assert!(!f.provider.validate_token(&token));

    assert_eq!(gathered(&f.registry, "expired"), 1.0);
    assert_eq!(aggregate(&f.registry), 1.0);
}

#[test]
fn test_subsecond_expired_token_count() {
    let f = fixture(-500);

    let token = f.provider.create_token(&anonymous(), false).unwrap();
    assert!(!f.provider.validate_token(&token));

    assert_eq!(gathered(&f.registry, "expired"), 1.0);
    assert_eq!(aggregate(&f.registry), 1.0);
}

#[test]
fn test_token_unsupported_count() {
    let f = fixture(ONE_MINUTE_MS);
    assert_eq!(gathered(&f.registry, "unsupported"), 0.0);

    let token = payload_only_token(&decode_secret(BASE64_SECRET), Algorithm::HS256);
    assert!(!f.provider.validate_token(&token));

    assert_eq!(gathered(&f.registry, "unsupported"), 1.0);
    assert_eq!(aggregate(&f.registry), 1.0);
}

#[test]
fn test_token_signature_invalid_count() {
    let f = fixture(ONE_MINUTE_MS);
    assert_eq!(gathered(&f.registry, "invalid-signature"), 0.0);

    let token = token_signed_with(&decode_secret(OTHER_BASE64_SECRET), "anonymous", ONE_MINUTE_MS);
    assert!(!f.provider.validate_token(&token));

    assert_eq!(gathered(&f.registry, "invalid-signature"), 1.0);
    assert_eq!(aggregate(&f.registry), 1.0);
}

#[test]
fn test_token_malformed_count() {
    let f = fixture(ONE_MINUTE_MS);
    assert_eq!(gathered(&f.registry, "malformed"), 0.0);

    let token = f.provider.create_token(&anonymous(), false).unwrap();
    assert!(!f.provider.validate_token(&with_prefix_char(&token)));

    assert_eq!(gathered(&f.registry, "malformed"), 1.0);
    assert_eq!(aggregate(&f.registry), 1.0);
}

/// Empty input is logged as an illegal argument but has no series of its
/// own, so every counter stays at zero.
#[test]
fn test_empty_token_is_not_counted() {
    let f = fixture(ONE_MINUTE_MS);

    assert!(!f.provider.validate_token(""));

    assert_eq!(aggregate(&f.registry), 0.0);
    assert_eq!(f.provider.meters().count(InvalidTokenCause::IllegalArgument), 0.0);
}

#[test]
fn test_counters_accumulate_per_cause() {
    let f = fixture(ONE_MINUTE_MS);
    let token = f.provider.create_token(&anonymous(), false).unwrap();

    for _ in 0..3 {
        assert!(!f.provider.validate_token(&with_prefix_char(&token)));
    }
    assert!(!f.provider.validate_token("wrong_jwt"));

    assert_eq!(gathered(&f.registry, "malformed"), 4.0);
    assert_eq!(gathered(&f.registry, "expired"), 0.0);
}
