//! Shared proptest generators.

use proptest::prelude::*;

/// Generate login names.
pub fn login_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.@-]{0,49}"
}

/// Generate authority names. Never contains the `,` separator.
pub fn authority_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ROLE_ADMIN".to_string()),
        Just("ROLE_USER".to_string()),
        Just("ROLE_ANONYMOUS".to_string()),
        "ROLE_[A-Z][A-Z_]{0,19}",
    ]
}

/// Generate authority lists of up to five entries.
pub fn authorities_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(authority_strategy(), 0..5)
}

/// Generate validity windows between one minute and one day, in milliseconds.
pub fn validity_ms_strategy() -> impl Strategy<Value = i64> {
    60_000i64..86_400_000i64
}

/// Generate printable strings that are not tokens.
pub fn garbage_token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,64}"
}
