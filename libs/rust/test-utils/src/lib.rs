//! Shared test utilities for the token provider.
//!
//! This crate provides:
//! - Proptest generators for logins, authorities and validity windows
//! - Fixtures: secrets, sample identities and hand-crafted tokens

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
