//! Shared test utilities for stepline
//!
//! - Letter-appending step sequences with an observable-effect log
//! - Helpers for driving an engine without a runtime
