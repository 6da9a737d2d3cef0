//! Integration tests for stepline
//!
//! These tests verify that multiple components work together correctly.

#[path = "../common/mod.rs"]
pub mod common;

pub mod engine_properties;
pub mod playback_flow;
