//! Shared utilities and common types for the admin dashboard crates.
//!
//! This crate provides common functionality used across all other crates:
//! - Text helpers for labels derived from slugs and module keys
//! - Common validation logic for role metadata

pub mod text;
pub mod validation;
