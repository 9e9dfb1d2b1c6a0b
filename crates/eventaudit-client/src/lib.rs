//! AWS data access for the EventBridge configuration auditor.
//!
//! This crate provides [`AwsBackend`], the [`AccountBackend`] implementation
//! over the AWS SDK for Rust. All calls are read-only.

mod backend;
mod client;
mod config;
mod error;
pub mod api;

pub use client::{AwsBackend, AwsBackendBuilder};
pub use config::ClientConfig;
pub use eventaudit_core::{AccountBackend, AuditError, Result};
