//! Crowbook release packager library.
//!
//! This crate builds a crowbook release binary for one target triple on a
//! CI runner and bundles it into a distributable archive. It is used by the
//! `crowbook-packager` CLI binary and can be driven programmatically with a
//! custom [`command::CommandExecutor`] for testing.
//!
//! # Modules
//!
//! - [`archive`] - Archive naming, staging, and compression
//! - [`cli`] - Command-line argument definitions
//! - [`collect`] - Locating built executables in the release directory
//! - [`command`] - External command description and execution
//! - [`config`] - Validated run configuration
//! - [`error`] - Semantic error types
//! - [`lockfile`] - Lockfile regeneration
//! - [`manifest`] - Package version lookup
//! - [`output`] - The pipeline output channel
//! - [`pipeline`] - End-to-end orchestration
//! - [`plan`] - Build procedure selection and command expansion
//! - [`platform`] - Host OS families and archive formats
//! - [`probe`] - Best-effort version check of the built binary
//! - [`report`] - CI log progress and annotations
//! - [`target`] - Target triples and cross toolchains

pub mod archive;
pub mod cli;
pub mod collect;
pub mod command;
pub mod config;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod platform;
pub mod probe;
pub mod report;
pub mod target;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
