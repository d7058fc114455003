// miette's derive macro generates code that triggers this lint
#![allow(unused_assignments)]

//! Synthesis engine for cfn2cdk.
//!
//! This crate turns a parsed template into a language-agnostic stack IR and
//! provides the shared half of every language backend.
//!
//! # Module Organization
//!
//! - [`resolve`] - Intrinsic function evaluation and condition resolution
//! - [`graph`] - Resource dependency graph and instantiation order
//! - [`pipeline`] - Phase-based compilation from template to stack IR
//! - [`language`] - Language abstractions (LanguageEmitter, LanguageCodegen, ...)
//! - [`emit`] - Shared emit driver rendering the stack IR through a LanguageEmitter
//! - [`builder`] - Code generation building blocks (CodeBuilder, Indent)
//! - [`testing`] - Test fixtures (feature-gated)

pub mod builder;
mod error;
pub mod emit;
pub mod graph;
pub mod language;
pub mod pipeline;
pub mod resolve;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{SynthError, SynthResult};
pub use graph::{DependencyGraph, build_order};
pub use language::{GenerateResult, LanguageCodegen, LanguageEmitter, PreviewFile};
