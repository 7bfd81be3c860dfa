//! Siglint Core Types and Definitions
//!
//! This crate provides the foundational types shared by the siglint
//! catalog builders and the validation engine. It includes:
//!
//! - **Signatures**: library function records and the catalog that indexes
//!   them ([`signature::LibraryCatalog`])
//! - **Error catalog**: curated compiler error patterns and their ordered
//!   matching contract ([`error_catalog::ErrorCatalog`])
//! - **Match rules**: the small pattern language used by error patterns
//!   ([`match_rule::MatchRule`])
//! - **Diagnostics**: error codes, severities and the [`error::Diagnostic`]
//!   builder
//! - **Call arguments**: balanced argument-list parsing shared by the
//!   catalog builder and the checker ([`call_args`])
//! - **Spans**: byte ranges into checked source ([`span::Span`])

pub mod call_args;
pub mod error;
pub mod error_catalog;
pub mod match_rule;
pub mod signature;
pub mod span;

mod core_error;

pub use core_error::CoreError;
