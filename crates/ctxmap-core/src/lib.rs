//! Ctxmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the ctxmap parser,
//! validator and writer. It includes:
//!
//! - **Identity**: Process-unique element identities ([`identity::Identified`])
//! - **Keywords**: The reserved vocabulary of the language ([`keywords`] module)
//! - **Model**: The application-level domain model ([`model`] module)

pub mod identity;
pub mod keywords;
pub mod model;
