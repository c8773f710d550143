//! # Storyline Common Library
//!
//! Shared code for the Storyline interview-to-blog wizard:
//! - Error type used outside the HTTP layer
//! - TOML configuration model (one typed object for every stage)
//! - Credential store backing the login gate

pub mod auth;
pub mod config;
pub mod error;

pub use error::{Error, Result};
