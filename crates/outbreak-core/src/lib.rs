//! Core types and trait definitions for the outbreak tracker.
//!
//! This crate is free of HTTP and database dependencies. It holds the record
//! types, the id-or-name resolver, the page envelope, the uniqueness guard,
//! and the case aggregation engine. Every other crate depends on it.

// Native `async fn` in traits; suppress the advisory lint about `Send`
// bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod case;
pub mod district;
pub mod error;
pub mod guard;
pub mod notice;
pub mod page;
pub mod resolve;
pub mod store;
pub mod user;
pub mod weather;

pub use error::{Error, Result};
