//! Core business logic - framework-agnostic rooming house operations.
//!
//! Every operation takes the database handle explicitly and, where data is scoped,
//! the caller's [`scope::Identity`].

pub mod account;
pub mod additional;
pub mod catalog;
pub mod dashboard;
pub mod lease;
pub mod package;
pub mod pricing;
pub mod property;
pub mod room;
pub mod scope;
pub mod tenant;
pub mod transaction;
