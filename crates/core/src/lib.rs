//! Domain types for the qa-relay notification adapter.
//!
//! Everything in this crate is pure: no I/O, no async. The engine crate
//! (`qa-relay-events`) and the persistence crate (`qa-relay-db`) build on
//! these types.

pub mod error;
pub mod event;
pub mod notification;
pub mod types;
pub mod user_config;
