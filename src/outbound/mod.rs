//! Outbound adapters implementing the domain ports.

pub mod auth;
pub mod notify;
pub mod persistence;
