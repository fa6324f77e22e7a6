//! Application services.

pub mod account;
