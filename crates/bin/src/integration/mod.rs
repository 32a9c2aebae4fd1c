//! Glue between the command line and the library crates.

pub(crate) mod logging;
pub(crate) mod store_manager;
