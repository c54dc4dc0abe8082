//! Command implementations

pub mod apply;
pub mod common;
pub mod create;
pub mod version;
