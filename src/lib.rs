// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod manager;
pub mod model;
pub mod remote;
pub mod storage;
