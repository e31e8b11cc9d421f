pub mod api;
pub mod config;
pub mod core_types;
pub mod error;
pub mod history;
pub mod loader;
pub mod optimizer;
pub mod partition;
pub mod roster;
pub mod scorer;
// cmd and reports belong to the binary crate (main.rs).
