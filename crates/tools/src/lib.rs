//! Shared plumbing for the headless harness binaries: stderr logging and TOML config loading.

pub mod logging;
pub mod settings;
