//! Python runtime provisioning and materialisation.
//!
//! - [`tool_detection`] - locating a working `uv`
//! - [`provisioner`] - find-or-install of a managed interpreter
//! - [`environment`] - venv creation and hard-link relinking

pub mod environment;
pub mod provisioner;
pub mod tool_detection;

pub use environment::{create_environment, interpreter_aliases, relink};
pub use provisioner::ensure_interpreter;
pub use tool_detection::{find_uv, resolve_uv};
