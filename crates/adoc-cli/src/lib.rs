//! adoc library - expose modules for testing
//!
//! The binary is a thin clap front end over these modules. The conversion
//! orchestrator lives in [`conversion`]; everything it needs from the bundled
//! toolkit is reached through `adoc-bootstrap` and `adoc-python`.

pub mod commands;
pub mod common;
pub mod conversion;
pub mod errors;

pub use adoc_config as config_manager;
pub use adoc_logger as logger;
pub use common::GlobalOpts;
