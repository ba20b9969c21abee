//! Self-locating bootstrap for the bundled AsciiDoc toolkit
//!
//! The adoc package ships the toolkit as a nested archive (`asciidoc*.zip`)
//! inside its own distribution archive. On first use the nested archive is
//! copied out next to the package, unpacked there, and the resulting directory
//! becomes the toolkit home. Later runs find the directory and skip straight
//! to it.
//!
//! Failures are split in two tiers:
//! - anything that only prevents discovery or a single entry from being
//!   written is logged and the bootstrap returns what it can;
//! - a directory that cannot be created aborts with [`BootstrapError::DirectoryCreation`].

mod bootstrap;
mod cleanup;
pub mod discovery;
pub mod errors;
pub mod extract;
mod lock;

pub use bootstrap::{ArchiveBootstrap, ToolkitInstallation};
pub use cleanup::DeferredCleanup;
pub use discovery::{DiscoveredArchive, EntryPattern};
pub use errors::BootstrapError;
pub use lock::InstallLock;
