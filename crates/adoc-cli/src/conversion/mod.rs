//! Conversion orchestration
//!
//! A conversion moves through three states, each a separate type:
//!
//! 1. [`ConversionOrchestrator`]: a request and a toolkit installation
//! 2. [`ConfiguredConversion`]: a toolkit instance with options and attributes
//!    applied, ready to run
//! 3. [`ConversionReport`]: the result of running it
//!
//! `configure` and `execute` consume their receiver, so a configured toolkit
//! instance is executed at most once.

pub mod assets;
mod request;
mod toolkit;

pub use request::{ConversionRequest, ToolkitEntry};
pub use toolkit::AsciiDocToolkit;

use crate::errors::ConversionError;
use adoc_bootstrap::ToolkitInstallation;
use adoc_logger::LogSink;
use adoc_python::{ObjectFactory, RuntimeState};
use std::path::{Path, PathBuf};

/// An unconfigured conversion
pub struct ConversionOrchestrator<'a> {
    installation: ToolkitInstallation,
    request: ConversionRequest,
    entry: ToolkitEntry,
    log: &'a dyn LogSink,
}

impl<'a> ConversionOrchestrator<'a> {
    pub fn new(
        installation: ToolkitInstallation,
        request: ConversionRequest,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            installation,
            request,
            entry: ToolkitEntry::default(),
            log,
        }
    }

    /// Use another module/class as the toolkit entry point
    pub fn with_entry(mut self, entry: ToolkitEntry) -> Self {
        self.entry = entry;
        self
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn installation(&self) -> &ToolkitInstallation {
        &self.installation
    }

    /// Instantiate the toolkit and apply the request to it.
    ///
    /// Options and attributes are applied in a fixed order: output file, image
    /// assets, backend, language, extra attributes, header/footer suppression.
    pub fn configure(
        self,
        runtime: &RuntimeState,
    ) -> Result<ConfiguredConversion<'a>, ConversionError> {
        let log = self.log;
        let source = absolute_path(self.request.source())
            .filter(|path| path.is_file())
            .ok_or_else(|| ConversionError::SourceNotFound(self.request.source().to_path_buf()))?;

        runtime
            .add_search_path(self.installation.path())
            .map_err(ConversionError::Configuration)?;

        let factory = ObjectFactory::<AsciiDocToolkit>::open(
            Some(runtime),
            &self.entry.module,
            &self.entry.class,
        )
        .map_err(ConversionError::from_setup)?;
        let toolkit = factory
            .create_object(&[])
            .map_err(ConversionError::from_setup)?;
        if log.is_debug_enabled() {
            log.debug(&format!(
                "Created {}.{} from {}",
                self.entry.module,
                self.entry.class,
                self.installation.path().display()
            ));
        }

        let mut out_file = None;
        let mut out_dir = self.request.out_dir().and_then(absolute_path);

        if let Some(requested) = self.request.out_file() {
            let path = absolute_path(requested).unwrap_or_else(|| requested.to_path_buf());
            append_option(&toolkit, log, "--out-file", Some(&path.to_string_lossy()))?;
            if out_dir.is_none() {
                out_dir = path.parent().map(Path::to_path_buf);
            }
            out_file = Some(path);
        }

        let images_copied = match out_dir {
            Some(ref dir) => copy_images(&self.installation, dir, log),
            None => None,
        };

        if let Some(backend) = self.request.backend() {
            append_option(&toolkit, log, "--backend", Some(backend))?;
        }

        if let Some(lang) = self.request.lang() {
            if self.request.sets_attribute("lang") {
                if log.is_debug_enabled() {
                    log.debug("Language set by an explicit attribute, ignoring --lang");
                }
            } else {
                set_attribute(&toolkit, log, "lang", lang)?;
            }
        }

        for (name, value) in self.request.attributes() {
            set_attribute(&toolkit, log, name, value)?;
        }

        if self.request.no_header_footer() {
            append_option(&toolkit, log, "--no-header-footer", None)?;
        }

        Ok(ConfiguredConversion {
            toolkit,
            source,
            out_file,
            out_dir,
            images_copied,
            log,
        })
    }
}

/// A toolkit instance ready to convert one document
pub struct ConfiguredConversion<'a> {
    toolkit: AsciiDocToolkit,
    source: PathBuf,
    out_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    images_copied: Option<usize>,
    log: &'a dyn LogSink,
}

impl ConfiguredConversion<'_> {
    /// Absolute path of the document to convert
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn out_file(&self) -> Option<&Path> {
        self.out_file.as_deref()
    }

    /// Output directory, given explicitly or derived from the output file
    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    pub fn toolkit(&self) -> &AsciiDocToolkit {
        &self.toolkit
    }

    /// Run the toolkit on the source document
    pub fn execute(self) -> Result<ConversionReport, ConversionError> {
        let log = self.log;
        if log.is_info_enabled() {
            log.info(&format!("Converting {}", self.source.display()));
        }

        self.toolkit
            .execute(&self.source)
            .map_err(|error| ConversionError::Execution {
                document: self.source.clone(),
                error,
            })?;

        let messages = self.toolkit.messages().unwrap_or_else(|e| {
            log.error(&format!("Could not read toolkit messages: {}", e));
            Vec::new()
        });
        for message in &messages {
            log.info(message);
        }

        Ok(ConversionReport {
            source: self.source,
            out_file: self.out_file,
            out_dir: self.out_dir,
            images_copied: self.images_copied,
            messages,
        })
    }
}

/// Outcome of a finished conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub out_file: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    /// Number of image files copied next to the output, if the copy ran
    pub images_copied: Option<usize>,
    /// Warnings reported by the toolkit
    pub messages: Vec<String>,
}

fn absolute_path(path: &Path) -> Option<PathBuf> {
    std::path::absolute(path).ok()
}

fn append_option(
    toolkit: &AsciiDocToolkit,
    log: &dyn LogSink,
    name: &str,
    value: Option<&str>,
) -> Result<(), ConversionError> {
    if log.is_debug_enabled() {
        log.debug(&format!("option {} {}", name, value.unwrap_or_default()));
    }
    toolkit
        .append_option(name, value)
        .map_err(ConversionError::from_setup)
}

fn set_attribute(
    toolkit: &AsciiDocToolkit,
    log: &dyn LogSink,
    name: &str,
    value: &str,
) -> Result<(), ConversionError> {
    if log.is_debug_enabled() {
        log.debug(&format!("attribute {}={}", name, value));
    }
    toolkit
        .set_attribute(name, value)
        .map_err(ConversionError::from_setup)
}

/// Copy the toolkit's `images` directory next to the output. Failures are logged
/// and do not stop the conversion.
fn copy_images(installation: &ToolkitInstallation, out_dir: &Path, log: &dyn LogSink) -> Option<usize> {
    let from = installation.images_dir();
    if !from.is_dir() {
        if log.is_debug_enabled() {
            log.debug(&format!("No images directory in {}", installation.path().display()));
        }
        return None;
    }

    let to = out_dir.join("images");
    match assets::copy_dir_recursive(&from, &to) {
        Ok(count) => {
            if log.is_debug_enabled() {
                log.debug(&format!("Copied {} images to {}", count, to.display()));
            }
            Some(count)
        }
        Err(e) => {
            log.error(&format!(
                "Failed to copy images from {} to {}: {}",
                from.display(),
                to.display(),
                e
            ));
            None
        }
    }
}
