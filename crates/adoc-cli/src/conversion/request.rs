use adoc_config::{Config, DEFAULT_TOOLKIT_CLASS, DEFAULT_TOOLKIT_MODULE};
use std::path::{Path, PathBuf};

/// What to convert and how. Built once, read-only while the conversion runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionRequest {
    source: PathBuf,
    out_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    backend: Option<String>,
    lang: Option<String>,
    attributes: Vec<String>,
    no_header_footer: bool,
}

impl ConversionRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_out_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_file = Some(path.into());
        self
    }

    pub fn with_out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Add an attribute given as `name=value` or a bare `name`
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn with_no_header_footer(mut self, enabled: bool) -> Self {
        self.no_header_footer = enabled;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn out_file(&self) -> Option<&Path> {
        self.out_file.as_deref()
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn no_header_footer(&self) -> bool {
        self.no_header_footer
    }

    /// Extra attributes split into name and value. A bare name maps to `""`.
    pub fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| match raw.split_once('=') {
                Some((name, value)) => (name.trim(), value),
                None => (raw.trim(), ""),
            })
            .collect()
    }

    /// Whether an extra attribute sets `name` explicitly
    pub fn sets_attribute(&self, name: &str) -> bool {
        self.attributes().iter().any(|(n, _)| *n == name)
    }
}

/// Module and class that make up the toolkit entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitEntry {
    pub module: String,
    pub class: String,
}

impl ToolkitEntry {
    pub fn new(module: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class: class.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_toolkit_module(), config.get_toolkit_class())
    }
}

impl Default for ToolkitEntry {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLKIT_MODULE, DEFAULT_TOOLKIT_CLASS)
    }
}
