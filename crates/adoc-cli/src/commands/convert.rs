//! `adoc convert`: run one document through the bundled toolkit

use crate::commands::bootstrap::{resolve_toolkit, toolkit_bootstrap};
use crate::conversion::{ConversionOrchestrator, ConversionReport, ConversionRequest, ToolkitEntry};
use crate::errors::CommandError;
use crate::GlobalOpts;
use adoc_config::Config;
use adoc_logger::{self as logger, ConsoleLog};
use adoc_python::RuntimeState;
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ConvertCommand {
    /// AsciiDoc source document
    pub source: PathBuf,

    /// Write the output to this file
    #[arg(short = 'o', long = "out-file", value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Output directory (defaults to the directory of --out-file)
    #[arg(short = 'D', long = "destination-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Backend to render with (default from config, else html5)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Define a document attribute, `name=value` or `name`
    #[arg(short = 'a', long = "attribute", value_name = "ATTRIBUTE")]
    pub attributes: Vec<String>,

    /// Suppress the document header and footer
    #[arg(short = 's', long)]
    pub no_header_footer: bool,

    /// Document language code (default from config, else en)
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,
}

impl ConvertCommand {
    /// The request for this invocation, with unset values taken from `config`
    pub fn to_request(&self, config: &Config) -> ConversionRequest {
        let mut request = ConversionRequest::new(&self.source)
            .with_backend(self.backend.as_deref().unwrap_or(config.get_backend()))
            .with_lang(self.lang.as_deref().unwrap_or(config.get_lang()))
            .with_attributes(self.attributes.iter().cloned())
            .with_no_header_footer(self.no_header_footer);
        if let Some(ref out_file) = self.out_file {
            request = request.with_out_file(out_file);
        }
        if let Some(ref out_dir) = self.out_dir {
            request = request.with_out_dir(out_dir);
        }
        request
    }
}

pub fn handle_convert(
    cmd: ConvertCommand,
    _opts: &GlobalOpts,
) -> Result<ConversionReport, CommandError> {
    let config = Config::load()?;
    let request = cmd.to_request(&config);

    // Keep the bootstrap alive until the conversion is over: dropping it
    // removes the intermediate archive copy.
    let mut bootstrap = toolkit_bootstrap(&config)?;
    let installation = resolve_toolkit(&mut bootstrap)?;
    logger::debug(&format!("AsciiDoc home: {}", installation.path().display()));

    let runtime = RuntimeState::shared()?;
    if let Some(venv) = config.get_venv_path() {
        let site_packages = runtime.add_venv(&venv)?;
        logger::debug(&format!("Using site-packages {}", site_packages.display()));
    }

    let log = ConsoleLog;
    logger::spinner_start(&format!("Converting {}", cmd.source.display()));
    let result = ConversionOrchestrator::new(installation, request, &log)
        .with_entry(ToolkitEntry::from_config(&config))
        .configure(runtime)
        .and_then(|configured| configured.execute());

    match result {
        Ok(report) => {
            let target = report
                .out_file
                .as_ref()
                .or(report.out_dir.as_ref())
                .map_or_else(|| "default location".to_string(), |p| p.display().to_string());
            logger::spinner_success(&format!(
                "{} {} -> {}",
                "Converted".green(),
                report.source.display(),
                target
            ));
            Ok(report)
        }
        Err(e) => {
            logger::spinner_error(&format!("Failed to convert {}", cmd.source.display()));
            Err(e.into())
        }
    }
}
