//! `adoc bootstrap`: resolve the toolkit installation and print it

use crate::errors::CommandError;
use crate::GlobalOpts;
use adoc_bootstrap::{ArchiveBootstrap, ToolkitInstallation};
use adoc_config::Config;
use adoc_logger::{self as logger, ConsoleLog};

/// Build the bootstrap described by `config`
pub fn toolkit_bootstrap(config: &Config) -> Result<ArchiveBootstrap, CommandError> {
    let package = config.get_package_path()?;
    logger::debug(&format!("Package location: {}", package.display()));

    let mut bootstrap = ArchiveBootstrap::new(package).with_lock_timeout(config.get_lock_timeout());
    if let Some(dir) = config.get_install_dir() {
        bootstrap = bootstrap.with_install_dir(dir);
    }
    if let Some(root) = config.get_extract_root() {
        bootstrap = bootstrap.with_extract_root(root);
    }
    Ok(bootstrap)
}

/// Resolve the installation, turning "nothing found" into an error
pub fn resolve_toolkit(
    bootstrap: &mut ArchiveBootstrap,
) -> Result<ToolkitInstallation, CommandError> {
    bootstrap
        .resolve_installation(&ConsoleLog)?
        .ok_or_else(|| CommandError::ToolkitUnavailable(bootstrap.package().to_path_buf()))
}

pub fn handle_bootstrap(opts: &GlobalOpts) -> Result<(), CommandError> {
    let config = Config::load()?;
    let mut bootstrap = toolkit_bootstrap(&config)?;
    let installation = resolve_toolkit(&mut bootstrap)?;

    if opts.verbosity_level() > 0 {
        let state = if installation.freshly_extracted() {
            "extracted"
        } else {
            "already installed"
        };
        logger::info(&format!("Toolkit {}", state));
    }
    println!("{}", installation.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_bootstrap_from_config() -> Result<(), CommandError> {
        let config = Config {
            package_path: Some("/opt/adoc/adoc.pyz".to_string()),
            extract_root: Some("/var/cache/adoc".to_string()),
            lock_timeout_secs: Some(5),
            ..Config::default()
        };
        let bootstrap = toolkit_bootstrap(&config)?;
        assert_eq!(bootstrap.package(), Path::new("/opt/adoc/adoc.pyz"));
        assert_eq!(bootstrap.extract_root(), Path::new("/var/cache/adoc"));
        assert_eq!(config.get_lock_timeout(), Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn test_missing_package_is_unavailable() -> Result<(), CommandError> {
        let config = Config {
            package_path: Some("/tmp/adoc_no_such_package_4242.zip".to_string()),
            ..Config::default()
        };
        let mut bootstrap = toolkit_bootstrap(&config)?;
        let err = resolve_toolkit(&mut bootstrap);
        assert!(matches!(err, Err(CommandError::ToolkitUnavailable(_))));
        Ok(())
    }
}
