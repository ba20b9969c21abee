use crate::config_manager::{Config, KEYS};
use crate::logger;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::*;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    Show,
    Set {
        key: String,
        value: String,
    },
    /// Print the path of the config file.
    /// Set ADOC_CONFIG to use another file.
    Path,
}

pub fn handle_config(action: ConfigAction, opts: GlobalOpts) {
    match action {
        ConfigAction::Show => match Config::load() {
            Ok(config) => {
                println!("{}", "Configuration:".bold().green());
                if config.is_empty() {
                    if opts.verbosity_level() > 0 {
                        println!("  {}", "(empty)".yellow());
                    }
                } else {
                    for (key, value) in config.values_iter() {
                        println!("  {}: {}", key.cyan(), value);
                    }
                }
                if opts.verbosity_level() > 0 {
                    println!("  {}: {}", "backend".dimmed(), config.get_backend());
                    println!("  {}: {}", "lang".dimmed(), config.get_lang());
                }
            }
            Err(e) => {
                logger::error(&format!("Failed to load config: {}", e));
            }
        },
        ConfigAction::Set { key, value } => match Config::load() {
            Ok(mut config) => match config.set(&key, value.clone()) {
                Ok(()) => match config.save() {
                    Ok(()) => {
                        logger::success(&format!("Set {} = {}", key, value));
                    }
                    Err(e) => {
                        logger::error(&format!("Failed to save config: {}", e));
                    }
                },
                Err(e) => {
                    logger::error(&format!(
                        "{}. Currently supported keys: {}",
                        e,
                        KEYS.join(", ")
                    ));
                }
            },
            Err(e) => {
                logger::error(&format!("Failed to load config: {}", e));
            }
        },
        ConfigAction::Path => match Config::path() {
            Ok(config_path) => {
                logger::debug(&format!("Reading config from: {}", config_path.display()));
                println!("{}", config_path.display());
            }
            Err(e) => {
                logger::error(&format!("Failed to resolve config path: {}", e));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_opts() -> GlobalOpts {
        GlobalOpts {
            quiet: true,
            verbose: 0,
            no_stdout: false,
        }
    }

    fn verbose_opts() -> GlobalOpts {
        GlobalOpts {
            quiet: false,
            verbose: 1,
            no_stdout: false,
        }
    }

    #[test]
    fn test_config_show() {
        handle_config(ConfigAction::Show, verbose_opts());
    }

    #[test]
    fn test_config_set_unknown_key_quiet() {
        handle_config(
            ConfigAction::Set {
                key: "no-such-key".to_string(),
                value: "value".to_string(),
            },
            quiet_opts(),
        );
    }

    #[test]
    fn test_config_path() {
        handle_config(ConfigAction::Path, quiet_opts());
    }
}
