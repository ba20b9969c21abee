use adoc::{
    commands::{
        bootstrap,
        config::{self, ConfigAction},
        convert,
    },
    logger, GlobalOpts,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adoc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Bundled AsciiDoc toolkit shim",
    long_about = "adoc extracts the AsciiDoc toolkit bundled with it and converts documents through it."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an AsciiDoc document
    Convert(convert::ConvertCommand),
    /// Extract the bundled toolkit if needed and print its location
    Bootstrap,
    /// Configure adoc
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.no_stdout)
    {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    match cli.command {
        Commands::Convert(cmd) => {
            if let Err(e) = convert::handle_convert(cmd, &cli.global) {
                logger::error(&format!("Convert command failed: {}", e));
                std::process::exit(1);
            }
        }
        Commands::Bootstrap => {
            if let Err(e) = bootstrap::handle_bootstrap(&cli.global) {
                logger::error(&format!("Bootstrap failed: {}", e));
                std::process::exit(1);
            }
        }
        Commands::Config { action } => {
            config::handle_config(action.unwrap_or(ConfigAction::Show), cli.global);
        }
    }
}
