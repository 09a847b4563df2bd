use clap::Parser;
use repolift::config::Config;
use repolift::interact::StdinPrompter;
use repolift::shared::error::AppError;
use repolift::{exit_codes, logging, provision};
use std::path::PathBuf;

/// Publish a local directory to a freshly created GitHub repository.
#[derive(Parser)]
#[command(name = "repolift", version, about)]
struct Cli {
    /// Directory to publish (defaults to the current directory).
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Path to a TOML config file with OAuth app credentials.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    let mut prompter = StdinPrompter;
    match provision(&cli.dir, &config, &mut prompter).await {
        Ok(clone_url) => {
            println!("Project uploaded: {clone_url}");
            std::process::exit(exit_codes::OK);
        }
        Err(AppError::Cancelled) => {
            // An explicit decline, not a failure; nothing was touched locally.
            eprintln!("Operation cancelled.");
            std::process::exit(exit_codes::CANCELLED);
        }
        Err(err) => {
            tracing::error!(%err, "provisioning failed");
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}
