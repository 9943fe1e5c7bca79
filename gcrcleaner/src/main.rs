use clap::Parser;
use libgcrcleaner::client::ClientConfig;
use libgcrcleaner::{ProcessEnvironment, RegistryLister};

mod format;
mod logging;
mod run;
mod settings;

use settings::{CliOverrides, Settings};

/// gcrcleaner - list the manifests of a container repository, newest first
///
/// Authenticates with --token (or GCRCLEANER_TOKEN); without a token,
/// ambient credentials are discovered from the environment.
#[derive(Parser, Debug)]
#[command(name = "gcrcleaner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bearer token for the registry [env: GCRCLEANER_TOKEN]
    #[arg(short, long)]
    token: Option<String>,

    /// Repository to list, e.g. asia.gcr.io/project/app [env: GCRCLEANER_REPO]
    #[arg(short, long)]
    repo: Option<String>,

    /// Request timeout in seconds [env: GCRCLEANER_TIMEOUT] [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format: pretty, json, yaml [env: GCRCLEANER_FORMAT]
    #[arg(short, long)]
    format: Option<format::OutputFormat>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            token: self.token.clone(),
            repo: self.repo.clone(),
            timeout: self.timeout,
            format: self.format,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = match Settings::load(&cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            format::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let lister = RegistryLister::new(ClientConfig::new().with_timeout(settings.timeout_seconds));

    match run::run(&settings, &ProcessEnvironment, &lister).await {
        Ok(output) => {
            if let Err(e) = format::write_output(&mut std::io::stdout().lock(), &output) {
                format::error(&format!("failed to write output: {}", e));
                std::process::exit(1);
            }
        }
        Err(e) => {
            format::error(&e.to_string());
            std::process::exit(1);
        }
    }
}
