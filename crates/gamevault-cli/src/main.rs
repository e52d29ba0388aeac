use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use gamevault_cli::Session;
use gamevault_cli::config::{DEFAULT_CONFIG_PATH, VaultConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix("--config=").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = VaultConfig::load(&config_path);
    if let Err(e) = config.validate() {
        tracing::error!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    let mut session = match Session::load(config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("failed to load data files: {e}");
            return ExitCode::FAILURE;
        },
    };
    tracing::info!(
        players = session.players().len(),
        games = session.games().len(),
        output = %session.config().output_file.display(),
        "gamevault ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = session.run(stdin.lock(), &mut stdout.lock(), true) {
        tracing::error!("terminal i/o failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
