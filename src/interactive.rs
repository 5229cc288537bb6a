use reqwest::Url;
use tracing::info;

use self::utils::{prompt_secret_handle_errors, prompt_text_handle_errors};
use crate::cli::{Args, PrivateKey};
use crate::config::Config;
use crate::deployment::Cmd;
use crate::serde_utils;

mod utils;

/// Resolves the deployment parameters, prompting for the connection details
/// neither the command line nor the environment provided
pub async fn run_interactive_session(args: Args) -> eyre::Result<Cmd> {
    let config: Config = if let Some(path) = args.config.as_ref() {
        info!("Using config at: {}", path.display());
        serde_utils::read_deserialize(path).await?
    } else {
        Config::default()
    };

    let settings = config.merge(args);

    let rpc_url = if let Some(rpc_url) = settings.rpc_url {
        info!("Using RPC: {rpc_url}");
        rpc_url
    } else {
        prompt_text_handle_errors::<Url>("Rpc Url:")?
    };

    let private_key = if let Some(private_key) = settings.private_key {
        private_key
    } else {
        prompt_secret_handle_errors::<PrivateKey>("Private key:")?
    };

    info!("Using account: {private_key}");

    Ok(Cmd {
        contract: settings.contract,
        artifacts: settings.artifacts,
        constructor_args: settings.constructor_args,
        rpc_url,
        private_key,
        report: settings.report,
    })
}
