use std::path::PathBuf;

use reqwest::Url;

use crate::artifacts::ContractSpec;
use crate::cli::PrivateKey;

/// Fully resolved deployment parameters
#[derive(Debug, Clone)]
pub struct Cmd {
    pub contract: ContractSpec,
    pub artifacts: PathBuf,
    pub constructor_args: Vec<String>,
    pub rpc_url: Url,
    pub private_key: PrivateKey,
    pub report: Option<PathBuf>,
}
