use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

pub mod private_key;

pub use private_key::PrivateKey;

use crate::artifacts::ContractSpec;

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case")]
pub struct Args {
    /// Contract to deploy, either `Name` or `path/to/Source.sol:Name`
    ///
    /// Defaults to `TokenX`
    #[clap(long, env)]
    pub contract: Option<ContractSpec>,

    /// Directory containing the compiled contract artifacts
    ///
    /// Hardhat (`artifacts`) and Foundry (`out`) layouts are both supported.
    /// Defaults to `artifacts`
    #[clap(short, long, env)]
    pub artifacts: Option<PathBuf>,

    /// Path to an optional YAML configuration file
    #[clap(short, long, env = "DEPLOYMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Private key of the deployment account
    #[clap(short, long, env)]
    pub private_key: Option<PrivateKey>,

    /// The RPC Url to use for the deployment
    #[clap(short, long, env)]
    pub rpc_url: Option<Url>,

    /// Constructor argument, repeat for each parameter in order
    #[clap(long = "constructor-arg")]
    pub constructor_args: Vec<String>,

    /// Where to write the deployment report
    #[clap(long, env = "DEPLOYMENT_REPORT")]
    pub report: Option<PathBuf>,
}
