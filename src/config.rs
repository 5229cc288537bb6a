use std::path::PathBuf;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::artifacts::ContractSpec;
use crate::cli::{Args, PrivateKey};

pub const DEFAULT_CONTRACT: &str = "TokenX";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Optional YAML file with deployment defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub contract: Option<ContractSpec>,

    #[serde(default)]
    pub artifacts: Option<PathBuf>,

    #[serde(default)]
    pub constructor_args: Vec<String>,
}

/// Command line arguments layered over the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub contract: ContractSpec,
    pub artifacts: PathBuf,
    pub constructor_args: Vec<String>,
    pub rpc_url: Option<Url>,
    pub private_key: Option<PrivateKey>,
    pub report: Option<PathBuf>,
}

impl Config {
    pub fn merge(self, args: Args) -> Settings {
        let constructor_args = if args.constructor_args.is_empty() {
            self.constructor_args
        } else {
            args.constructor_args
        };

        Settings {
            contract: args
                .contract
                .or(self.contract)
                .unwrap_or_else(|| ContractSpec::name(DEFAULT_CONTRACT)),
            artifacts: args
                .artifacts
                .or(self.artifacts)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            constructor_args,
            rpc_url: args.rpc_url,
            private_key: args.private_key,
            report: args.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use indoc::indoc;

    use super::*;

    #[test]
    fn defaults_apply_without_config_or_flags() {
        let args = Args::try_parse_from(["token-deployer"]).unwrap();
        let settings = Config::default().merge(args);

        assert_eq!(settings.contract, ContractSpec::name("TokenX"));
        assert_eq!(settings.artifacts, PathBuf::from("artifacts"));
        assert!(settings.constructor_args.is_empty());
    }

    #[test]
    fn flags_override_config_file() {
        let config: Config = serde_yaml::from_str(indoc! {r#"
            contract: contracts/TokenX.sol:TokenX
            artifacts: out
            constructor_args:
              - "1000"
        "#})
        .unwrap();

        let args = Args::try_parse_from(["token-deployer"]).unwrap();
        let settings = config.clone().merge(args);

        assert_eq!(
            settings.contract,
            ContractSpec::path_name("contracts/TokenX.sol", "TokenX")
        );
        assert_eq!(settings.artifacts, PathBuf::from("out"));
        assert_eq!(settings.constructor_args, vec!["1000"]);

        let args = Args::try_parse_from([
            "token-deployer",
            "--contract",
            "TokenY",
            "--constructor-arg",
            "5",
        ])
        .unwrap();
        let settings = config.merge(args);

        assert_eq!(settings.contract, ContractSpec::name("TokenY"));
        assert_eq!(settings.artifacts, PathBuf::from("out"));
        assert_eq!(settings.constructor_args, vec!["5"]);
    }
}
