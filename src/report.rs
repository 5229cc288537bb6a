use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::artifacts::ContractSpec;
use crate::deployment::Deployment;

pub mod contract_deployment;

pub use self::contract_deployment::ContractDeployment;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub contract: ContractSpec,
    pub chain_id: u64,
    pub deployer: Address,
    pub deployer_balance: U256,
    pub deployment: ContractDeployment,
}

impl Report {
    pub fn new(contract: ContractSpec, deployment: &Deployment) -> Self {
        Self {
            contract,
            chain_id: deployment.chain_id,
            deployer: deployment.deployer,
            deployer_balance: deployment.balance,
            deployment: deployment.contract.clone(),
        }
    }
}
