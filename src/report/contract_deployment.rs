use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::deployment::DeployedContract;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ContractDeployment {
    pub address: Address,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<H256>,
}

impl ContractDeployment {
    pub fn from_contract(contract: &impl DeployedContract) -> Self {
        Self {
            address: contract.address(),
            transaction_hash: contract.transaction_hash(),
        }
    }
}
