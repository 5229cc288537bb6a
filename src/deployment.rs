use std::io::Write;

use ethers::types::{Address, H256, U256};
use ethers::utils::to_checksum;
use eyre::{ContextCompat, WrapErr};
use tracing::{info, instrument};

use crate::artifacts::ContractSpec;
use crate::report::ContractDeployment;

pub mod cmd;
pub mod deployment_context;
pub mod rpc;

pub use self::cmd::Cmd;
pub use self::deployment_context::DeploymentContext;

/// Source of the accounts able to sign the deployment
pub trait SignerProvider {
    type Account: Account;

    async fn signers(&self) -> eyre::Result<Vec<Self::Account>>;
}

pub trait Account {
    fn address(&self) -> Address;

    fn chain_id(&self) -> u64;

    async fn balance(&self) -> eyre::Result<U256>;
}

/// Resolves a contract by name into a factory bound to `A`
pub trait FactoryLookup<A> {
    type Factory: ContractFactory;

    async fn contract_factory(
        &self,
        contract: &ContractSpec,
        signer: &A,
    ) -> eyre::Result<Self::Factory>;
}

pub trait ContractFactory {
    type Contract: DeployedContract;

    async fn deploy(self) -> eyre::Result<Self::Contract>;
}

pub trait DeployedContract {
    fn address(&self) -> Address;

    fn transaction_hash(&self) -> Option<H256> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Deployment {
    pub deployer: Address,
    pub chain_id: u64,
    pub balance: U256,
    pub contract: ContractDeployment,
}

/// Deploys `contract` from the first available signer.
///
/// Progress is written to `out` one line per step: the deployer address, its
/// balance in wei and finally the address of the new contract.
#[instrument(skip_all, fields(contract = %contract))]
pub async fn run_deployment<S, F>(
    signers: &S,
    factories: &F,
    contract: &ContractSpec,
    out: &mut impl Write,
) -> eyre::Result<Deployment>
where
    S: SignerProvider,
    F: FactoryLookup<S::Account>,
{
    let deployer = signers
        .signers()
        .await
        .wrap_err("Getting signers")?
        .into_iter()
        .next()
        .context("No signers available")?;

    let deployer_address = deployer.address();
    writeln!(out, "Deploying from: {}", to_checksum(&deployer_address, None))?;

    let balance = deployer
        .balance()
        .await
        .wrap_err("Querying deployer balance")?;
    writeln!(out, "Account balance: {balance}")?;

    let factory = factories
        .contract_factory(contract, &deployer)
        .await
        .wrap_err_with(|| format!("Getting contract factory for {contract}"))?;

    let deployed = factory
        .deploy()
        .await
        .wrap_err_with(|| format!("Deploying {contract}"))?;

    let deployment = ContractDeployment::from_contract(&deployed);
    writeln!(
        out,
        "Contract address: {}",
        to_checksum(&deployment.address, None)
    )?;

    info!(address = ?deployment.address, "Deployed {contract}");

    Ok(Deployment {
        deployer: deployer_address,
        chain_id: deployer.chain_id(),
        balance,
        contract: deployment,
    })
}
