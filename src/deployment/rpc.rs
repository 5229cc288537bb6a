use std::sync::Arc;

use ethers::abi::token::{LenientTokenizer, Tokenizer};
use ethers::abi::{Abi, Token};
use ethers::contract::ContractFactory as AbiContractFactory;
use ethers::prelude::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, U256};
use eyre::{bail, WrapErr};
use reqwest::Url;
use tracing::{info, instrument};

use super::{
    Account, ContractFactory, DeployedContract, FactoryLookup, SignerProvider,
};
use crate::artifacts::{ArtifactStore, ContractSpec};
use crate::cli::PrivateKey;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// An account backed by a local private key, signing against a JSON-RPC node
pub struct RpcAccounts {
    rpc_url: Url,
    private_key: PrivateKey,
}

#[derive(Clone)]
pub struct RpcSigner(pub Arc<SignerClient>);

pub struct RpcFactories {
    artifacts: ArtifactStore,
    constructor_args: Vec<String>,
}

pub struct RpcFactory {
    factory: AbiContractFactory<SignerClient>,
    constructor_args: Vec<Token>,
}

pub struct RpcContract {
    address: Address,
    transaction_hash: H256,
}

impl RpcAccounts {
    pub fn new(rpc_url: Url, private_key: PrivateKey) -> Self {
        Self {
            rpc_url,
            private_key,
        }
    }
}

impl SignerProvider for RpcAccounts {
    type Account = RpcSigner;

    #[instrument(skip_all, fields(rpc_url = %self.rpc_url))]
    async fn signers(&self) -> eyre::Result<Vec<RpcSigner>> {
        let provider = Provider::<Http>::try_from(self.rpc_url.as_str())?;
        let chain_id = provider
            .get_chainid()
            .await
            .wrap_err("Fetching chain id")?;

        info!(%chain_id, "Connected");

        let wallet = LocalWallet::from(self.private_key.key.clone())
            .with_chain_id(chain_id.as_u64());

        Ok(vec![RpcSigner(Arc::new(SignerMiddleware::new(provider, wallet)))])
    }
}

impl Account for RpcSigner {
    fn address(&self) -> Address {
        self.0.address()
    }

    fn chain_id(&self) -> u64 {
        self.0.signer().chain_id()
    }

    #[instrument(skip_all)]
    async fn balance(&self) -> eyre::Result<U256> {
        Ok(self.0.get_balance(self.address(), None).await?)
    }
}

impl RpcFactories {
    pub fn new(artifacts: ArtifactStore, constructor_args: Vec<String>) -> Self {
        Self {
            artifacts,
            constructor_args,
        }
    }
}

impl FactoryLookup<RpcSigner> for RpcFactories {
    type Factory = RpcFactory;

    #[instrument(skip_all, fields(contract = %contract))]
    async fn contract_factory(
        &self,
        contract: &ContractSpec,
        signer: &RpcSigner,
    ) -> eyre::Result<RpcFactory> {
        let artifact = self.artifacts.find(contract).await?;

        let constructor_args =
            tokenize_constructor_args(&artifact.abi, &self.constructor_args)
                .wrap_err_with(|| {
                    format!("Encoding constructor arguments of {contract}")
                })?;

        let factory = AbiContractFactory::new(
            artifact.abi,
            artifact.bytecode,
            signer.0.clone(),
        );

        Ok(RpcFactory {
            factory,
            constructor_args,
        })
    }
}

impl ContractFactory for RpcFactory {
    type Contract = RpcContract;

    #[instrument(name = "deploy", skip_all)]
    async fn deploy(self) -> eyre::Result<RpcContract> {
        let (contract, receipt) = self
            .factory
            .deploy_tokens(self.constructor_args)?
            .send_with_receipt()
            .await
            .wrap_err("Sending deployment transaction")?;

        if receipt.status != Some(1.into()) {
            bail!(
                "Deployment transaction {:?} failed",
                receipt.transaction_hash
            );
        }

        info!(tx = ?receipt.transaction_hash, gas_used = ?receipt.gas_used);

        Ok(RpcContract {
            address: contract.address(),
            transaction_hash: receipt.transaction_hash,
        })
    }
}

impl DeployedContract for RpcContract {
    fn address(&self) -> Address {
        self.address
    }

    fn transaction_hash(&self) -> Option<H256> {
        Some(self.transaction_hash)
    }
}

/// Parses `args` according to the constructor parameter types in `abi`
fn tokenize_constructor_args(
    abi: &Abi,
    args: &[String],
) -> eyre::Result<Vec<Token>> {
    let Some(constructor) = abi.constructor.as_ref() else {
        if !args.is_empty() {
            bail!("Contract has no constructor but {} args given", args.len());
        }

        return Ok(vec![]);
    };

    if constructor.inputs.len() != args.len() {
        bail!(
            "Constructor takes {} arguments but {} given",
            constructor.inputs.len(),
            args.len()
        );
    }

    constructor
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            LenientTokenizer::tokenize(&param.kind, arg).wrap_err_with(|| {
                format!("Invalid value {arg:?} for {} ({})", param.name, param.kind)
            })
        })
        .collect()
}
