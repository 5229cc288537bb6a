use std::io::Write;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use tracing::{info, instrument, warn};

use super::rpc::{RpcAccounts, RpcFactories};
use super::{run_deployment, Cmd, Deployment};
use crate::artifacts::{ArtifactStore, ContractSpec};
use crate::report::Report;
use crate::serde_utils;

pub struct DeploymentContext {
    pub contract: ContractSpec,
    pub accounts: RpcAccounts,
    pub factories: RpcFactories,
    pub report_path: Option<PathBuf>,
}

impl DeploymentContext {
    pub fn new(cmd: Cmd) -> Self {
        Self {
            contract: cmd.contract,
            accounts: RpcAccounts::new(cmd.rpc_url, cmd.private_key),
            factories: RpcFactories::new(
                ArtifactStore::new(cmd.artifacts),
                cmd.constructor_args,
            ),
            report_path: cmd.report,
        }
    }

    #[instrument(skip_all)]
    pub async fn run(&self, out: &mut impl Write) -> eyre::Result<()> {
        let deployment =
            run_deployment(&self.accounts, &self.factories, &self.contract, out)
                .await?;

        self.save_report(&deployment).await;

        Ok(())
    }

    /// The contract is already on chain at this point, so a report that
    /// cannot be written is only a warning.
    pub async fn save_report(&self, deployment: &Deployment) -> bool {
        let Some(path) = self.report_path.as_ref() else {
            return false;
        };

        let report = Report::new(self.contract.clone(), deployment);

        match write_report(path, &report).await {
            Ok(()) => {
                info!("Report written to {}", path.display());
                true
            }
            Err(err) => {
                warn!(
                    address = ?report.deployment.address,
                    tx = ?report.deployment.transaction_hash,
                    "Failed to write report: {err:?}"
                );
                false
            }
        }
    }
}

async fn write_report(path: &Path, report: &Report) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.wrap_err_with(|| {
            format!("Creating report directory {}", parent.display())
        })?;
    }

    serde_utils::write_serialize(path, report).await
}
