use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ethers::abi::Abi;
use ethers::types::Bytes;
use eyre::{bail, ContextCompat, WrapErr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, instrument};

use crate::serde_utils;

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_ARTIFACT_SUFFIX: &str = ".dbg.json";

/// A contract name, optionally qualified with its source path
/// (`contracts/TokenX.sol:TokenX`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSpec {
    pub path: Option<PathBuf>,
    pub name: String,
}

impl ContractSpec {
    pub fn path_name(path: impl AsRef<Path>, name: impl ToString) -> Self {
        Self {
            path: Some(path.as_ref().to_owned()),
            name: name.to_string(),
        }
    }

    pub fn name(name: impl ToString) -> Self {
        Self {
            path: None,
            name: name.to_string(),
        }
    }

    /// Whether the artifact at `artifact_path` (relative to the artifacts
    /// directory) was compiled from this contract
    fn matches(&self, artifact_path: &Path) -> bool {
        if artifact_path.file_stem().and_then(|s| s.to_str())
            != Some(self.name.as_str())
        {
            return false;
        }

        let Some(source) = self.path.as_deref() else {
            return true;
        };

        // Hardhat mirrors the full source path, Foundry only the file name
        let Some(parent) = artifact_path.parent() else {
            return false;
        };

        parent.ends_with(source)
            || (parent.components().count() == 1
                && parent.file_name() == source.file_name())
    }
}

impl fmt::Display for ContractSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path.as_deref() {
            write!(f, "{}:{}", path.display(), self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl FromStr for ContractSpec {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let spec = match s.rsplit_once(':') {
            Some((path, name)) if !path.is_empty() => {
                Self::path_name(path, name)
            }
            Some((_, name)) => Self::name(name),
            None => Self::name(s),
        };

        if spec.name.is_empty() {
            bail!("Missing contract name in {s:?}");
        }

        Ok(spec)
    }
}

impl Serialize for ContractSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_utils::display_from_str::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for ContractSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_utils::display_from_str::deserialize(deserializer)
    }
}

#[derive(Debug, derive_more::Display)]
#[display(fmt = "Contract not found: {}", spec)]
pub struct ContractNotFound {
    pub spec: ContractSpec,
}

impl std::error::Error for ContractNotFound {}

/// A compiled contract ready to be deployed
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    abi: Abi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat
    Hex(String),
    /// Foundry
    Object { object: String },
}

impl Artifact {
    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Reading from {}", path.display()))?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> eyre::Result<Self> {
        let raw: RawArtifact = serde_json::from_str(content)
            .wrap_err_with(|| format!("Parsing {}", path.display()))?;

        let name = match raw.contract_name {
            Some(name) => name,
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Artifact file has no name")?
                .to_string(),
        };

        let bytecode = match raw.bytecode {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        };
        let bytecode = bytecode.trim_start_matches("0x");

        if bytecode.is_empty() {
            bail!("{name} has no bytecode, is it abstract or an interface?");
        }

        if bytecode.contains("__") {
            bail!("{name} has unlinked library references");
        }

        let bytecode = hex::decode(bytecode)
            .wrap_err_with(|| format!("Decoding bytecode of {name}"))?;

        Ok(Self {
            name,
            path: path.to_owned(),
            abi: raw.abi,
            bytecode: bytecode.into(),
        })
    }
}

/// The output directory of a contract compiler
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_owned(),
        }
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn find(&self, spec: &ContractSpec) -> eyre::Result<Artifact> {
        let mut candidates = self.candidates(spec).await?;

        match candidates.len() {
            0 => Err(ContractNotFound { spec: spec.clone() }.into()),
            1 => {
                let artifact = Artifact::load(candidates.remove(0)).await?;
                debug!(
                    "Loaded {} from {}",
                    artifact.name,
                    artifact.path.display()
                );
                Ok(artifact)
            }
            _ => {
                let candidates = candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                bail!(
                    "Multiple artifacts match {spec}: {candidates}. \
                     Use a fully qualified name like path/to/Source.sol:{}",
                    spec.name
                )
            }
        }
    }

    async fn candidates(
        &self,
        spec: &ContractSpec,
    ) -> eyre::Result<Vec<PathBuf>> {
        let mut found = vec![];
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries =
                tokio::fs::read_dir(&dir).await.wrap_err_with(|| {
                    format!("Reading artifacts directory {}", dir.display())
                })?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                if entry.file_type().await?.is_dir() {
                    if entry.file_name() != BUILD_INFO_DIR {
                        pending.push(path);
                    }
                    continue;
                }

                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();

                if !file_name.ends_with(".json")
                    || file_name.ends_with(DEBUG_ARTIFACT_SUFFIX)
                {
                    continue;
                }

                let relative = path.strip_prefix(&self.root)?;

                if spec.matches(relative) {
                    found.push(path);
                }
            }
        }

        found.sort();

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const HARDHAT_ARTIFACT: &str = indoc! {r#"
        {
          "_format": "hh-sol-artifact-1",
          "contractName": "TokenX",
          "sourceName": "contracts/TokenX.sol",
          "abi": [
            {
              "type": "constructor",
              "inputs": [
                { "name": "supply", "type": "uint256", "internalType": "uint256" }
              ],
              "stateMutability": "nonpayable"
            }
          ],
          "bytecode": "0x6080604052",
          "deployedBytecode": "0x6080",
          "linkReferences": {},
          "deployedLinkReferences": {}
        }
    "#};

    const FOUNDRY_ARTIFACT: &str = indoc! {r#"
        {
          "abi": [],
          "bytecode": { "object": "0x6080604052", "linkReferences": {} },
          "deployedBytecode": { "object": "0x6080" }
        }
    "#};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn contract_spec_parsing() {
        let spec: ContractSpec = "TokenX".parse().unwrap();
        assert_eq!(spec, ContractSpec::name("TokenX"));

        let spec: ContractSpec = "contracts/TokenX.sol:TokenX".parse().unwrap();
        assert_eq!(
            spec,
            ContractSpec::path_name("contracts/TokenX.sol", "TokenX")
        );
        assert_eq!(spec.to_string(), "contracts/TokenX.sol:TokenX");

        assert!("contracts/TokenX.sol:".parse::<ContractSpec>().is_err());
        assert!("".parse::<ContractSpec>().is_err());
    }

    #[tokio::test]
    async fn finds_hardhat_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "contracts/TokenX.sol/TokenX.json", HARDHAT_ARTIFACT);
        write(dir.path(), "contracts/TokenX.sol/TokenX.dbg.json", "{}");
        write(dir.path(), "build-info/abc.json", "{}");

        let store = ArtifactStore::new(dir.path());
        let artifact = store.find(&ContractSpec::name("TokenX")).await.unwrap();

        assert_eq!(artifact.name, "TokenX");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.abi.constructor.unwrap().inputs.len(), 1);
    }

    #[tokio::test]
    async fn finds_foundry_artifact_by_qualified_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "TokenX.sol/TokenX.json", FOUNDRY_ARTIFACT);

        let store = ArtifactStore::new(dir.path());
        let spec = ContractSpec::path_name("src/TokenX.sol", "TokenX");
        let artifact = store.find(&spec).await.unwrap();

        assert_eq!(artifact.name, "TokenX");
        assert!(artifact.abi.constructor.is_none());
    }

    #[tokio::test]
    async fn missing_contract_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "contracts/TokenX.sol/TokenX.json", HARDHAT_ARTIFACT);

        let store = ArtifactStore::new(dir.path());
        let err = store.find(&ContractSpec::name("TokenY")).await.unwrap_err();

        let not_found = err.downcast_ref::<ContractNotFound>().unwrap();
        assert_eq!(not_found.spec.name, "TokenY");
    }

    #[tokio::test]
    async fn ambiguous_name_requires_qualification() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "contracts/TokenX.sol/TokenX.json", HARDHAT_ARTIFACT);
        write(
            dir.path(),
            "contracts/legacy/TokenX.sol/TokenX.json",
            HARDHAT_ARTIFACT,
        );

        let store = ArtifactStore::new(dir.path());

        let err = store.find(&ContractSpec::name("TokenX")).await.unwrap_err();
        assert!(err.to_string().contains("Multiple artifacts match"));

        let spec = ContractSpec::path_name("contracts/legacy/TokenX.sol", "TokenX");
        let artifact = store.find(&spec).await.unwrap();
        assert!(artifact.path.to_string_lossy().contains("legacy"));
    }

    #[test]
    fn rejects_undeployable_bytecode() {
        let unlinked = HARDHAT_ARTIFACT.replace(
            "0x6080604052",
            "0x6080__$1234567890abcdef1234567890abcdef12$__52",
        );
        let err = Artifact::parse(Path::new("TokenX.json"), &unlinked)
            .unwrap_err();
        assert!(err.to_string().contains("unlinked"));

        let empty = HARDHAT_ARTIFACT.replace("0x6080604052", "0x");
        let err =
            Artifact::parse(Path::new("TokenX.json"), &empty).unwrap_err();
        assert!(err.to_string().contains("no bytecode"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("missing"));

        let err = store.find(&ContractSpec::name("TokenX")).await.unwrap_err();

        assert!(err.downcast_ref::<ContractNotFound>().is_none());
    }
}
