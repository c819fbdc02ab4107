//! Contract deployment setup.
//!
//! The contract itself is compiled and deployed by an external migration
//! tool, run once per test session. The harness only invokes the tool,
//! treats a nonzero exit as fatal, and consumes the artifacts it writes:
//! a JSON file with the deployed address and the contract artifact whose
//! ABI must expose the two methods the harness calls.

use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::Deserialize;
use tokio::process::Command;
use tracing::info;

use crate::error::{HarnessError, HarnessResult};

/// Function names the deployed ABI must expose.
const REQUIRED_FUNCTIONS: [&str; 2] = ["joinGame", "getFirstPendingGame"];

// ============================================================================
// MigrationCommand
// ============================================================================

/// External migration invocation: redeploys the contract to a named
/// network, resetting prior deployment state and skipping the dry run.
#[derive(Debug, Clone)]
pub struct MigrationCommand {
    program: String,
    network: String,
    workdir: Option<PathBuf>,
}

impl MigrationCommand {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            program: "truffle".to_string(),
            network: network.into(),
            workdir: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Run the migration to completion, capturing output.
    ///
    /// Nonzero exit aborts the session with [`HarnessError::Setup`],
    /// carrying the tool's stderr.
    pub async fn run(&self) -> HarnessResult<()> {
        let mut command = Command::new(&self.program);
        command.args([
            "migrate",
            "--network",
            &self.network,
            "--reset",
            "--skip-dry-run",
        ]);
        if let Some(workdir) = &self.workdir {
            command.current_dir(workdir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| HarnessError::Setup(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Setup(format!(
                "{} migrate exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        info!(network = %self.network, "contract migration completed");
        Ok(())
    }
}

// ============================================================================
// DeploymentArtifacts
// ============================================================================

#[derive(Debug, Deserialize)]
struct InfoFile {
    address: Address,
}

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContractArtifact {
    abi: Vec<AbiEntry>,
}

/// Deployment outputs the harness consumes.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentArtifacts {
    /// Address the contract was deployed to
    pub address: Address,
}

impl DeploymentArtifacts {
    /// Load and validate artifacts written by the migration tool.
    ///
    /// `info_path` holds `{"address": "0x.."}`; `artifact_path` is the
    /// contract artifact whose `abi` array must contain both functions the
    /// harness calls. Anything missing or unparsable is a setup failure.
    pub fn load(info_path: &Path, artifact_path: &Path) -> HarnessResult<Self> {
        let info: InfoFile = read_json(info_path)?;
        let artifact: ContractArtifact = read_json(artifact_path)?;

        for required in REQUIRED_FUNCTIONS {
            let present = artifact.abi.iter().any(|entry| {
                entry.kind.as_deref() == Some("function") && entry.name.as_deref() == Some(required)
            });
            if !present {
                return Err(HarnessError::Setup(format!(
                    "ABI in {} has no function `{required}`",
                    artifact_path.display()
                )));
            }
        }

        Ok(Self {
            address: info.address,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> HarnessResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| HarnessError::Setup(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| HarnessError::Setup(format!("cannot parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const GOOD_ABI: &str = r#"{
        "abi": [
            {"type": "constructor", "inputs": []},
            {"type": "function", "name": "joinGame", "inputs": []},
            {"type": "function", "name": "getFirstPendingGame", "inputs": []},
            {"type": "event", "name": "GameCreated"}
        ]
    }"#;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let info = write_file(
            dir.path(),
            "info.json",
            r#"{"address": "0x53E450514589267b6B83E279Cd67c2C22987ba8B"}"#,
        );
        let artifact = write_file(dir.path(), "Matchmaker.json", GOOD_ABI);

        let artifacts = DeploymentArtifacts::load(&info, &artifact).unwrap();
        assert_eq!(
            artifacts.address.to_string().to_lowercase(),
            "0x53e450514589267b6b83e279cd67c2c22987ba8b"
        );
    }

    #[test]
    fn test_load_rejects_missing_function() {
        let dir = tempfile::tempdir().unwrap();
        let info = write_file(
            dir.path(),
            "info.json",
            r#"{"address": "0x53E450514589267b6B83E279Cd67c2C22987ba8B"}"#,
        );
        let artifact = write_file(
            dir.path(),
            "Matchmaker.json",
            r#"{"abi": [{"type": "function", "name": "joinGame"}]}"#,
        );

        let err = DeploymentArtifacts::load(&info, &artifact).unwrap_err();
        assert!(matches!(err, HarnessError::Setup(_)));
        assert!(err.to_string().contains("getFirstPendingGame"));
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_file(dir.path(), "Matchmaker.json", GOOD_ABI);

        let err =
            DeploymentArtifacts::load(&dir.path().join("nope.json"), &artifact).unwrap_err();
        assert!(matches!(err, HarnessError::Setup(_)));
    }

    #[tokio::test]
    async fn test_migration_success() {
        // `true` ignores the migrate arguments and exits 0.
        MigrationCommand::new("testnet")
            .with_program("true")
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_migration_nonzero_exit_is_fatal() {
        let err = MigrationCommand::new("testnet")
            .with_program("false")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Setup(_)));
    }

    #[tokio::test]
    async fn test_migration_missing_program_is_fatal() {
        let err = MigrationCommand::new("testnet")
            .with_program("definitely-not-a-real-binary")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Setup(_)));
    }
}
