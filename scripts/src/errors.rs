//! Definitions of errors that can occur during the execution of the governance deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the governance deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error initializing the RPC client or signer
    ClientInitialization(String),
    /// Error reading a file from disk
    ReadFile(String),
    /// Error writing a file to disk
    WriteFile(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was mined but reverted
    TransactionReverted(String),
    /// Error verifying a contract's source on a block explorer
    ContractVerification(String),
    /// The deployed contracts are not in the expected state
    DeploymentCheck(String),
}

impl ScriptError {
    /// The category of the error, used when reporting a failed step
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptError::ClientInitialization(_) => "ClientInitialization",
            ScriptError::ReadFile(_) => "ReadFile",
            ScriptError::WriteFile(_) => "WriteFile",
            ScriptError::ArtifactParsing(_) => "ArtifactParsing",
            ScriptError::CalldataConstruction(_) => "CalldataConstruction",
            ScriptError::ContractDeployment(_) => "ContractDeployment",
            ScriptError::ContractInteraction(_) => "ContractInteraction",
            ScriptError::TransactionReverted(_) => "TransactionReverted",
            ScriptError::ContractVerification(_) => "ContractVerification",
            ScriptError::DeploymentCheck(_) => "DeploymentCheck",
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::ContractVerification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::DeploymentCheck(s) => write!(f, "deployment check failed: {}", s),
        }
    }
}

impl Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::ScriptError;

    #[test]
    fn test_display_includes_message() {
        let err = ScriptError::ContractDeployment("insufficient funds".to_string());
        assert_eq!(
            err.to_string(),
            "error deploying contract: insufficient funds"
        );
        assert_eq!(err.kind(), "ContractDeployment");
    }

    #[test]
    fn test_reverted_kind() {
        let err = ScriptError::TransactionReverted("0xabc".to_string());
        assert_eq!(err.kind(), "TransactionReverted");
        assert!(err.to_string().starts_with("transaction reverted"));
    }
}
