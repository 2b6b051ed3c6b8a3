//! Loading of compiled contract artifacts

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_primitives::Bytes;
use serde_json::Value;

use crate::{
    constants::{ARTIFACT_EXTENSION, BYTECODE_KEY, BYTECODE_OBJECT_KEY, SOLIDITY_EXTENSION},
    errors::ScriptError,
};

/// Resolves the path of a contract's artifact within the artifacts directory.
///
/// Prefers the forge layout (`<dir>/<Name>.sol/<Name>.json`), falling back
/// to a flat layout (`<dir>/<Name>.json`).
pub fn artifact_path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
    let artifact_file = format!("{contract_name}.{ARTIFACT_EXTENSION}");
    let forge_path = artifacts_dir
        .join(format!("{contract_name}.{SOLIDITY_EXTENSION}"))
        .join(&artifact_file);

    if forge_path.exists() {
        forge_path
    } else {
        artifacts_dir.join(artifact_file)
    }
}

/// Reads the creation bytecode of the given contract from the artifacts directory
pub fn load_bytecode(artifacts_dir: &Path, contract_name: &str) -> Result<Bytes, ScriptError> {
    let path = artifact_path(artifacts_dir, contract_name);
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;

    parse_bytecode(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{contract_name}: {e}")))
}

/// Extracts creation bytecode from the JSON contents of an artifact
pub fn parse_bytecode(contents: &str) -> Result<Bytes, ScriptError> {
    let artifact: Value =
        serde_json::from_str(contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode_hex = match &artifact[BYTECODE_KEY] {
        Value::String(hex) => hex.as_str(),
        Value::Object(obj) => obj
            .get(BYTECODE_OBJECT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ScriptError::ArtifactParsing("bytecode has no object".to_string()))?,
        _ => {
            return Err(ScriptError::ArtifactParsing(
                "artifact has no bytecode".to_string(),
            ))
        }
    };

    let bytecode =
        Bytes::from_str(bytecode_hex).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(
            "artifact bytecode is empty, is the contract abstract?".to_string(),
        ));
    }

    Ok(bytecode)
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::{artifact_path, load_bytecode, parse_bytecode};

    #[test]
    fn test_forge_artifact() {
        let bytecode =
            parse_bytecode(r#"{ "abi": [], "bytecode": { "object": "0x6080604052" } }"#).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_flat_artifact() {
        let bytecode = parse_bytecode(r#"{ "bytecode": "6080" }"#).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_missing_bytecode() {
        assert!(parse_bytecode(r#"{ "abi": [] }"#).is_err());
        assert!(parse_bytecode(r#"{ "bytecode": { "linkReferences": {} } }"#).is_err());
        assert!(parse_bytecode(r#"{ "bytecode": "0x" }"#).is_err());
    }

    #[test]
    fn test_load_prefers_forge_layout() {
        let dir = env::temp_dir().join(format!("governance-artifacts-{}", std::process::id()));
        let forge_dir = dir.join("Box.sol");
        fs::create_dir_all(&forge_dir).unwrap();
        fs::write(dir.join("Box.json"), r#"{ "bytecode": "0x01" }"#).unwrap();
        fs::write(
            forge_dir.join("Box.json"),
            r#"{ "bytecode": { "object": "0x02" } }"#,
        )
        .unwrap();

        assert_eq!(artifact_path(&dir, "Box"), forge_dir.join("Box.json"));
        assert_eq!(load_bytecode(&dir, "Box").unwrap().as_ref(), &[0x02]);
        assert!(load_bytecode(&dir, "TimeLock").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
