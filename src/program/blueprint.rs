//! CIP-57 blueprint (`plutus.json`) loading.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::program::error::{SdkError, SdkResult};
use crate::program::script::PlutusVersion;
use crate::program::validator::ScriptTemplate;

/// Blueprint preamble.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preamble {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub plutus_version: PlutusVersion,
    #[serde(default)]
    pub compiler: Option<Compiler>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Compiler that produced the blueprint.
#[derive(Debug, Clone, Deserialize)]
pub struct Compiler {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A validator parameter declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct BlueprintParameter {
    #[serde(default)]
    pub title: Option<String>,
    pub schema: Value,
}

/// A validator entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintValidator {
    pub title: String,
    #[serde(default)]
    pub datum: Option<Value>,
    #[serde(default)]
    pub redeemer: Option<Value>,
    #[serde(default)]
    pub parameters: Vec<BlueprintParameter>,
    pub compiled_code: String,
    pub hash: String,
}

/// A parsed `plutus.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Blueprint {
    pub preamble: Preamble,
    pub validators: Vec<BlueprintValidator>,
    #[serde(default)]
    pub definitions: Option<Value>,
}

impl Blueprint {
    pub fn from_json(json: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let blueprint = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded blueprint {} ({} validators) from {}",
            blueprint.preamble.title,
            blueprint.validators.len(),
            path.display()
        );
        Ok(blueprint)
    }

    /// Look up a validator entry by title.
    pub fn validator(&self, title: &str) -> SdkResult<&BlueprintValidator> {
        self.validators
            .iter()
            .find(|v| v.title == title)
            .ok_or_else(|| SdkError::ValidatorNotFound(title.to_string()))
    }

    /// Build a template for `title`, checking the declared hash against the
    /// compiled code.
    pub fn template(&self, title: &str) -> SdkResult<ScriptTemplate> {
        let entry = self.validator(title)?;
        let template =
            ScriptTemplate::from_compiled_code(self.preamble.plutus_version, &entry.compiled_code)?
                .with_title(entry.title.clone())
                .with_arity(entry.parameters.len());

        let actual = template.script().hash_hex();
        if !actual.eq_ignore_ascii_case(&entry.hash) {
            return Err(SdkError::HashMismatch {
                expected: entry.hash.clone(),
                actual,
            });
        }

        Ok(template)
    }

    /// Titles of all validators, in file order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(|v| v.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY_HASH: &str = "d28966b3926bf3b014e66e5440b3789b86b375499b1951d791cf783b";

    fn blueprint_json(hash: &str) -> String {
        format!(
            r##"{{
                "preamble": {{
                    "title": "medrec/contracts",
                    "version": "0.0.0",
                    "plutusVersion": "v2",
                    "compiler": {{ "name": "Aiken", "version": "v1.0.24" }},
                    "license": "Apache-2.0"
                }},
                "validators": [
                    {{
                        "title": "medrec.mint",
                        "redeemer": {{ "title": "r", "schema": {{ "$ref": "#/definitions/Data" }} }},
                        "parameters": [
                            {{ "title": "utxo_ref", "schema": {{ "$ref": "#/definitions/OutputReference" }} }}
                        ],
                        "compiledCode": "46010000200101",
                        "hash": "{hash}"
                    }}
                ],
                "definitions": {{}}
            }}"##
        )
    }

    #[test]
    fn test_parse_blueprint() {
        let blueprint = Blueprint::from_json(&blueprint_json(IDENTITY_HASH)).unwrap();
        assert_eq!(blueprint.preamble.plutus_version, PlutusVersion::V2);
        assert_eq!(blueprint.titles().collect::<Vec<_>>(), vec!["medrec.mint"]);
        assert_eq!(blueprint.validator("medrec.mint").unwrap().parameters.len(), 1);
    }

    #[test]
    fn test_template_carries_arity_and_title() {
        let blueprint = Blueprint::from_json(&blueprint_json(IDENTITY_HASH)).unwrap();
        let template = blueprint.template("medrec.mint").unwrap();
        assert_eq!(template.title(), Some("medrec.mint"));
        assert_eq!(template.arity(), Some(1));
        assert_eq!(template.script().hash_hex(), IDENTITY_HASH);
    }

    #[test]
    fn test_hash_mismatch_rejected() {
        let blueprint = Blueprint::from_json(&blueprint_json(&"00".repeat(28))).unwrap();
        assert!(matches!(
            blueprint.template("medrec.mint"),
            Err(SdkError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_validator() {
        let blueprint = Blueprint::from_json(&blueprint_json(IDENTITY_HASH)).unwrap();
        assert!(matches!(
            blueprint.template("medrec.spend"),
            Err(SdkError::ValidatorNotFound(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("medrec-blueprint-{}.json", std::process::id()));
        fs::write(&path, blueprint_json(IDENTITY_HASH)).unwrap();
        let blueprint = Blueprint::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(blueprint.preamble.title, "medrec/contracts");
    }
}
