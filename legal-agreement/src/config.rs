//! Configuration for the legal agreement contract.

use serde::{Deserialize, Serialize};

/// What a scan does when a value selects the sought kind but fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Report the record to the event sink and continue the scan
    #[default]
    Skip,
    /// Fail the whole scan
    Abort,
}

/// Contract configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Contract name used in log fields
    #[serde(default = "default_contract_name")]
    pub contract_name: String,
    /// Scan policy for malformed records
    #[serde(default)]
    pub malformed_records: MalformedPolicy,
    /// Maximum entries kept by the host audit trail
    #[serde(default = "default_audit_max_entries")]
    pub audit_max_entries: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            contract_name: default_contract_name(),
            malformed_records: MalformedPolicy::default(),
            audit_max_entries: default_audit_max_entries(),
        }
    }
}

fn default_contract_name() -> String {
    "legalagreement".to_string()
}

fn default_audit_max_entries() -> usize {
    10_000
}

impl ContractConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
