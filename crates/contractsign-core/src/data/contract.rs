//! Contract record as held by the external record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Contract identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic blob key for the signed document
    ///
    /// The same id always yields the same key, so re-uploading after a
    /// failed attempt overwrites the earlier object.
    pub fn storage_key(&self, prefix: &str) -> String {
        let sanitized: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            format!("{}.pdf", sanitized)
        } else {
            format!("{}/{}.pdf", prefix, sanitized)
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Contract lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Generated but not yet sent
    #[default]
    Draft,
    /// Sent to the signer
    Sent,
    /// Signed by the signer
    Signed,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Sent => write!(f, "sent"),
            Self::Signed => write!(f, "signed"),
        }
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "signed" => Ok(Self::Signed),
            _ => Err(format!("Unknown contract status: {}", s)),
        }
    }
}

/// The person who signs the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    /// Display name
    pub name: String,
    /// Contact address notifications go to
    pub email: String,
}

/// Contract record
///
/// Read once when a signing session opens; the workflow writes back only
/// the status, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Unique identifier
    pub id: ContractId,
    /// Who signs
    pub signer: Signer,
    /// Generation-time fields the document was rendered from
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Current status
    #[serde(default)]
    pub status: ContractStatus,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl ContractRecord {
    /// Create a draft record
    pub fn new(id: impl Into<ContractId>, signer: Signer) -> Self {
        Self {
            id: id.into(),
            signer,
            fields: BTreeMap::new(),
            status: ContractStatus::Draft,
            created_at: Utc::now(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: &ContractPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

impl From<String> for ContractId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Partial update sent to the record store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPatch {
    /// New status, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractStatus>,
}

impl ContractPatch {
    /// Patch that marks the contract as signed
    pub fn signed() -> Self {
        Self {
            status: Some(ContractStatus::Signed),
        }
    }
}
