use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::params::CampaignParameters;
use crate::types::{Identity, Timestamp};

/// Campaign definition as written by operators (JSON).
///
/// ```json
/// {
///   "start": 1700000000,
///   "end": 1700086400,
///   "candidate_count": 5,
///   "administrator": "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
///   "receipt_uri_template": "ipfs://receipts/{id}.json"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub start: Timestamp,
    pub end: Timestamp,
    pub candidate_count: u32,
    pub administrator: String,
    #[serde(default)]
    pub campaign_metadata_uri: String,
    #[serde(default)]
    pub receipt_uri_template: String,
}

impl CampaignConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidate_count == 0 {
            return Err(ConfigError::NoCandidates);
        }
        if self.start > self.end {
            return Err(ConfigError::InvalidWindow { start: self.start, end: self.end });
        }
        self.administrator_identity()?;
        Ok(())
    }

    pub fn administrator_identity(&self) -> Result<Identity, ConfigError> {
        self.administrator.parse().map_err(ConfigError::BadAdministrator)
    }

    pub fn to_parameters(&self) -> Result<CampaignParameters, ConfigError> {
        self.validate()?;
        Ok(CampaignParameters::new(
            self.start,
            self.end,
            self.candidate_count,
            self.administrator_identity()?,
        )?
        .with_campaign_metadata_uri(self.campaign_metadata_uri.clone())
        .with_receipt_uri_template(self.receipt_uri_template.clone()))
    }
}
