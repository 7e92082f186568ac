use ballot_primitives::ct_eq_address;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{AdminError, ConfigError, VoteError};
use crate::types::{Identity, Timestamp};

/// Campaign parameters. Everything except the candidate count is adjustable,
/// but only by the current administrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParameters {
    start: Timestamp,
    end: Timestamp,
    candidate_count: u32,
    administrator: Identity,
    #[serde(default)]
    campaign_metadata_uri: String,
    #[serde(default)]
    receipt_uri_template: String,
}

impl CampaignParameters {
    /// # Errors
    /// `ConfigError::NoCandidates` if `candidate_count` is zero.
    pub fn new(
        start: Timestamp,
        end: Timestamp,
        candidate_count: u32,
        administrator: Identity,
    ) -> Result<Self, ConfigError> {
        if candidate_count == 0 {
            return Err(ConfigError::NoCandidates);
        }
        Ok(Self {
            start,
            end,
            candidate_count,
            administrator,
            campaign_metadata_uri: String::new(),
            receipt_uri_template: String::new(),
        })
    }

    #[must_use]
    pub fn with_campaign_metadata_uri(mut self, uri: impl Into<String>) -> Self {
        self.campaign_metadata_uri = uri.into();
        self
    }

    #[must_use]
    pub fn with_receipt_uri_template(mut self, template: impl Into<String>) -> Self {
        self.receipt_uri_template = template.into();
        self
    }

    #[must_use]
    pub const fn start_date(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub const fn end_date(&self) -> Timestamp {
        self.end
    }

    #[must_use]
    pub const fn candidate_count(&self) -> u32 {
        self.candidate_count
    }

    #[must_use]
    pub const fn administrator(&self) -> Identity {
        self.administrator
    }

    #[must_use]
    pub fn campaign_metadata_uri(&self) -> &str {
        &self.campaign_metadata_uri
    }

    #[must_use]
    pub fn receipt_uri_template(&self) -> &str {
        &self.receipt_uri_template
    }

    #[must_use]
    pub fn is_administrator(&self, who: &Identity) -> bool {
        ct_eq_address(self.administrator.as_bytes(), who.as_bytes())
    }

    /// `now` must lie in `[start, end]`, both ends inclusive.
    pub fn check_window(&self, now: Timestamp) -> Result<(), VoteError> {
        if now < self.start {
            return Err(VoteError::NotOpen { now, start: self.start });
        }
        if now > self.end {
            return Err(VoteError::Closed { now, end: self.end });
        }
        Ok(())
    }

    fn ensure_admin(&self, caller: &Identity, op: &'static str) -> Result<(), AdminError> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            warn!(%caller, op, "administrative write rejected");
            Err(AdminError::NotAdministrator(*caller))
        }
    }

    pub fn set_start_date(&mut self, caller: &Identity, start: Timestamp) -> Result<(), AdminError> {
        self.ensure_admin(caller, "set_start_date")?;
        info!(old = self.start, new = start, "start date updated");
        self.start = start;
        Ok(())
    }

    pub fn set_end_date(&mut self, caller: &Identity, end: Timestamp) -> Result<(), AdminError> {
        self.ensure_admin(caller, "set_end_date")?;
        info!(old = self.end, new = end, "end date updated");
        self.end = end;
        Ok(())
    }

    pub fn set_campaign_metadata_uri(&mut self, caller: &Identity, uri: String) -> Result<(), AdminError> {
        self.ensure_admin(caller, "set_campaign_metadata_uri")?;
        self.campaign_metadata_uri = uri;
        Ok(())
    }

    pub fn set_receipt_uri_template(&mut self, caller: &Identity, template: String) -> Result<(), AdminError> {
        self.ensure_admin(caller, "set_receipt_uri_template")?;
        self.receipt_uri_template = template;
        Ok(())
    }

    /// Hand administration (and with it ticket signing authority) to `new_admin`.
    pub fn transfer_administrator(&mut self, caller: &Identity, new_admin: Identity) -> Result<(), AdminError> {
        self.ensure_admin(caller, "transfer_administrator")?;
        info!(from = %self.administrator, to = %new_admin, "administrator transferred");
        self.administrator = new_admin;
        Ok(())
    }
}
