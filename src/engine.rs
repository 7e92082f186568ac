//! Vote redemption engine.
//!
//! `cast_vote` runs in three phases:
//!
//! 1. checks: window, voter, ballot shape, ticket, signer, candidate range;
//!    all read-only and evaluated in that order, so the first failure wins;
//! 2. commit: tally, receipt, both registries and the public log, applied
//!    together under the campaign lock;
//! 3. interaction: `VoteSink` notification after the lock is released.
//!
//! The lock spans checks and commit, so two submissions sharing a ticket or a
//! voter can never both pass the "not yet present" checks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use ballot_primitives::Hash256;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::CampaignConfig;
use crate::errors::{AdminError, ConfigError, VerificationError, VoteError};
use crate::events::{EventLog, VoteCast, VoteSink};
use crate::params::CampaignParameters;
use crate::receipt::{render_receipt_uri, ReceiptIssuer};
use crate::registry::{TicketRegistry, VoterRegistry};
use crate::tally::TallyStore;
use crate::types::{Ballot, CandidateId, Identity, ReceiptId, TicketId, Timestamp, MAX_MEMO_LEN, MAX_RANKED};
use crate::verifier::{ticket_digest, SignatureVerifier};

/// Everything one campaign owns. Mutated only through `&mut` by the commit step
/// and the administrative setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignState {
    pub(crate) params: CampaignParameters,
    pub(crate) tally: TallyStore,
    pub(crate) voters: VoterRegistry,
    pub(crate) tickets: TicketRegistry,
    pub(crate) receipts: ReceiptIssuer,
    pub(crate) log: EventLog,
}

/// Ballot shape rule: `1..=MAX_RANKED` ids, strictly ascending, memo within bounds.
pub fn check_ballot_shape(ranked: &[CandidateId], memo: &[u8]) -> Result<(), VoteError> {
    if ranked.is_empty() || ranked.len() > MAX_RANKED {
        return Err(VoteError::InvalidBallotSize { got: ranked.len(), max: MAX_RANKED });
    }
    if !ranked.windows(2).all(|w| w[0] < w[1]) {
        return Err(VoteError::InvalidOrdering);
    }
    if memo.len() > MAX_MEMO_LEN {
        return Err(VoteError::MemoTooLong { got: memo.len(), max: MAX_MEMO_LEN });
    }
    Ok(())
}

impl CampaignState {
    #[must_use]
    pub fn new(params: CampaignParameters) -> Self {
        let tally = TallyStore::new(params.candidate_count());
        Self {
            params,
            tally,
            voters: VoterRegistry::new(),
            tickets: TicketRegistry::new(),
            receipts: ReceiptIssuer::new(),
            log: EventLog::new(),
        }
    }

    #[must_use]
    pub const fn params(&self) -> &CampaignParameters {
        &self.params
    }

    #[must_use]
    pub const fn tally(&self) -> &TallyStore {
        &self.tally
    }

    #[must_use]
    pub const fn receipts(&self) -> &ReceiptIssuer {
        &self.receipts
    }

    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub fn has_voted(&self, who: &Identity) -> bool {
        self.voters.contains(who)
    }

    #[must_use]
    pub fn is_ticket_redeemed(&self, ticket: &TicketId) -> bool {
        self.tickets.contains(ticket)
    }

    /// Read-only validation. `signer` is the identity recovered from the ballot signature,
    /// computed by the caller so the expensive recovery can happen outside the lock;
    /// its failure is only reported once every earlier check has passed.
    pub fn check(
        &self,
        now: Timestamp,
        voter: &Identity,
        ballot: &Ballot<'_>,
        signer: Result<Identity, VerificationError>,
    ) -> Result<(), VoteError> {
        self.params.check_window(now)?;
        if self.voters.contains(voter) {
            return Err(VoteError::AlreadyVoted(*voter));
        }
        check_ballot_shape(ballot.ranked, ballot.memo)?;
        if self.tickets.contains(&ballot.ticket) {
            return Err(VoteError::TicketReused);
        }
        if !self.params.is_administrator(&signer?) {
            return Err(VoteError::Unauthorized);
        }
        for &c in ballot.ranked {
            self.tally.check(c)?;
        }
        Ok(())
    }

    /// Apply a ballot that passed `check`. The tally step is the only fallible one and
    /// runs first, so an error here leaves the state untouched.
    pub fn commit(&mut self, voter: Identity, ballot: &Ballot<'_>) -> Result<VoteCast, VoteError> {
        self.tally.increment_all(ballot.ranked)?;
        let receipt_id = self.receipts.issue(voter);
        let voter_new = self.voters.insert_if_absent(voter);
        let ticket_new = self.tickets.insert_if_absent(ballot.ticket);
        debug_assert!(voter_new && ticket_new, "commit without check");
        let event = VoteCast {
            ranked: ballot.ranked.to_vec(),
            ticket: ballot.ticket,
            voter,
            receipt_id,
        };
        self.log.append(event.clone());
        Ok(event)
    }
}

/// Thread-safe front end over one campaign.
pub struct VoteEngine<V: SignatureVerifier, C: Clock> {
    state: Mutex<CampaignState>,
    verifier: V,
    clock: C,
    sinks: RwLock<Vec<Arc<dyn VoteSink>>>,
}

impl<V: SignatureVerifier, C: Clock> VoteEngine<V, C> {
    pub fn new(params: CampaignParameters, verifier: V, clock: C) -> Self {
        info!(
            start = params.start_date(),
            end = params.end_date(),
            candidates = params.candidate_count(),
            administrator = %params.administrator(),
            "campaign created"
        );
        Self::from_state(CampaignState::new(params), verifier, clock)
    }

    /// # Errors
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn from_config(config: &CampaignConfig, verifier: V, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::new(config.to_parameters()?, verifier, clock))
    }

    pub(crate) fn from_state(state: CampaignState, verifier: V, clock: C) -> Self {
        Self {
            state: Mutex::new(state),
            verifier,
            clock,
            sinks: RwLock::new(Vec::new()),
        }
    }

    // State is only written after every check passes, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, CampaignState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, sink: Arc<dyn VoteSink>) {
        self.sinks.write().unwrap_or_else(PoisonError::into_inner).push(sink);
    }

    /// Redeem `ballot.ticket` on behalf of `voter` and return the receipt id.
    ///
    /// # Errors
    /// Any `VoteError`; on error nothing has changed.
    pub fn cast_vote(&self, voter: Identity, ballot: &Ballot<'_>) -> Result<ReceiptId, VoteError> {
        let now = self.clock.now();
        let signer = self
            .verifier
            .recover_identity(&ticket_digest(&ballot.ticket), ballot.signature);

        let event = {
            let mut state = self.lock();
            if let Err(err) = state.check(now, &voter, ballot, signer) {
                debug!(%voter, ticket = %ballot.ticket, %err, "ballot rejected");
                return Err(err);
            }
            state.commit(voter, ballot)?
        };

        debug!(
            %voter,
            ticket = %event.ticket,
            receipt_id = event.receipt_id,
            ranked = ?event.ranked,
            "vote cast"
        );
        self.notify(&event);
        Ok(event.receipt_id)
    }

    fn notify(&self, event: &VoteCast) {
        let sinks: Vec<Arc<dyn VoteSink>> = self
            .sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for sink in sinks {
            sink.on_vote_cast(event);
        }
    }

    // Queries

    #[must_use]
    pub fn tally(&self) -> Vec<u64> {
        self.lock().tally.snapshot()
    }

    #[must_use]
    pub fn has_voted(&self, who: &Identity) -> bool {
        self.lock().has_voted(who)
    }

    #[must_use]
    pub fn is_ticket_redeemed(&self, ticket: &TicketId) -> bool {
        self.lock().is_ticket_redeemed(ticket)
    }

    #[must_use]
    pub fn start_date(&self) -> Timestamp {
        self.lock().params.start_date()
    }

    #[must_use]
    pub fn end_date(&self) -> Timestamp {
        self.lock().params.end_date()
    }

    #[must_use]
    pub fn candidate_count(&self) -> u32 {
        self.lock().params.candidate_count()
    }

    #[must_use]
    pub fn administrator(&self) -> Identity {
        self.lock().params.administrator()
    }

    #[must_use]
    pub fn is_administrator(&self, who: &Identity) -> bool {
        self.lock().params.is_administrator(who)
    }

    #[must_use]
    pub fn campaign_metadata_uri(&self) -> String {
        self.lock().params.campaign_metadata_uri().to_owned()
    }

    #[must_use]
    pub fn receipt_uri_template(&self) -> String {
        self.lock().params.receipt_uri_template().to_owned()
    }

    #[must_use]
    pub fn params(&self) -> CampaignParameters {
        self.lock().params.clone()
    }

    #[must_use]
    pub fn receipt_owner(&self, id: ReceiptId) -> Option<Identity> {
        self.lock().receipts.owner_of(id)
    }

    #[must_use]
    pub fn receipts_of(&self, owner: &Identity) -> Vec<ReceiptId> {
        self.lock().receipts.receipts_of(owner)
    }

    #[must_use]
    pub fn receipts_issued(&self) -> ReceiptId {
        self.lock().receipts.issued()
    }

    /// Metadata URI of an issued receipt.
    #[must_use]
    pub fn receipt_uri(&self, id: ReceiptId) -> Option<String> {
        let state = self.lock();
        state.receipts.owner_of(id)?;
        render_receipt_uri(state.params.receipt_uri_template(), id)
    }

    #[must_use]
    pub fn events(&self) -> Vec<VoteCast> {
        self.lock().log.entries().to_vec()
    }

    #[must_use]
    pub fn audit_root(&self) -> Hash256 {
        self.lock().log.audit_root()
    }

    /// Run `f` against a consistent view of the whole campaign.
    pub fn with_state<R>(&self, f: impl FnOnce(&CampaignState) -> R) -> R {
        f(&self.lock())
    }

    // Administration

    pub fn set_start_date(&self, caller: &Identity, start: Timestamp) -> Result<(), AdminError> {
        self.lock().params.set_start_date(caller, start)
    }

    pub fn set_end_date(&self, caller: &Identity, end: Timestamp) -> Result<(), AdminError> {
        self.lock().params.set_end_date(caller, end)
    }

    pub fn set_campaign_metadata_uri(&self, caller: &Identity, uri: impl Into<String>) -> Result<(), AdminError> {
        self.lock().params.set_campaign_metadata_uri(caller, uri.into())
    }

    pub fn set_receipt_uri_template(&self, caller: &Identity, template: impl Into<String>) -> Result<(), AdminError> {
        self.lock().params.set_receipt_uri_template(caller, template.into())
    }

    pub fn transfer_administrator(&self, caller: &Identity, new_admin: Identity) -> Result<(), AdminError> {
        self.lock().params.transfer_administrator(caller, new_admin)
    }
}
