#![allow(dead_code)]

use std::sync::Arc;

use ballot_engine::{
    Ballot, CampaignParameters, CandidateId, Identity, ManualClock, ReceiptId, Secp256k1Verifier,
    TicketId, TicketSigner, VoteEngine, VoteError,
};

pub const OPEN: u64 = 1_000;
pub const CLOSE: u64 = 2_000;
pub const ADMIN_SECRET: [u8; 32] = [0x5A; 32];

pub type TestEngine = VoteEngine<Secp256k1Verifier, Arc<ManualClock>>;

pub struct Fixture {
    pub admin: TicketSigner,
    pub clock: Arc<ManualClock>,
    pub engine: TestEngine,
}

pub fn fixture(candidates: u32) -> Fixture {
    let admin = TicketSigner::from_bytes(&ADMIN_SECRET).expect("admin key");
    let clock = Arc::new(ManualClock::new(OPEN + 10));
    let params = CampaignParameters::new(OPEN, CLOSE, candidates, admin.identity())
        .expect("params")
        .with_receipt_uri_template("ipfs://receipts/{id}.json");
    let engine = VoteEngine::new(params, Secp256k1Verifier, Arc::clone(&clock));
    Fixture { admin, clock, engine }
}

pub fn voter(n: u16) -> Identity {
    let mut b = [0x11u8; 20];
    b[..2].copy_from_slice(&n.to_be_bytes());
    Identity(b)
}

pub fn ticket(n: u32) -> TicketId {
    let mut b = [0xEEu8; 32];
    b[..4].copy_from_slice(&n.to_be_bytes());
    TicketId(b)
}

impl Fixture {
    pub fn sign(&self, t: &TicketId) -> Vec<u8> {
        self.admin.sign_ticket(t).expect("sign").to_vec()
    }

    pub fn vote(&self, who: Identity, ranked: &[CandidateId], t: TicketId) -> Result<ReceiptId, VoteError> {
        let sig = self.sign(&t);
        self.vote_with(who, ranked, b"", t, &sig)
    }

    pub fn vote_with(
        &self,
        who: Identity,
        ranked: &[CandidateId],
        memo: &[u8],
        t: TicketId,
        sig: &[u8],
    ) -> Result<ReceiptId, VoteError> {
        self.engine.cast_vote(who, &Ballot { ranked, memo, ticket: t, signature: sig })
    }
}
