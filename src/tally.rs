use crate::errors::OutOfRange;
use crate::types::CandidateId;

/// Per-candidate counters, sized once at campaign creation. Counters never decrease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyStore {
    counters: Vec<u64>,
}

impl TallyStore {
    #[must_use]
    pub fn new(candidate_count: u32) -> Self {
        Self { counters: vec![0; candidate_count as usize] }
    }

    /// Rebuild from persisted counters.
    #[must_use]
    pub const fn from_counters(counters: Vec<u64>) -> Self {
        Self { counters }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn candidate_count(&self) -> u32 {
        // Constructed from a u32 count.
        self.counters.len() as u32
    }

    /// Map a candidate id to its counter slot.
    pub fn check(&self, candidate: CandidateId) -> Result<usize, OutOfRange> {
        usize::try_from(candidate)
            .ok()
            .filter(|&i| i < self.counters.len())
            .ok_or(OutOfRange { candidate, count: self.candidate_count() })
    }

    pub fn increment(&mut self, candidate: CandidateId) -> Result<(), OutOfRange> {
        let i = self.check(candidate)?;
        self.counters[i] = self.counters[i].saturating_add(1);
        Ok(())
    }

    /// Increment every id in `candidates`, or none of them if any is out of range.
    pub fn increment_all(&mut self, candidates: &[CandidateId]) -> Result<(), OutOfRange> {
        for &c in candidates {
            self.check(c)?;
        }
        for &c in candidates {
            self.increment(c)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<u64> {
        self.counters.clone()
    }

    #[must_use]
    pub fn get(&self, candidate: CandidateId) -> Option<u64> {
        self.check(candidate).ok().map(|i| self.counters[i])
    }

    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counters.iter().fold(0u64, |acc, c| acc.saturating_add(*c))
    }
}
