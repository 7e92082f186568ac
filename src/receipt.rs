use crate::types::{Identity, Receipt, ReceiptId};

/// Sequential receipt arena: id `n` is the `n`-th successful vote, owned by its voter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiptIssuer {
    next_id: ReceiptId,
    owners: Vec<Identity>,
}

impl ReceiptIssuer {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 0, owners: Vec::new() }
    }

    /// Rebuild from a persisted ownership table; ids are the table positions.
    #[must_use]
    pub fn from_owners(owners: Vec<Identity>) -> Self {
        Self { next_id: owners.len() as ReceiptId, owners }
    }

    /// Allocate the next id and bind it to `owner`.
    pub fn issue(&mut self, owner: Identity) -> ReceiptId {
        let id = self.next_id;
        self.next_id += 1;
        self.owners.push(owner);
        id
    }

    /// Number of receipts issued, which is also the next id to be allocated.
    #[must_use]
    pub const fn issued(&self) -> ReceiptId {
        self.next_id
    }

    #[must_use]
    pub fn owner_of(&self, id: ReceiptId) -> Option<Identity> {
        usize::try_from(id).ok().and_then(|i| self.owners.get(i).copied())
    }

    #[must_use]
    pub fn balance_of(&self, owner: &Identity) -> usize {
        self.owners.iter().filter(|o| *o == owner).count()
    }

    #[must_use]
    pub fn receipts_of(&self, owner: &Identity) -> Vec<ReceiptId> {
        self.iter().filter(|r| r.owner == *owner).map(|r| r.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Receipt> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(|(i, owner)| Receipt { id: i as ReceiptId, owner: *owner })
    }

    pub(crate) fn owners(&self) -> &[Identity] {
        &self.owners
    }
}

/// Resolve a receipt metadata URI: each `{id}` in `template` is replaced by the decimal id,
/// otherwise the id is appended. An empty template yields `None`.
#[must_use]
pub fn render_receipt_uri(template: &str, id: ReceiptId) -> Option<String> {
    if template.is_empty() {
        return None;
    }
    if template.contains("{id}") {
        Some(template.replace("{id}", &id.to_string()))
    } else {
        Some(format!("{template}{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_gapless_from_zero() {
        let mut r = ReceiptIssuer::new();
        let a = Identity([1; 20]);
        let b = Identity([2; 20]);
        assert_eq!(r.issue(a), 0);
        assert_eq!(r.issue(b), 1);
        assert_eq!(r.issue(a), 2);
        assert_eq!(r.issued(), 3);
        assert_eq!(r.owner_of(1), Some(b));
        assert_eq!(r.owner_of(3), None);
        assert_eq!(r.balance_of(&a), 2);
        assert_eq!(r.receipts_of(&a), vec![0, 2]);
    }

    #[test]
    fn uri_template_rendering() {
        assert_eq!(render_receipt_uri("", 4), None);
        assert_eq!(render_receipt_uri("ipfs://meta/", 4).as_deref(), Some("ipfs://meta/4"));
        assert_eq!(
            render_receipt_uri("https://x/{id}.json", 12).as_deref(),
            Some("https://x/12.json")
        );
    }
}
