use crate::hand::HandRecord;

/// The hand-history collection as last returned by the server. Every
/// refresh is authoritative and total: the collection is replaced
/// wholesale, never merged. Survives table resets and accumulates
/// across hands.
#[derive(Clone, Debug, Default)]
pub struct ArchiveStore {
    records: Vec<HandRecord>,
}

impl ArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<HandRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[HandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
