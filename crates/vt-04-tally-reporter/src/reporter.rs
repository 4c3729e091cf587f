//! Pull reporter.

use std::cmp::Ordering;
use std::sync::Arc;

use shared_types::TallyRecord;
use vt_01_tally_store::{StoreError, TallyStore};

/// Order records by count descending, then name ascending.
pub fn rank(records: &mut [TallyRecord]) {
    records.sort_by(|a, b| match b.count.cmp(&a.count) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
}

/// Reads the full tally in ranked order.
#[derive(Clone)]
pub struct TallyReporter {
    store: Arc<dyn TallyStore>,
}

impl TallyReporter {
    pub fn new(store: Arc<dyn TallyStore>) -> Self {
        Self { store }
    }

    /// Every record, ranked. Empty when nothing has been voted for.
    pub async fn snapshot(&self) -> Result<Vec<TallyRecord>, StoreError> {
        let mut records = self.store.all().await?;
        rank(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::TallyName;
    use vt_01_tally_store::{InMemoryTallyStore, TallyService};

    fn record(name: &str, count: u64) -> TallyRecord {
        TallyRecord {
            name: TallyName::parse(name).unwrap(),
            count,
        }
    }

    #[test]
    fn test_rank_by_count_then_name() {
        let mut records = vec![record("b", 1), record("c", 3), record("a", 1)];
        rank(&mut records);
        assert_eq!(records, vec![record("c", 3), record("a", 1), record("b", 1)]);
    }

    #[tokio::test]
    async fn test_snapshot_after_votes() {
        let store = Arc::new(InMemoryTallyStore::new());
        let service = TallyService::new(store.clone());
        for raw in ["b", "a", "a"] {
            service.record_vote(raw).await.unwrap();
        }

        let reporter = TallyReporter::new(store);
        assert_eq!(
            reporter.snapshot().await.unwrap(),
            vec![record("a", 2), record("b", 1)]
        );
    }

    #[tokio::test]
    async fn test_empty_tally() {
        let reporter = TallyReporter::new(Arc::new(InMemoryTallyStore::new()));
        assert!(reporter.snapshot().await.unwrap().is_empty());
    }
}
