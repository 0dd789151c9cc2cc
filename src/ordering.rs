//! Ordered collection synchronization.
//!
//! Lists that support row reordering (categories, search engines)
//! mirror a server-held collection ordered by a persisted `sort_order`
//! field. This module keeps the local sequence and the server in
//! agreement: a load sorts by `sort_order`, a move is applied to the
//! local sequence first and then persisted by rewriting every record's
//! array index, and any failed write discards the local order and
//! re-reads the authoritative one from the server.

use crate::api::ApiError;
use async_trait::async_trait;
use futures::future::join_all;
use log::*;

/// Record with a stable identifier and a persisted position.
///
pub trait Orderable {
    fn id(&self) -> u64;
    fn sort_order(&self) -> i64;
}

/// Persistence backend for one reorderable collection.
///
#[async_trait]
pub trait OrderStore: Send + Sync {
    type Record: Orderable + Clone + Send + Sync;

    /// Fetch all records in server order.
    async fn fetch(&self) -> Result<Vec<Self::Record>, ApiError>;

    /// Persist a new position for one record.
    async fn persist_order(&self, id: u64, sort_order: i64) -> Result<(), ApiError>;
}

/// Errors specific to reorder gestures.
///
#[derive(Debug, thiserror::Error)]
pub enum OrderingError {
    /// A gesture index fell outside the current sequence
    #[error("reorder index {index} out of bounds for {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The underlying API call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a reorder gesture that reached the synchronizer.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New order applied locally and confirmed by the server
    Applied,
    /// Gesture did not change the order; nothing was persisted
    Noop,
    /// Gesture was computed against a sequence that has since been
    /// replaced; ignored without touching the network
    Stale,
}

/// Maintains a client-side ordered sequence mirroring a server-held
/// collection.
///
/// Immediately after `load()` the sequence is sorted ascending by
/// `sort_order`. During a reorder the array position is the source of
/// truth and stored `sort_order` values are stale until the writes
/// land.
pub struct OrderedCollection<S: OrderStore> {
    store: S,
    items: Vec<S::Record>,
    generation: u64,
}

impl<S: OrderStore> OrderedCollection<S> {
    /// Returns an empty collection over the given store.
    ///
    pub fn new(store: S) -> Self {
        OrderedCollection {
            store,
            items: Vec::new(),
            generation: 0,
        }
    }

    /// Current display order.
    ///
    pub fn items(&self) -> &[S::Record] {
        &self.items
    }

    /// Generation of the current sequence. Every load or applied move
    /// produces a new generation; a gesture must carry the generation
    /// it was computed against.
    ///
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace local state with the authoritative server order.
    ///
    /// Records are sorted ascending by `sort_order`; records sharing a
    /// value keep their server relative order (stable sort). Duplicate
    /// indices can exist after a partially failed reorder, so ties are
    /// expected data, not an error. On failure the local sequence is
    /// left unchanged.
    pub async fn load(&mut self) -> Result<(), OrderingError> {
        let mut records = self.store.fetch().await?;
        records.sort_by_key(|record| record.sort_order());
        self.items = records;
        self.generation += 1;
        Ok(())
    }

    /// Move the item at `from` to position `to` and persist the new
    /// order.
    ///
    /// The move is a single-element shift, not a swap: intervening
    /// elements move by one position. It is applied to the local
    /// sequence before any network traffic, then every record's array
    /// index is written back as its `sort_order` (the whole
    /// collection, not just the moved range) with all writes
    /// dispatched together. If any write fails, the optimistic order
    /// is discarded and `load()` runs once to resynchronize; the
    /// recovered order may mix old and new positions since the server
    /// applies writes independently.
    pub async fn reorder(
        &mut self,
        from: usize,
        to: usize,
        generation: u64,
    ) -> Result<Outcome, OrderingError> {
        if generation != self.generation {
            debug!(
                "Ignoring reorder gesture for stale generation {} (current {})",
                generation, self.generation
            );
            return Ok(Outcome::Stale);
        }

        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(OrderingError::IndexOutOfBounds { index, len });
            }
        }
        if from == to {
            return Ok(Outcome::Noop);
        }

        let record = self.items.remove(from);
        self.items.insert(to, record);
        self.generation += 1;

        let writes = self
            .items
            .iter()
            .enumerate()
            .map(|(index, record)| self.store.persist_order(record.id(), index as i64));
        let failure = join_all(writes)
            .await
            .into_iter()
            .find_map(|result| result.err());

        if let Some(failure) = failure {
            warn!("Reorder write failed, resynchronizing from server: {}", failure);
            self.load().await?;
            return Err(failure.into());
        }

        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Row {
        id: u64,
        sort_order: i64,
    }

    impl Row {
        fn new(id: u64, sort_order: i64) -> Self {
            Row { id, sort_order }
        }
    }

    impl Orderable for Row {
        fn id(&self) -> u64 {
            self.id
        }

        fn sort_order(&self) -> i64 {
            self.sort_order
        }
    }

    /// In-memory store. `rows` holds the server state in server order;
    /// writes for ids in `fail_ids` fail and leave the row untouched.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Row>>,
        fail_ids: HashSet<u64>,
        fetch_calls: AtomicUsize,
        writes: Mutex<Vec<(u64, i64)>>,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<Row>) -> Arc<Self> {
            Arc::new(MemoryStore {
                rows: Mutex::new(rows),
                ..MemoryStore::default()
            })
        }

        fn failing(rows: Vec<Row>, fail_ids: &[u64]) -> Arc<Self> {
            Arc::new(MemoryStore {
                rows: Mutex::new(rows),
                fail_ids: fail_ids.iter().copied().collect(),
                ..MemoryStore::default()
            })
        }

        fn write_log(&self) -> Vec<(u64, i64)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderStore for Arc<MemoryStore> {
        type Record = Row;

        async fn fetch(&self) -> Result<Vec<Row>, ApiError> {
            self.fetch_calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn persist_order(&self, id: u64, sort_order: i64) -> Result<(), ApiError> {
            self.writes.lock().unwrap().push((id, sort_order));
            if self.fail_ids.contains(&id) {
                return Err(ApiError::Server {
                    status: 500,
                    message: "write rejected".to_string(),
                });
            }
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
                row.sort_order = sort_order;
            }
            Ok(())
        }
    }

    fn ids<S: OrderStore>(collection: &OrderedCollection<S>) -> Vec<u64> {
        collection.items().iter().map(|record| record.id()).collect()
    }

    #[tokio::test]
    async fn load_sorts_ascending_by_sort_order() {
        let store = MemoryStore::with_rows(vec![
            Row::new(3, 2),
            Row::new(1, 0),
            Row::new(2, 1),
        ]);
        let mut collection = OrderedCollection::new(store);
        collection.load().await.unwrap();

        assert_eq!(ids(&collection), vec![1, 2, 3]);
        let orders: Vec<i64> = collection.items().iter().map(Orderable::sort_order).collect();
        assert!(orders.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn load_keeps_server_order_for_ties() {
        // Duplicate indices left over from a partial failure: the
        // server's relative order wins, and this is not an error.
        let store = MemoryStore::with_rows(vec![Row::new(5, 0), Row::new(2, 0)]);
        let mut collection = OrderedCollection::new(store);
        collection.load().await.unwrap();

        assert_eq!(ids(&collection), vec![5, 2]);
    }

    #[tokio::test]
    async fn load_replaces_previous_state_wholesale() {
        let store = MemoryStore::with_rows(vec![Row::new(1, 0), Row::new(2, 1)]);
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();

        store.rows.lock().unwrap().push(Row::new(9, 9));
        collection.load().await.unwrap();
        assert_eq!(ids(&collection), vec![1, 2, 9]);
    }

    #[tokio::test]
    async fn reorder_moves_element_and_writes_every_index() {
        let store = MemoryStore::with_rows(vec![
            Row::new(1, 0),
            Row::new(2, 1),
            Row::new(3, 2),
        ]);
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let generation = collection.generation();

        let outcome = collection.reorder(0, 2, generation).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(ids(&collection), vec![2, 3, 1]);
        // One write per item, each carrying the item's final index.
        let mut writes = store.write_log();
        writes.sort_unstable();
        assert_eq!(writes, vec![(1, 2), (2, 0), (3, 1)]);
    }

    #[tokio::test]
    async fn reorder_shifts_right_to_left() {
        let store = MemoryStore::with_rows(vec![
            Row::new(1, 0),
            Row::new(2, 1),
            Row::new(3, 2),
            Row::new(4, 3),
        ]);
        let mut collection = OrderedCollection::new(store);
        collection.load().await.unwrap();
        let generation = collection.generation();

        collection.reorder(3, 1, generation).await.unwrap();

        // Elements between the endpoints shift right by one.
        assert_eq!(ids(&collection), vec![1, 4, 2, 3]);
    }

    #[tokio::test]
    async fn reorder_same_index_is_a_noop() {
        let store = MemoryStore::with_rows(vec![
            Row::new(1, 0),
            Row::new(2, 1),
            Row::new(3, 2),
        ]);
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let generation = collection.generation();

        let outcome = collection.reorder(1, 1, generation).await.unwrap();

        assert_eq!(outcome, Outcome::Noop);
        assert_eq!(ids(&collection), vec![1, 2, 3]);
        assert!(store.write_log().is_empty());
        assert_eq!(collection.generation(), generation);
    }

    #[tokio::test]
    async fn reorder_out_of_bounds_fails_without_side_effects() {
        let store = MemoryStore::with_rows(vec![Row::new(1, 0), Row::new(2, 1)]);
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let generation = collection.generation();

        let err = collection.reorder(0, 5, generation).await.unwrap_err();

        assert!(matches!(
            err,
            OrderingError::IndexOutOfBounds { index: 5, len: 2 }
        ));
        assert_eq!(ids(&collection), vec![1, 2]);
        assert!(store.write_log().is_empty());
    }

    #[tokio::test]
    async fn reorder_ignores_stale_generation() {
        let store = MemoryStore::with_rows(vec![
            Row::new(1, 0),
            Row::new(2, 1),
            Row::new(3, 2),
        ]);
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let stale = collection.generation();
        collection.load().await.unwrap();

        let outcome = collection.reorder(0, 2, stale).await.unwrap();

        assert_eq!(outcome, Outcome::Stale);
        assert_eq!(ids(&collection), vec![1, 2, 3]);
        assert!(store.write_log().is_empty());
    }

    #[tokio::test]
    async fn failed_write_resyncs_from_server_once() {
        // The write for id 1 fails while the others land, leaving the
        // server with a mix of old and new positions.
        let store = MemoryStore::failing(
            vec![Row::new(1, 0), Row::new(2, 1), Row::new(3, 2)],
            &[1],
        );
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let generation = collection.generation();

        let err = collection.reorder(0, 2, generation).await.unwrap_err();

        assert!(matches!(err, OrderingError::Api(ApiError::Server { .. })));
        // Initial load plus exactly one resync.
        assert_eq!(store.fetch_calls.load(AtomicOrdering::SeqCst), 2);
        // Server state after the partial writes: id 1 kept order 0,
        // id 2 got 0, id 3 got 1. Stable sort of server order
        // [1(0), 2(0), 3(1)] keeps 1 ahead of 2, not the optimistic
        // order the gesture produced.
        assert_eq!(ids(&collection), vec![1, 2, 3]);
        assert_ne!(ids(&collection), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn resync_reflects_whatever_the_server_holds() {
        // Failing id 3 instead: writes 2->0 and 1->2 land, 3 keeps its
        // old index 2. The recovered order interleaves old and new.
        let store = MemoryStore::failing(
            vec![Row::new(1, 0), Row::new(2, 1), Row::new(3, 2)],
            &[3],
        );
        let mut collection = OrderedCollection::new(Arc::clone(&store));
        collection.load().await.unwrap();
        let generation = collection.generation();

        collection.reorder(0, 2, generation).await.unwrap_err();

        // Server rows: 1(2), 2(0), 3(2); stable sort keeps 1 ahead of 3.
        assert_eq!(ids(&collection), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn generation_advances_on_load_and_apply() {
        let store = MemoryStore::with_rows(vec![Row::new(1, 0), Row::new(2, 1)]);
        let mut collection = OrderedCollection::new(store);
        assert_eq!(collection.generation(), 0);

        collection.load().await.unwrap();
        let after_load = collection.generation();
        assert!(after_load > 0);

        collection.reorder(0, 1, after_load).await.unwrap();
        assert!(collection.generation() > after_load);
    }
}
