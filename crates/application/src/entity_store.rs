use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use rbac_console_domain::{Role, RoleId, User, UserId};

/// Entity that can be cached in an [`EntityStore`].
pub trait StoreEntity: Clone {
    /// Identifier the store indexes by.
    type Id: Clone + Debug + Eq + Hash;

    /// Returns the entity identifier.
    fn entity_id(&self) -> &Self::Id;
}

impl StoreEntity for Role {
    type Id = RoleId;

    fn entity_id(&self) -> &Self::Id {
        self.id()
    }
}

impl StoreEntity for User {
    type Id = UserId;

    fn entity_id(&self) -> &Self::Id {
        self.id()
    }
}

/// How current the cached list is relative to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing fetched yet and no fetch in flight.
    Unloaded,
    /// First fetch in flight.
    Loading,
    /// Cached list matches the latest completed fetch.
    Fresh,
    /// A mutation succeeded since the last fetch.
    Stale,
    /// A refetch is in flight while the previous list is still shown.
    Refetching,
}

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Client-side cache of the last fetched list, keyed by entity id.
///
/// The list is always replaced wholesale; entries are never patched locally.
#[derive(Debug, Clone)]
pub struct EntityStore<T: StoreEntity> {
    items: Vec<T>,
    index: HashMap<T::Id, usize>,
    freshness: Freshness,
    loaded: bool,
    issued: u64,
    applied: u64,
    settled: u64,
}

impl<T: StoreEntity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreEntity> EntityStore<T> {
    /// Creates an empty, unloaded store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            freshness: Freshness::Unloaded,
            loaded: false,
            issued: 0,
            applied: 0,
            settled: 0,
        }
    }

    /// Records the start of a fetch and returns its ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued = self.issued.saturating_add(1);
        self.freshness = if self.loaded {
            Freshness::Refetching
        } else {
            Freshness::Loading
        };

        FetchTicket(self.issued)
    }

    /// Marks the cached list as outdated after a successful mutation.
    pub fn mark_stale(&mut self) {
        if self.freshness == Freshness::Fresh {
            self.freshness = Freshness::Stale;
        }
    }

    /// Replaces the cached list with a fetch result.
    ///
    /// Returns `false` when a newer fetch already landed and the result was
    /// discarded.
    pub fn apply(&mut self, ticket: FetchTicket, items: Vec<T>) -> bool {
        self.settled = self.settled.saturating_add(1);
        if ticket.0 <= self.applied {
            self.settle();
            return false;
        }

        self.index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.entity_id().clone(), position))
            .collect();
        self.items = items;
        self.applied = ticket.0;
        self.loaded = true;
        self.settle();

        true
    }

    /// Records a failed fetch. The previous list stays in place.
    pub fn fail(&mut self, _ticket: FetchTicket) {
        self.settled = self.settled.saturating_add(1);
        self.settle();
    }

    /// Derives freshness from the fetches still in flight and whether the
    /// newest issued fetch is the one applied.
    fn settle(&mut self) {
        self.freshness = if self.settled < self.issued {
            if self.loaded {
                Freshness::Refetching
            } else {
                Freshness::Loading
            }
        } else if self.applied == self.issued {
            Freshness::Fresh
        } else if self.loaded {
            Freshness::Stale
        } else {
            Freshness::Unloaded
        };
    }

    /// Returns the current freshness.
    #[must_use]
    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Returns whether the first fetch is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.freshness == Freshness::Loading
    }

    /// Returns whether any fetch has ever been applied.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.index
            .get(id)
            .and_then(|position| self.items.get(*position))
    }

    /// Returns the cached entities in service order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Returns the number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the cached list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rbac_console_domain::{Role, RoleId};

    use super::{EntityStore, Freshness};

    fn role(id: &str, name: &str) -> Role {
        Role::new(RoleId::new(id), name, vec!["view".to_owned()])
    }

    #[test]
    fn first_fetch_moves_from_loading_to_fresh() {
        let mut store = EntityStore::<Role>::new();
        assert_eq!(store.freshness(), Freshness::Unloaded);

        let ticket = store.begin_fetch();
        assert!(store.is_loading());

        assert!(store.apply(ticket, vec![role("r1", "Admin")]));
        assert_eq!(store.freshness(), Freshness::Fresh);
        assert_eq!(
            store.get(&RoleId::new("r1")).map(Role::name),
            Some("Admin")
        );
    }

    #[test]
    fn mutation_marks_stale_then_refetch_refreshes() {
        let mut store = EntityStore::<Role>::new();
        let ticket = store.begin_fetch();
        store.apply(ticket, Vec::new());

        store.mark_stale();
        assert_eq!(store.freshness(), Freshness::Stale);

        let ticket = store.begin_fetch();
        assert_eq!(store.freshness(), Freshness::Refetching);
        store.apply(ticket, vec![role("r1", "Admin")]);
        assert_eq!(store.freshness(), Freshness::Fresh);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn older_fetch_resolving_late_is_discarded() {
        let mut store = EntityStore::<Role>::new();
        let slow = store.begin_fetch();
        let fast = store.begin_fetch();

        assert!(store.apply(fast, vec![role("r2", "Editor")]));
        assert!(!store.apply(slow, vec![role("r1", "Admin")]));

        assert!(store.get(&RoleId::new("r1")).is_none());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.freshness(), Freshness::Fresh);
    }

    #[test]
    fn failed_refetch_keeps_previous_list() {
        let mut store = EntityStore::<Role>::new();
        let ticket = store.begin_fetch();
        store.apply(ticket, vec![role("r1", "Admin")]);

        let ticket = store.begin_fetch();
        store.fail(ticket);

        assert_eq!(store.freshness(), Freshness::Stale);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn newer_failure_then_older_success_settles() {
        let mut store = EntityStore::<Role>::new();
        let older = store.begin_fetch();
        let newer = store.begin_fetch();

        store.fail(newer);
        assert_eq!(store.freshness(), Freshness::Loading);
        assert!(store.apply(older, vec![role("r1", "Admin")]));

        assert_ne!(store.freshness(), Freshness::Refetching);
        assert_eq!(store.freshness(), Freshness::Stale);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn refetch_stays_in_flight_until_every_fetch_settles() {
        let mut store = EntityStore::<Role>::new();
        let first = store.begin_fetch();
        store.apply(first, Vec::new());

        let older = store.begin_fetch();
        let newer = store.begin_fetch();
        store.fail(older);
        assert_eq!(store.freshness(), Freshness::Refetching);

        store.apply(newer, vec![role("r1", "Admin")]);
        assert_eq!(store.freshness(), Freshness::Fresh);
    }

    #[test]
    fn failed_first_fetch_returns_to_unloaded() {
        let mut store = EntityStore::<Role>::new();
        let ticket = store.begin_fetch();
        store.fail(ticket);

        assert_eq!(store.freshness(), Freshness::Unloaded);
        assert!(store.is_empty());
    }
}
