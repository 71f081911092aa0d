//! Capacity-bounded reuse cache for activatable objects
//!
//! Handles live in one of two places:
//! - `storage`: retained handles, at most `limit` of them. Each is either
//!   active (lent out) or inactive (ready for reuse).
//! - `overflow`: handles created while storage was full. They are never
//!   reused and get destroyed on the next [`ActivatableStorage::disable_all`]
//!   or when recalled individually.
//!
//! Reuse order is least-recently-recalled first.

use std::fmt;

use super::activatable::Activatable;

/// Storage limit meaning "no limit"
pub const INFINITY_LIMIT: i32 = -1;

/// A retained handle plus its LRU stamp
struct Slot<T> {
    handle: T,
    recalled_at: u64,
}

/// Bounded pool of reusable [`Activatable`] handles
pub struct ActivatableStorage<T> {
    storage: Vec<Slot<T>>,
    overflow: Vec<T>,
    limit: i32,
    factory: Box<dyn FnMut() -> T>,
    /// Monotonic stamp source for LRU ordering
    stamp: u64,
}

impl<T> fmt::Debug for ActivatableStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivatableStorage")
            .field("stored", &self.storage.len())
            .field("overflow", &self.overflow.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<T> ActivatableStorage<T>
where
    T: Activatable + PartialEq + Clone,
{
    /// Create a storage from a factory and a capacity. Negative `limit` means unbounded.
    pub fn new(factory: impl FnMut() -> T + 'static, limit: i32) -> Self {
        log::debug!(
            "Creating activatable storage (limit: {})",
            if limit < 0 { "unbounded".to_string() } else { limit.to_string() }
        );
        Self {
            storage: Vec::new(),
            overflow: Vec::new(),
            limit,
            factory: Box::new(factory),
            stamp: 0,
        }
    }

    /// Storage without a capacity limit
    pub fn unbounded(factory: impl FnMut() -> T + 'static) -> Self {
        Self::new(factory, INFINITY_LIMIT)
    }

    pub fn limit(&self) -> i32 {
        self.limit
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.limit < 0
    }

    /// Number of retained handles (active and inactive)
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Number of over-capacity handles awaiting destruction
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Whether `handle` is retained by this storage
    pub fn contains(&self, handle: &T) -> bool {
        self.position(handle).is_some()
    }

    /// Get a handle: reuse an inactive one or create a new one. Always returned active.
    pub fn next_object(&mut self) -> T {
        self.purge_dead();

        let reusable = self
            .storage
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.handle.is_active())
            .min_by_key(|(_, slot)| slot.recalled_at)
            .map(|(i, _)| i);

        let mut handle = match reusable {
            Some(i) => {
                log::trace!("Reusing stored handle {}", i);
                self.storage[i].handle.clone()
            }
            None => self.create(),
        };

        handle.set_active(true);
        handle
    }

    /// Deactivate every retained handle and destroy every overflow handle
    pub fn disable_all(&mut self) {
        self.purge_dead();

        for i in 0..self.storage.len() {
            let stamp = self.next_stamp();
            let slot = &mut self.storage[i];
            slot.handle.set_active(false);
            slot.recalled_at = stamp;
        }

        let destroyed = self.overflow.len();
        for mut handle in self.overflow.drain(..) {
            if handle.is_alive() {
                handle.destroy();
            }
        }

        log::debug!(
            "Recalled {} stored handles, destroyed {} overflow handles",
            self.storage.len(),
            destroyed
        );
    }

    /// Alias of [`Self::disable_all`]
    pub fn recall_all(&mut self) {
        self.disable_all();
    }

    /// Return a handle.
    ///
    /// Retained handles are deactivated and `true` is returned. Anything else
    /// (overflow or foreign handles) is destroyed and `false` is returned.
    pub fn recall_object(&mut self, handle: &T) -> bool {
        if let Some(i) = self.position(handle) {
            let stamp = self.next_stamp();
            let slot = &mut self.storage[i];
            slot.handle.set_active(false);
            slot.recalled_at = stamp;
            return true;
        }

        let mut doomed = match self.overflow.iter().position(|h| h == handle) {
            Some(i) => self.overflow.swap_remove(i),
            None => handle.clone(),
        };
        log::trace!("Destroying handle outside storage");
        doomed.destroy();
        false
    }

    /// [`Self::recall_object`] where a missing handle is a successful no-op
    pub fn recall_object_opt(&mut self, handle: Option<&T>) -> bool {
        match handle {
            Some(handle) => self.recall_object(handle),
            None => true,
        }
    }

    /// Alias of [`Self::recall_object`]
    pub fn recall(&mut self, handle: &T) -> bool {
        self.recall_object(handle)
    }

    /// Destroy everything, retained or not, and empty the storage
    pub fn destroy_all(&mut self) {
        let stored = self.storage.drain(..).map(|slot| slot.handle);
        let overflow = self.overflow.drain(..);
        let mut destroyed = 0usize;
        for mut handle in stored.chain(overflow) {
            if handle.is_alive() {
                handle.destroy();
                destroyed += 1;
            }
        }
        log::debug!("Destroyed {} handles", destroyed);
    }

    /// Retained handles that are currently active
    pub fn active_objects(&self) -> impl Iterator<Item = &T> + '_ {
        self.storage
            .iter()
            .map(|slot| &slot.handle)
            .filter(|h| h.is_active())
    }

    fn create(&mut self) -> T {
        let created = (self.factory)();
        if self.has_room() {
            let stamp = self.next_stamp();
            self.storage.push(Slot {
                handle: created.clone(),
                recalled_at: stamp,
            });
            log::debug!("Admitted new handle ({} stored)", self.storage.len());
        } else {
            log::warn!(
                "Storage full ({} handles), new handle will be destroyed on recall",
                self.limit
            );
            self.overflow.push(created.clone());
        }
        created
    }

    fn has_room(&self) -> bool {
        self.is_unbounded() || self.storage.len() < self.limit as usize
    }

    fn position(&self, handle: &T) -> Option<usize> {
        self.storage.iter().position(|slot| &slot.handle == handle)
    }

    /// Drop handles the host destroyed behind our back
    fn purge_dead(&mut self) {
        let before = self.storage.len();
        self.storage.retain(|slot| slot.handle.is_alive());
        let purged = before - self.storage.len();
        if purged > 0 {
            log::debug!("Purged {} externally destroyed handles", purged);
        }
    }

    fn next_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }
}
