//! Spawner: one prototype bound to a lazily built storage

use super::activatable::Activatable;
use super::storage::ActivatableStorage;
use crate::config::SpawnerConfig;

/// Something that can stamp out fresh pooled instances
pub trait Prototype {
    type Instance: Activatable + PartialEq + Clone + 'static;

    /// Create a brand new instance
    fn instantiate(&self) -> Self::Instance;
}

/// Spawn/recall facade over an [`ActivatableStorage`] for a single prototype
#[derive(Debug)]
pub struct Spawner<P: Prototype> {
    prototype: P,
    cache_size: i32,
    storage: Option<ActivatableStorage<P::Instance>>,
}

impl<P> Spawner<P>
where
    P: Prototype + Clone + 'static,
{
    /// Negative `cache_size` means unbounded
    pub fn new(prototype: P, cache_size: i32) -> Self {
        Self {
            prototype,
            cache_size,
            storage: None,
        }
    }

    pub fn from_config(prototype: P, config: &SpawnerConfig) -> Self {
        log::info!("Spawner '{}' with cache size {}", config.name, config.cache_size);
        Self::new(prototype, config.cache_size)
    }

    pub fn prototype(&self) -> &P {
        &self.prototype
    }

    pub fn cache_size(&self) -> i32 {
        self.cache_size
    }

    /// Get an active instance, reusing a recalled one when possible
    pub fn spawn(&mut self) -> P::Instance {
        self.storage_mut().next_object()
    }

    /// Return an instance. `false` means it was destroyed instead of cached.
    pub fn recall(&mut self, instance: &P::Instance) -> bool {
        self.storage_mut().recall_object(instance)
    }

    /// Deactivate everything cached, destroy overflow instances
    pub fn recall_all(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            storage.recall_all();
        }
    }

    /// Destroy every instance this spawner knows about
    pub fn clear(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            storage.destroy_all();
        }
    }

    /// Number of cached instances currently lent out
    pub fn active_count(&self) -> usize {
        self.storage
            .as_ref()
            .map(|s| s.active_objects().count())
            .unwrap_or(0)
    }

    fn storage_mut(&mut self) -> &mut ActivatableStorage<P::Instance> {
        let prototype = &self.prototype;
        let cache_size = self.cache_size;
        self.storage.get_or_insert_with(|| {
            let prototype = prototype.clone();
            ActivatableStorage::new(move || prototype.instantiate(), cache_size)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::activatable::mock::MockObject;
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct MockPrototype {
        made: Rc<Cell<u32>>,
    }

    impl Prototype for MockPrototype {
        type Instance = MockObject;

        fn instantiate(&self) -> MockObject {
            self.made.set(self.made.get() + 1);
            MockObject::new(self.made.get())
        }
    }

    #[test]
    fn test_storage_is_lazy() {
        let proto = MockPrototype::default();
        let mut spawner = Spawner::new(proto.clone(), 2);
        assert_eq!(spawner.active_count(), 0);
        spawner.clear(); // nothing built yet, nothing to do
        assert_eq!(proto.made.get(), 0);

        let a = spawner.spawn();
        assert!(a.is_active());
        assert_eq!(proto.made.get(), 1);
        assert_eq!(spawner.active_count(), 1);
    }

    #[test]
    fn test_spawn_recall_spawn() {
        let proto = MockPrototype::default();
        let mut spawner = Spawner::new(proto.clone(), 1);

        let a = spawner.spawn();
        assert!(spawner.recall(&a));
        let b = spawner.spawn();
        assert_eq!(a, b);
        assert_eq!(proto.made.get(), 1);
    }

    #[test]
    fn test_recall_before_spawn_destroys() {
        let mut spawner = Spawner::new(MockPrototype::default(), 1);
        let stray = MockObject::new(7);
        assert!(!spawner.recall(&stray));
        assert!(stray.destroyed());
    }

    #[test]
    fn test_over_capacity_and_clear() {
        let mut spawner = Spawner::new(MockPrototype::default(), 1);
        let a = spawner.spawn();
        let b = spawner.spawn();

        assert!(!spawner.recall(&b));
        assert!(b.destroyed());

        spawner.clear();
        assert!(a.destroyed());
        assert_eq!(spawner.active_count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = SpawnerConfig {
            name: "sparks".into(),
            cache_size: 8,
            ..Default::default()
        };
        let spawner = Spawner::from_config(MockPrototype::default(), &config);
        assert_eq!(spawner.cache_size(), 8);
    }
}
