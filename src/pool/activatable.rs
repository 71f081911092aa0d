//! The capability every pooled object must provide

/// An object that can be switched on/off and destroyed.
///
/// Implementors are cheap handles to some host-owned resource. Equality must
/// be identity: two handles are equal iff they refer to the same resource.
pub trait Activatable {
    /// Activate or deactivate the underlying object
    fn set_active(&mut self, active: bool);

    /// Current activation state
    fn is_active(&self) -> bool;

    /// Destroy the underlying object
    fn destroy(&mut self);

    /// Whether the underlying object still exists.
    ///
    /// Returns `false` once the host destroyed the object behind the pool's
    /// back. Storages purge such handles before reusing anything.
    fn is_alive(&self) -> bool {
        true
    }
}
