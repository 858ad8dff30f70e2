#[cfg(doc)]
use std::mem;
use {
    crate::{
        aggregator::{Aggregator, InstanceSlot},
        attributes::AttributeMask,
        category::Category,
        config::LockConfig,
        error::SlotError,
        execution_unit::ExecutionUnit,
        handlers::HandlerTable,
        provenance::Provenance,
    },
    debug_fn::debug_fn,
    parking_lot::{Condvar, Mutex, MutexGuard},
    run_on_drop::on_drop,
    static_assertions::{assert_impl_all, assert_not_impl_any},
    std::{
        fmt::{Debug, Formatter},
        mem::ManuallyDrop,
        ops::{Deref, DerefMut},
        panic::Location,
        sync::{Arc, Weak},
        thread,
    },
};


/// A lockable object whose attribute changes are reported to an [`Aggregator`].
///
/// The object carries a mutex, a condition variable tied to that mutex, and the mask of
/// attribute changes that have not yet been consumed. The payload `T` is the rest of the
/// object's state and is only reachable through an [`ObjectGuard`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use object_lock::{Aggregator, AttributeMask, Category, Object};
///
/// let aggregator = Arc::new(Aggregator::new());
/// let player = Object::new(Category::AudioPlayer, 0u32)
///     .register_with(&aggregator)
///     .unwrap();
///
/// let mut guard = player.lock_exclusive();
/// *guard += 1;
/// guard.unlock_and_report(AttributeMask::POSITION);
///
/// assert_eq!(aggregator.take_changed(), 1);
/// assert_eq!(player.lock_exclusive().take_pending(), AttributeMask::POSITION);
/// ```
pub struct Object<T> {
    category: Category,
    slot: Option<InstanceSlot>,
    aggregator: Weak<Aggregator>,
    handlers: Arc<HandlerTable<T>>,
    config: Arc<LockConfig>,
    // Holder metadata. Only touched when diagnostics are enabled. Never held while
    // acquiring `state`.
    provenance: Mutex<Provenance>,
    state: Mutex<State<T>>,
    cond: Condvar,
}

struct State<T> {
    pending: AttributeMask,
    data: T,
}

/// Exclusive access to an [`Object`].
///
/// Created by [`Object::lock_exclusive`] and [`Object::try_lock_exclusive`]. Dereferences
/// to the object's payload.
///
/// Dropping the guard unlocks the object without reporting any attribute changes. Use
/// [`ObjectGuard::unlock`] to also record the unlock site, or
/// [`ObjectGuard::unlock_and_report`] to report changes.
pub struct ObjectGuard<'a, T> {
    object: &'a Object<T>,
    guard: ManuallyDrop<MutexGuard<'a, State<T>>>,
}

assert_impl_all!(Object<std::cell::Cell<u32>>: Send, Sync);
assert_not_impl_any!(ObjectGuard<'static, u32>: Send);

impl<T> Object<T> {
    /// Creates an unlocked object that is not tracked by any aggregator.
    ///
    /// The object has no attribute handlers and uses the default [`LockConfig`].
    pub fn new(category: Category, data: T) -> Self {
        Self {
            category,
            slot: None,
            aggregator: Weak::new(),
            handlers: Arc::new(HandlerTable::new()),
            config: Arc::new(LockConfig::default()),
            provenance: Mutex::new(Provenance::default()),
            state: Mutex::new(State {
                pending: AttributeMask::NONE,
                data,
            }),
            cond: Condvar::new(),
        }
    }

    /// Uses `config` for holder tracking and contention backoff.
    pub fn with_config(mut self, config: Arc<LockConfig>) -> Self {
        self.config = config;
        self
    }

    /// Routes reported attribute changes through `handlers` before they become pending.
    pub fn with_handlers(mut self, handlers: Arc<HandlerTable<T>>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Reports this object to `aggregator` under `slot`.
    ///
    /// The object does not keep the aggregator alive. Once the aggregator is dropped,
    /// notifications are discarded.
    pub fn with_aggregator(mut self, aggregator: &Arc<Aggregator>, slot: InstanceSlot) -> Self {
        self.aggregator = Arc::downgrade(aggregator);
        self.slot = Some(slot);
        self
    }

    /// Allocates a slot in `aggregator` and reports this object to it under that slot.
    pub fn register_with(self, aggregator: &Arc<Aggregator>) -> Result<Self, SlotError> {
        let slot = aggregator.allocate_slot()?;
        Ok(self.with_aggregator(aggregator, slot))
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn slot(&self) -> Option<InstanceSlot> {
        self.slot
    }

    #[inline]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Returns whether this object is locked by any thread.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Returns whether the calling thread holds this object.
    ///
    /// Always returns `false` if diagnostics are disabled.
    pub fn is_locked_by_current_thread(&self) -> bool {
        self.config.diagnostics && self.provenance.lock().owner == Some(ExecutionUnit::current())
    }

    /// Returns a snapshot of the holder metadata.
    ///
    /// Always returns the default value if diagnostics are disabled.
    pub fn provenance(&self) -> Provenance {
        *self.provenance.lock()
    }

    /// Locks this object.
    ///
    /// Blocks until the lock is acquired. With diagnostics enabled, a contended acquisition
    /// first retries through the configured backoff schedule and logs a warning naming
    /// the current holder before blocking.
    ///
    /// # Panic
    ///
    /// With diagnostics enabled, panics if the calling thread already holds this object or
    /// if the previous holder did not release it properly.
    #[track_caller]
    pub fn lock_exclusive(&self) -> ObjectGuard<'_, T> {
        let site = Location::caller();
        if !self.config.diagnostics {
            return self.make_guard(self.state.lock());
        }
        let guard = match self.state.try_lock() {
            Some(guard) => guard,
            None => self.lock_contended(site),
        };
        self.claim(site);
        self.make_guard(guard)
    }

    /// Attempts to lock this object without blocking.
    ///
    /// # Panic
    ///
    /// With diagnostics enabled, panics under the same conditions as
    /// [`Object::lock_exclusive`].
    #[track_caller]
    pub fn try_lock_exclusive(&self) -> Option<ObjectGuard<'_, T>> {
        let site = Location::caller();
        let guard = match self.state.try_lock() {
            Some(guard) => guard,
            None => {
                if self.config.diagnostics {
                    self.assert_not_recursive(site);
                }
                return None;
            }
        };
        if self.config.diagnostics {
            self.claim(site);
        }
        Some(self.make_guard(guard))
    }

    #[cold]
    fn lock_contended(&self, site: &'static Location<'static>) -> MutexGuard<'_, State<T>> {
        self.assert_not_recursive(site);
        for delay in self.config.backoff() {
            thread::sleep(delay);
            if let Some(guard) = self.state.try_lock() {
                return guard;
            }
        }
        let holder = self.provenance();
        tracing::warn!(
            object = ?self.addr(),
            %site,
            %holder,
            "object lock contended, blocking"
        );
        self.state.lock()
    }

    /// Unlocks this object on behalf of a guard that was passed to [`mem::forget`].
    ///
    /// # Safety
    ///
    /// The calling thread must have locked this object and forgotten the guard. The guard
    /// must not be used afterwards.
    ///
    /// # Panic
    ///
    /// With diagnostics enabled, panics before unlocking if the calling thread is not the
    /// recorded holder.
    #[track_caller]
    pub unsafe fn force_unlock(&self) {
        if self.config.diagnostics {
            self.disown(Some(Location::caller()));
        }
        // SAFETY: - The requirements are forwarded to the caller.
        unsafe {
            self.state.force_unlock();
        }
    }

    /// Wakes one thread blocked in [`ObjectGuard::wait`] on this object.
    ///
    /// The caller usually holds the lock to avoid lost wakeups but does not have to.
    #[inline]
    pub fn signal(&self) {
        self.cond.notify_one();
    }

    /// Wakes all threads blocked in [`ObjectGuard::wait`] on this object.
    #[inline]
    pub fn broadcast(&self) {
        self.cond.notify_all();
    }

    #[inline]
    fn make_guard<'a>(&'a self, guard: MutexGuard<'a, State<T>>) -> ObjectGuard<'a, T> {
        ObjectGuard {
            object: self,
            guard: ManuallyDrop::new(guard),
        }
    }

    /// Records the calling thread as the holder. Must be called right after acquiring the
    /// lock.
    #[track_caller]
    fn claim(&self, site: &'static Location<'static>) {
        let me = ExecutionUnit::current();
        let provenance = &mut *self.provenance.lock();
        if let Some(owner) = provenance.owner {
            let previous = *provenance;
            if owner == me {
                tracing::error!(object = ?self.addr(), %site, %previous, "object recursively locked");
                panic!(
                    "object {:?} was recursively locked at {site}; already locked by {previous}",
                    self.addr(),
                );
            }
            tracing::error!(object = ?self.addr(), %site, %previous, "object left in unexpected state");
            panic!(
                "object {:?} locked at {site} was left unlocked in unexpected state by {previous}",
                self.addr(),
            );
        }
        *provenance = Provenance {
            owner: Some(me),
            site: Some(site),
        };
    }

    /// Clears the holder. `site` replaces the recorded site if present.
    #[track_caller]
    fn disown(&self, site: Option<&'static Location<'static>>) {
        let me = ExecutionUnit::current();
        let provenance = &mut *self.provenance.lock();
        // A guard dropped during unwinding releases unconditionally.
        if !thread::panicking() && (provenance.owner != Some(me) || provenance.site.is_none()) {
            let previous = *provenance;
            tracing::error!(
                object = ?self.addr(),
                site = ?site,
                %me,
                %previous,
                "object unlocked by a thread that does not hold it"
            );
            panic!(
                "object {:?} unlocked by {me}, but owned by {previous}",
                self.addr(),
            );
        }
        provenance.owner = None;
        if site.is_some() {
            provenance.site = site;
        }
    }

    #[track_caller]
    fn assert_not_recursive(&self, site: &'static Location<'static>) {
        let previous = self.provenance();
        if previous.owner == Some(ExecutionUnit::current()) {
            tracing::error!(object = ?self.addr(), %site, %previous, "object recursively locked");
            panic!(
                "object {:?} was recursively locked at {site}; already locked by {previous}",
                self.addr(),
            );
        }
    }

    fn notify_aggregator(&self) {
        let Some(slot) = self.slot else {
            return;
        };
        if let Some(aggregator) = self.aggregator.upgrade() {
            aggregator.notify(slot);
        }
    }

    #[inline]
    pub(crate) fn addr(&self) -> *const u8 {
        let addr: *const Self = self;
        addr.cast()
    }
}

impl<'a, T> ObjectGuard<'a, T> {
    /// Returns the locked object.
    #[inline]
    pub fn object(&self) -> &'a Object<T> {
        self.object
    }

    /// Returns the attribute changes not yet consumed.
    #[inline]
    pub fn pending(&self) -> AttributeMask {
        self.guard.pending
    }

    /// Returns the attribute changes not yet consumed and clears them.
    ///
    /// This returns the object to the clean state so that the next reported change
    /// notifies the aggregator again.
    #[inline]
    pub fn take_pending(&mut self) -> AttributeMask {
        std::mem::take(&mut self.guard.pending)
    }

    /// Unlocks the object and records the unlock site.
    ///
    /// # Panic
    ///
    /// With diagnostics enabled, panics if the calling thread is not the recorded holder.
    #[track_caller]
    pub fn unlock(self) {
        let site = Location::caller();
        let mut slf = ManuallyDrop::new(self);
        // SAFETY: - slf is never used or dropped after this.
        unsafe {
            slf.release(Some(site));
        }
    }

    /// Unlocks the object and reports the attributes in `changed`.
    ///
    /// Bits are visited lowest first. For each bit with a handler registered for the
    /// object's category, the handler runs while the object is still locked; the bits it
    /// returns are not reported asynchronously. The remaining bits are merged into the
    /// pending mask.
    ///
    /// If the pending mask was empty before, the object's bit is set in the aggregator
    /// after the object has been unlocked. If it was not empty, the aggregator has
    /// already been notified of this dirty period and is not notified again.
    ///
    /// # Panic
    ///
    /// Panics if `changed` contains bits at or above
    /// [`ATTRIBUTE_INDEX_MAX`](crate::ATTRIBUTE_INDEX_MAX). With diagnostics enabled,
    /// panics if the calling thread is not the recorded holder.
    #[track_caller]
    pub fn unlock_and_report(mut self, changed: AttributeMask) {
        let site = Location::caller();
        let newly_dirty = self.dispatch(changed, site);
        let mut slf = ManuallyDrop::new(self);
        let object = slf.object;
        // SAFETY: - slf is never used or dropped after this.
        unsafe {
            slf.release(Some(site));
        }
        if newly_dirty {
            object.notify_aggregator();
        }
    }

    /// Runs the synchronous handlers and merges the rest into the pending mask. Returns
    /// whether the object went from clean to dirty.
    #[inline]
    fn dispatch(&mut self, changed: AttributeMask, site: &'static Location<'static>) -> bool {
        let object = self.object;
        if !AttributeMask::ALL.contains(changed) {
            tracing::error!(object = ?object.addr(), %site, ?changed, "unknown attribute reported");
            panic!("object {:?} reported unknown attributes {changed:?}", object.addr());
        }
        let state = &mut **self.guard;
        let mut asynchronous = changed;
        for bit in changed {
            if let Some(handler) = object.handlers.get(object.category, bit) {
                asynchronous &= !handler(object, &mut state.data);
            }
        }
        if asynchronous.is_empty() {
            return false;
        }
        let was_clean = state.pending.is_empty();
        state.pending |= asynchronous;
        was_clean
    }

    /// Blocks on the object's condition variable.
    ///
    /// The lock is released while waiting and re-acquired before returning. Other threads
    /// can lock the object in the meantime. With diagnostics enabled, the object is
    /// recorded as unowned for the duration of the wait and as owned by the calling
    /// thread again once this function returns.
    ///
    /// # Panic
    ///
    /// With diagnostics enabled, panics if the calling thread is not the recorded holder.
    #[track_caller]
    pub fn wait(&mut self) {
        let site = Location::caller();
        let object = self.object;
        if !object.config.diagnostics {
            object.cond.wait(&mut *self.guard);
            return;
        }
        object.disown(Some(site));
        let _restore = on_drop(|| {
            *object.provenance.lock() = Provenance {
                owner: Some(ExecutionUnit::current()),
                site: Some(site),
            };
        });
        object.cond.wait(&mut *self.guard);
    }

    /// # Safety
    ///
    /// - self must not be used or dropped after this call.
    #[inline]
    #[track_caller]
    unsafe fn release(&mut self, site: Option<&'static Location<'static>>) {
        if self.object.config.diagnostics {
            self.object.disown(site);
        }
        // SAFETY: - By the requirements of this function, the guard is not accessed
        //           again.
        unsafe {
            ManuallyDrop::drop(&mut self.guard);
        }
    }
}

impl<T> Deref for ObjectGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.guard.data
    }
}

impl<T> DerefMut for ObjectGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard.data
    }
}

impl<T> Drop for ObjectGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: - We're in the destructor.
        unsafe {
            self.release(None);
        }
    }
}

impl<T> Debug for Object<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.addr())
            .field("category", &self.category)
            .field("slot", &self.slot)
            .field(
                "state",
                &debug_fn(|fmt| {
                    if let Some(state) = self.state.try_lock() {
                        fmt.debug_struct("State")
                            .field("pending", &state.pending)
                            .field("data", &state.data)
                            .finish()
                    } else {
                        fmt.write_str("<locked>")
                    }
                }),
            )
            .finish_non_exhaustive()
    }
}

impl<T> Debug for ObjectGuard<'_, T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectGuard")
            .field("object_id", &self.object.addr())
            .field("pending", &self.guard.pending)
            .field("data", &self.guard.data)
            .finish()
    }
}
