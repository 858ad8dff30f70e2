use {
    crate::{
        attributes::{ATTRIBUTE_INDEX_MAX, AttributeMask},
        category::{CATEGORY_COUNT, Category},
        object::Object,
    },
    std::fmt::{Debug, Formatter},
};

#[cfg(test)]
mod tests;

/// A synchronous attribute handler.
///
/// The handler runs while the object is locked and receives the locked object together
/// with its payload. It returns the bits it has fully handled. Every returned bit is
/// removed from the asynchronous report, so a handler registered for one bit may also
/// resolve related bits. Bits it does not return stay pending.
///
/// The object is already locked by the reporting thread, so the handler must not lock it
/// again. Signaling its condition variable is fine.
pub type AttributeHandler<T> = fn(&Object<T>, &mut T) -> AttributeMask;

const BITS: usize = ATTRIBUTE_INDEX_MAX as usize;

/// An immutable mapping from (category, attribute bit) to an optional handler.
///
/// # Example
///
/// ```
/// use object_lock::{AttributeMask, Category, HandlerTable, Object};
///
/// // Applies the gain and, since the new gain also moves the mix, the position as well.
/// fn apply_gain(_: &Object<u32>, volume: &mut u32) -> AttributeMask {
///     *volume += 1;
///     AttributeMask::GAIN | AttributeMask::POSITION
/// }
///
/// let table = HandlerTable::<u32>::new().with(Category::AudioPlayer, 0, apply_gain);
/// assert!(table.get(Category::AudioPlayer, 0).is_some());
/// assert!(table.get(Category::AudioPlayer, 1).is_none());
/// assert!(table.get(Category::MediaPlayer, 0).is_none());
/// ```
pub struct HandlerTable<T> {
    rows: [[Option<AttributeHandler<T>>; BITS]; CATEGORY_COUNT],
}

impl<T> HandlerTable<T> {
    /// Creates a table without any handlers.
    pub fn new() -> Self {
        Self {
            rows: [[None; BITS]; CATEGORY_COUNT],
        }
    }

    /// Registers `handler` for `bit` of `category`, replacing any previous handler.
    ///
    /// # Panic
    ///
    /// Panics if `bit >= ATTRIBUTE_INDEX_MAX`.
    #[track_caller]
    pub fn register(&mut self, category: Category, bit: u32, handler: AttributeHandler<T>) {
        assert!(bit < ATTRIBUTE_INDEX_MAX, "attribute bit {bit} out of range");
        self.rows[category.row()][bit as usize] = Some(handler);
    }

    /// Builder form of [`HandlerTable::register`].
    #[track_caller]
    pub fn with(mut self, category: Category, bit: u32, handler: AttributeHandler<T>) -> Self {
        self.register(category, bit, handler);
        self
    }

    /// Returns the handler for `bit` of `category`, if any.
    #[inline]
    pub fn get(&self, category: Category, bit: u32) -> Option<AttributeHandler<T>> {
        self.rows[category.row()].get(bit as usize).copied().flatten()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.rows.iter().flatten().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HandlerTable<T> {
    fn clone(&self) -> Self {
        Self { rows: self.rows }
    }
}

impl<T> Debug for HandlerTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for category in Category::ALL {
            for (bit, handler) in self.rows[category.row()].iter().enumerate() {
                if handler.is_some() {
                    list.entry(&(category, bit));
                }
            }
        }
        list.finish()
    }
}
