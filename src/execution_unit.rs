use std::{
    fmt::{self, Debug, Display, Formatter},
    num::NonZeroUsize,
};

#[cfg(test)]
mod tests;

/// The identity of a thread as recorded in an object's provenance.
///
/// An execution unit is morally a single thread except that it might span across multiple
/// threads that are connected by a happens-before relationship: a terminated thread's
/// thread-local storage can be re-used by a thread started later, which then observes the
/// same identity. Provenance only compares identities of threads that are alive at the
/// same time, so this never produces a false match.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionUnit(NonZeroUsize);

impl ExecutionUnit {
    /// Returns the execution unit of the calling thread.
    #[inline(always)]
    pub fn current() -> Self {
        thread_local!(static EXECUTION_UNIT_ID: u8 = const { 0 });
        let id = EXECUTION_UNIT_ID.with(|id| {
            let id: *const u8 = id;
            id as usize
        });
        match NonZeroUsize::new(id) {
            Some(id) => Self(id),
            None => unreachable!("thread-local storage is never at address 0"),
        }
    }

    /// Returns whether this is the execution unit of the calling thread.
    #[inline]
    pub fn is_current(self) -> bool {
        self == Self::current()
    }
}

impl Debug for ExecutionUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ExecutionUnit({:#x})", self.0)
    }
}

impl Display for ExecutionUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
