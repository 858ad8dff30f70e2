use {
    crate::execution_unit::ExecutionUnit,
    std::{
        fmt::{Display, Formatter},
        panic::Location,
    },
};

/// The last recorded holder of an object lock.
///
/// Only maintained while diagnostics are enabled. `owner` is the thread currently holding
/// the lock, if any. `site` is the call site that last changed `owner`: the lock site while
/// the lock is held and the unlock or wait site after that.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    pub owner: Option<ExecutionUnit>,
    pub site: Option<&'static Location<'static>>,
}

impl Display for Provenance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{owner}")?,
            None => f.write_str("nobody")?,
        }
        match self.site {
            Some(site) => write!(f, " at {site}"),
            None => f.write_str(" at <unknown>"),
        }
    }
}
