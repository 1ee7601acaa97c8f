use core::fmt;
use core::num::NonZeroU32;

/// Handle of a decision variable: its slot in the model's variable store.
///
/// Slots are dense and assigned in declaration order, so a handle doubles as
/// the index into any solution vector produced for the same model. The
/// non-zero representation keeps `Option<VarId>` the size of a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(NonZeroU32);

impl VarId {
    /// Handle for the variable declared at position `slot`.
    pub fn from_index(slot: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(slot))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Position in a solution vector.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}]", self.index())
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
