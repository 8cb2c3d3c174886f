use std::fmt;

/// The two-valued state a [`PhaseCycler`](crate::PhaseCycler) flips between.
///
/// Values are never mutated in place; a transition produces a new `Phase`
/// through [`toggled`](Self::toggled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Red,
    Green,
}

impl Phase {
    /// The phase that follows `self`.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    // Red = 0, Green = 1, so a phase fits in the low bit of an atomic word.
    pub(crate) const fn to_bit(self) -> u32 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
        }
    }

    pub(crate) const fn from_bit(word: u32) -> Self {
        if word & 1 == 0 {
            Self::Red
        } else {
            Self::Green
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
        }
    }
}
