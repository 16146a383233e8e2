//! Strongly typed identifier wrappers and the shared id counter.
//!
//! Cars and passengers draw their raw values from one [`IdGenerator`], so an
//! id is unique across both entity kinds.  Saved games record the last issued
//! value and generation resumes strictly above it after a load.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Raw integer value.
            #[inline(always)]
            pub fn raw(self) -> $inner {
                self.0
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a taxi.
    pub struct CarId(u32);
}

typed_id! {
    /// Identifier of a passenger.
    pub struct PassengerId(u32);
}

typed_id! {
    /// Identifier of a UI notification.  Drawn from a separate counter; never
    /// persisted.
    pub struct NotificationId(u64);
}

// ── IdGenerator ───────────────────────────────────────────────────────────────

/// Monotonic counter handing out raw ids for cars and passengers.
///
/// The first id issued by `IdGenerator::new(0)` is `1`, so `0` never names a
/// live entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdGenerator {
    last: u32,
}

impl IdGenerator {
    /// Resume issuing ids after `last` (the most recently issued raw value).
    pub fn new(last: u32) -> Self {
        Self { last }
    }

    /// Most recently issued raw value (`0` if none).
    #[inline]
    pub fn last_issued(&self) -> u32 {
        self.last
    }

    pub fn next_car(&mut self) -> CarId {
        CarId(self.bump())
    }

    pub fn next_passenger(&mut self) -> PassengerId {
        PassengerId(self.bump())
    }

    /// Make sure future ids are strictly above `seen`.
    pub fn observe(&mut self, seen: u32) {
        self.last = self.last.max(seen);
    }

    fn bump(&mut self) -> u32 {
        // `INVALID` is u32::MAX; stop one short of it.
        debug_assert!(self.last < u32::MAX - 1, "id space exhausted");
        self.last = self.last.saturating_add(1).min(u32::MAX - 1);
        self.last
    }
}
