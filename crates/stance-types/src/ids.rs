//! Strongly-typed body identifiers.
//!
//! Id `0` is reserved for the ground: an immovable body that is never
//! listed among the assembly's bodies and owns no equations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a rigid body in an assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The immovable ground.
    pub const GROUND: BodyId = BodyId(0);

    /// Returns true if this id refers to the ground.
    #[inline]
    pub fn is_ground(self) -> bool {
        self == Self::GROUND
    }

    /// Returns the raw id.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for BodyId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "ground")
        } else {
            write!(f, "body {}", self.0)
        }
    }
}
