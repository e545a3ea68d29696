//! Strongly typed, zero-cost identifier wrappers.
//!
//! Nodes, entities and layers are unsigned and index dense per-layer or
//! per-world tables.  Group ids are signed so reserved sentinels (walls, "no
//! group") never collide with tribe ids the host hands out.

use std::fmt;

/// Typed id over an unsigned integer, with an all-ones `INVALID` sentinel.
/// Displays as the bare number; messages add their own noun ("layer 2").
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != <$inner>::MAX
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id! {
    /// A discrete grid node within one layer.
    ///
    /// The value is only meaningful together with the layer's node index.
    /// Ids run row-major over the padded grid (`y`, then `x`), so `Ord` on
    /// nodes is scan order; the closest-node fallback breaks ties with it.
    pub struct Node(u32);
}

typed_id! {
    /// An entity (agent, structure, tree…) that may occupy nodes.
    pub struct EntityId(u32);
}

typed_id! {
    /// Index of a vertically stacked layer.  Layer 0 is the surface and
    /// larger ids lie deeper.
    pub struct LayerId(u16);
}

impl LayerId {
    pub const SURFACE: LayerId = LayerId(0);

    /// The layer directly beneath this one.
    #[inline]
    pub const fn below(self) -> LayerId {
        LayerId(self.0 + 1)
    }

    /// The layer directly above this one, or `None` at the surface.
    #[inline]
    pub const fn above(self) -> Option<LayerId> {
        match self.0.checked_sub(1) {
            Some(up) => Some(LayerId(up)),
            None => None,
        }
    }
}

// ── GroupId ───────────────────────────────────────────────────────────────────

/// Tag identifying a mutually exclusive occupant set (one tribe's agents and
/// structures), stored in node occupancy lists.
///
/// Signed so the reserved sentinels stay out of the range the host hands out
/// to tribes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub i32);

impl GroupId {
    /// Permanent terrain walls.  Written by the tile map before any query.
    pub const WALL: GroupId = GroupId(-1);

    /// A group no occupant ever carries.  Pass it as the ignored group to
    /// treat every occupant as blocking.
    pub const NONE: GroupId = GroupId(i32::MIN);

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Self::WALL
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::WALL => f.write_str("wall"),
            Self::NONE => f.write_str("none"),
            GroupId(g) => write!(f, "{g}"),
        }
    }
}
