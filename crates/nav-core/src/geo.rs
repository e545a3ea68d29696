//! World-space coordinate type.
//!
//! `WorldPos` is a continuous position in world units (the host's pixel
//! space).  Agents move continuously; the grid layers discretise this space
//! into nodes `node_separation` world units apart.

/// A continuous 2-D position in world units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in world units.
    #[inline]
    pub fn distance(self, other: WorldPos) -> f32 {
        self.distance_sq(other).sqrt()
    }

    #[inline]
    pub fn distance_sq(self, other: WorldPos) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Cheap axis-aligned proximity check for quick rejection.
    #[inline]
    pub fn within_box(self, center: WorldPos, half_extent: f32) -> bool {
        (self.x - center.x).abs() <= half_extent && (self.y - center.y).abs() <= half_extent
    }
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
