//! Entity geometry and its conversion to occupied nodes.
//!
//! | Hitbox   | Occupies                                                         |
//! |----------|------------------------------------------------------------------|
//! | `Circle` | nodes within `radius / sep + hard_margin` of the centre (solid)  |
//! |          | or `radius / sep - soft_shrink` (non-solid, clamped at 0)        |
//! | `Rect`   | nodes within `hard_margin` of the rectangle (solid) or inside it |
//!
//! Distances above are in node units.  Nodes outside the padded grid are
//! skipped.

use nav_core::{GridConfig, Node, WorldPos};

use crate::NodeIndex;

/// Collision shape of an entity, in world units.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hitbox {
    Circle { radius: f32 },
    /// Axis-aligned rectangle centred on the entity position.
    Rect { half_width: f32, half_height: f32 },
}

impl Hitbox {
    /// Largest distance from the centre to the shape's edge along an axis.
    pub fn half_extents(self) -> (f32, f32) {
        match self {
            Hitbox::Circle { radius } => (radius, radius),
            Hitbox::Rect { half_width, half_height } => (half_width, half_height),
        }
    }
}

/// Where an entity is and what it blocks.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub pos:    WorldPos,
    pub hitbox: Hitbox,
    /// Solid hitboxes get a safety margin; soft ones are shrunk so agents
    /// can brush past them.
    pub solid:  bool,
}

impl Geometry {
    pub fn circle(pos: WorldPos, radius: f32, solid: bool) -> Self {
        Self { pos, hitbox: Hitbox::Circle { radius }, solid }
    }

    pub fn rect(pos: WorldPos, half_width: f32, half_height: f32, solid: bool) -> Self {
        Self { pos, hitbox: Hitbox::Rect { half_width, half_height }, solid }
    }

    /// World-space bounding box `([min_x, min_y], [max_x, max_y])`.
    pub fn bounds(&self) -> ([f32; 2], [f32; 2]) {
        let (hw, hh) = self.hitbox.half_extents();
        (
            [self.pos.x - hw, self.pos.y - hh],
            [self.pos.x + hw, self.pos.y + hh],
        )
    }

    /// Every node this geometry blocks, each listed once, in row-major order.
    pub fn occupied_nodes(&self, index: &NodeIndex, cfg: &GridConfig) -> Vec<Node> {
        let sep = index.separation();
        let cx = self.pos.x / sep;
        let cy = self.pos.y / sep;

        match self.hitbox {
            Hitbox::Circle { radius } => {
                let r = if self.solid {
                    radius / sep + cfg.hard_margin
                } else {
                    (radius / sep - cfg.soft_shrink).max(0.0)
                };
                let r2 = r * r;
                collect_nodes(index, cx, cy, r, r, |x, y| {
                    let dx = x as f32 - cx;
                    let dy = y as f32 - cy;
                    dx * dx + dy * dy <= r2
                })
            }
            Hitbox::Rect { half_width, half_height } => {
                let hw = half_width / sep;
                let hh = half_height / sep;
                let clearance = if self.solid { cfg.hard_margin } else { 0.0 };
                let c2 = clearance * clearance;
                collect_nodes(index, cx, cy, hw + clearance, hh + clearance, |x, y| {
                    let dx = ((x as f32 - cx).abs() - hw).max(0.0);
                    let dy = ((y as f32 - cy).abs() - hh).max(0.0);
                    dx * dx + dy * dy <= c2
                })
            }
        }
    }
}

/// Scan the node box around `(cx, cy)` and keep nodes passing `inside`.
fn collect_nodes(
    index: &NodeIndex,
    cx:    f32,
    cy:    f32,
    ex:    f32,
    ey:    f32,
    inside: impl Fn(i32, i32) -> bool,
) -> Vec<Node> {
    let x0 = (cx - ex).floor() as i32;
    let x1 = (cx + ex).ceil() as i32;
    let y0 = (cy - ey).floor() as i32;
    let y1 = (cy + ey).ceil() as i32;

    let mut nodes = Vec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            if !inside(x, y) {
                continue;
            }
            if let Some(node) = index.try_node_of(x, y) {
                nodes.push(node);
            }
        }
    }
    nodes
}
