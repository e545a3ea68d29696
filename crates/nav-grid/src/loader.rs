//! CSV tile loader.
//!
//! # CSV format
//!
//! One row per non-floor tile; tiles absent from the file are floor.
//!
//! ```csv
//! layer,x,y,kind
//! 0,3,0,wall
//! 0,3,1,wall
//! 0,7,7,dropdown
//! 1,2,2,wall
//! ```
//!
//! **`kind`** field: `floor`, `wall`, or `dropdown` (case-insensitive).
//! Rows may repeat a tile; the last row wins.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::tiles::{TileKind, TileMap};
use crate::GridError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TileRecord {
    layer: u16,
    x:     u32,
    y:     u32,
    kind:  String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `layer_count` tile maps of `width × height` tiles from a CSV file.
///
/// Returns a `Vec` indexed by layer number.
pub fn load_tiles_csv(
    path:        &Path,
    layer_count: usize,
    width:       u32,
    height:      u32,
) -> Result<Vec<TileMap>, GridError> {
    let file = std::fs::File::open(path).map_err(GridError::Io)?;
    load_tiles_reader(file, layer_count, width, height)
}

/// Like [`load_tiles_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding maps in a
/// binary.
pub fn load_tiles_reader<R: Read>(
    reader:      R,
    layer_count: usize,
    width:       u32,
    height:      u32,
) -> Result<Vec<TileMap>, GridError> {
    let mut maps: Vec<TileMap> = (0..layer_count).map(|_| TileMap::new(width, height)).collect();

    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize::<TileRecord>() {
        let row = result.map_err(|e| GridError::Parse(e.to_string()))?;
        let kind = parse_kind(&row.kind)?;
        let map = maps.get_mut(row.layer as usize).ok_or_else(|| {
            GridError::Parse(format!(
                "tile ({}, {}) names layer {} but only {layer_count} layers exist",
                row.x, row.y, row.layer
            ))
        })?;
        map.set(row.x, row.y, kind)?;
    }

    log::debug!("loaded {layer_count} tile layers of {width}x{height}");
    Ok(maps)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_kind(s: &str) -> Result<TileKind, GridError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "floor"    => Ok(TileKind::Floor),
        "wall"     => Ok(TileKind::Wall),
        "dropdown" => Ok(TileKind::Dropdown),
        other => Err(GridError::Parse(format!(
            "invalid tile kind {other:?}: expected \"floor\", \"wall\", or \"dropdown\""
        ))),
    }
}
