//! # Block Catalog
//!
//! Maps each block type to the texture-atlas cell used by each of its six
//! faces. Loaded once at startup from a TOML file.
//!
//! Loading is deliberately forgiving: a missing or malformed catalog
//! leaves the catalog empty, which degrades to "no textured faces" during
//! meshing. The world keeps running; the defect is visual, logged, and
//! non-fatal.

use std::collections::HashMap;
use std::path::Path;

use basalt_procedural::BlockTag;
use serde::Deserialize;
use thiserror::Error;

use super::face::FaceDirection;

/// Errors raised while reading a block catalog file.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read block catalog {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file is not valid TOML (or has the wrong shape).
    #[error("failed to parse block catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `[[blocks]]` entry names a block this build does not know.
    #[error("unknown block id in catalog: {0}")]
    UnknownBlock(String),

    /// A face key is not one of up/down/north/east/south/west (or `all`).
    #[error("unknown face key `{face}` for block {block}")]
    UnknownFace {
        /// Block entry carrying the bad key.
        block: String,
        /// The unrecognized key.
        face: String,
    },
}

/// Dimensions of the texture atlas, in cells.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AtlasGrid {
    /// Cells per atlas row.
    pub columns: u16,
    /// Cell rows in the atlas.
    pub rows: u16,
}

impl Default for AtlasGrid {
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 16,
        }
    }
}

/// One cell of the texture atlas, addressed by row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasCell {
    /// Cell row, top to bottom.
    pub row: u16,
    /// Cell column, left to right.
    pub column: u16,
}

impl AtlasCell {
    /// UV rectangle of this cell within the atlas.
    #[must_use]
    pub fn uv_rect(self, grid: AtlasGrid) -> UvRect {
        let w = f32::from(grid.columns);
        let h = f32::from(grid.rows);
        UvRect {
            left: f32::from(self.column) / w,
            right: f32::from(self.column + 1) / w,
            top: f32::from(self.row) / h,
            bottom: f32::from(self.row + 1) / h,
        }
    }
}

/// Normalized texture-coordinate bounds of an atlas cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    /// Left edge (u at texture-left).
    pub left: f32,
    /// Right edge.
    pub right: f32,
    /// Top edge (v at texture-top).
    pub top: f32,
    /// Bottom edge.
    pub bottom: f32,
}

// Raw deserialization shapes for the TOML document.

#[derive(Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    atlas: AtlasGrid,
    #[serde(default)]
    blocks: Vec<BlockEntry>,
}

#[derive(Deserialize)]
struct BlockEntry {
    id: String,
    #[serde(default)]
    faces: HashMap<String, RawCell>,
}

#[derive(Deserialize, Clone, Copy)]
struct RawCell {
    row: u16,
    col: u16,
}

/// Per-block, per-face atlas cell registry.
///
/// Lookups return `None` for anything unregistered; the mesher skips such
/// faces rather than failing the chunk.
pub struct BlockCatalog {
    grid: AtlasGrid,
    cells: [[Option<AtlasCell>; 6]; 8],
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl BlockCatalog {
    /// A catalog with no registered cells.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            grid: AtlasGrid::default(),
            cells: [[None; 6]; 8],
        }
    }

    /// Loads a catalog file, degrading to an empty catalog on any failure.
    ///
    /// The failure is logged; it never propagates. Meshing against the
    /// empty catalog produces no face geometry for any block.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(
                    "block catalog unavailable ({err}); no faces will be textured"
                );
                Self::empty()
            }
        }
    }

    /// Fallible load, for callers that want the actual error.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the file cannot be read or parsed,
    /// or names unknown blocks or faces.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on malformed TOML, unknown block ids or
    /// unknown face keys.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDoc = toml::from_str(text)?;

        let mut catalog = Self {
            grid: doc.atlas,
            cells: [[None; 6]; 8],
        };

        for entry in &doc.blocks {
            let tag = BlockTag::from_id(&entry.id)
                .ok_or_else(|| CatalogError::UnknownBlock(entry.id.clone()))?;

            // `all` first, then specific faces override it.
            if let Some(cell) = entry.faces.get("all") {
                for face in FaceDirection::ALL {
                    catalog.register(tag, face, *cell);
                }
            }
            for (key, cell) in &entry.faces {
                if key == "all" {
                    continue;
                }
                let face = FaceDirection::from_key(key).ok_or_else(|| CatalogError::UnknownFace {
                    block: entry.id.clone(),
                    face: key.clone(),
                })?;
                catalog.register(tag, face, *cell);
            }
        }

        Ok(catalog)
    }

    fn register(&mut self, tag: BlockTag, face: FaceDirection, cell: RawCell) {
        self.cells[tag.index()][face.index()] = Some(AtlasCell {
            row: cell.row,
            column: cell.col,
        });
    }

    /// The atlas grid this catalog addresses into.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> AtlasGrid {
        self.grid
    }

    /// Atlas cell for a block face, if registered.
    #[inline]
    #[must_use]
    pub fn cell(&self, tag: BlockTag, face: FaceDirection) -> Option<AtlasCell> {
        self.cells[tag.index()][face.index()]
    }

    /// UV rectangle for a block face, if registered.
    #[inline]
    #[must_use]
    pub fn uv_rect(&self, tag: BlockTag, face: FaceDirection) -> Option<UvRect> {
        self.cell(tag, face).map(|cell| cell.uv_rect(self.grid))
    }

    /// Returns true when no cell is registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|faces| faces.iter().all(Option::is_none))
    }
}
