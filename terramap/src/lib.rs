//! Layered procedural 2D world terrain, cached as fixed size chunk textures.
//!
//! The terrain of each tile is resolved by a [`terrain::TerrainCompositor`] asking the
//! ocean, lake, biome and mountain layers in this order. Textures of whole chunks are
//! generated from it and kept forever by a [`cache::ChunkCache`], bounded by the world
//! bounds. The [`view`] module selects which chunks a camera needs to display.

pub mod util;

pub mod chunk;
pub mod terrain;
pub mod cache;
pub mod view;
pub mod map;
