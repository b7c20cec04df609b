//! The world map, binding the chunk cache to a camera view.

use std::sync::Arc;

use glam::DVec2;

use tracing::trace;

use crate::cache::ChunkCache;
use crate::chunk::{calc_chunk_origin, ChunkPos, ChunkTexture, WorldBounds, CHUNK_SIZE};
use crate::terrain::TerrainCompositor;
use crate::view::Camera;


/// World-space placement of a chunk texture, for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkRect {
    /// Minimum corner of the chunk.
    pub origin: DVec2,
    /// Side length of the chunk.
    pub size: f64,
}

impl ChunkRect {

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.origin + self.size
    }

}

/// Get the world-space placement of a chunk.
#[inline]
pub fn chunk_rect(pos: ChunkPos) -> ChunkRect {
    ChunkRect {
        origin: calc_chunk_origin(pos),
        size: CHUNK_SIZE,
    }
}


/// A bounded world map, owning the texture cache of its chunks.
pub struct WorldMap {
    cache: ChunkCache,
}

impl WorldMap {

    /// Create a new world map with the default terrain for the given bounds, no chunk
    /// is generated until requested or preloaded.
    pub fn new(bounds: WorldBounds) -> Self {
        Self::with_compositor(bounds, TerrainCompositor::for_world(&bounds))
    }

    /// Create a new world map with a custom terrain compositor.
    pub fn with_compositor(bounds: WorldBounds, compositor: TerrainCompositor) -> Self {
        Self {
            cache: ChunkCache::new(bounds, compositor),
        }
    }

    #[inline]
    pub fn bounds(&self) -> &WorldBounds {
        self.cache.bounds()
    }

    #[inline]
    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    /// Get the texture of a chunk, see [`ChunkCache::get_or_build`].
    #[inline]
    pub fn chunk(&mut self, pos: ChunkPos) -> Arc<ChunkTexture> {
        self.cache.get_or_build(pos)
    }

    /// Generate all chunks of the map, the given number of workers is used if not zero.
    pub fn preload(&mut self, workers: usize) {
        self.cache.preload_parallel(workers);
    }

    /// Get the textures of every chunk visible by the camera through a viewport of the
    /// given size, generating missing ones. Chunks outside of the world are skipped.
    pub fn visible(&mut self, camera: &Camera, viewport: DVec2) -> Vec<(ChunkPos, Arc<ChunkTexture>)> {
        let range = camera.visible_chunks(viewport, self.cache.bounds());
        trace!("visible chunks from {} to {}", range.start(), range.end());
        range.map(|pos| (pos, self.cache.get_or_build(pos))).collect()
    }

}


#[cfg(test)]
mod tests {

    use glam::IVec2;

    use super::*;

    #[test]
    fn rect() {
        let rect = chunk_rect(IVec2::new(3, -2));
        assert_eq!(rect.origin, DVec2::new(3072.0, -2048.0));
        assert_eq!(rect.max(), DVec2::new(4096.0, -1024.0));
    }

    #[test]
    fn visible_are_cached() {

        let bounds = WorldBounds::new(IVec2::ZERO, IVec2::new(5, 5)).unwrap();
        let mut map = WorldMap::with_compositor(bounds, TerrainCompositor::default());
        let camera = Camera::new(DVec2::splat(500.0));

        let visible = map.visible(&camera, DVec2::new(800.0, 600.0));
        // Camera chunk is (0, 0) with a radius of 2, restricted to bounds.
        assert_eq!(visible.len(), 9);
        assert_eq!(map.cache().len(), 9);
        assert!(visible.iter().all(|(pos, texture)| bounds.contains(*pos) && !texture.is_void()));

        let again = map.visible(&camera, DVec2::new(800.0, 600.0));
        for ((_, a), (_, b)) in visible.iter().zip(&again) {
            assert!(Arc::ptr_eq(a, b));
        }
        assert_eq!(map.cache().stats().generated, 9);

        assert!(map.chunk(IVec2::new(-1, 0)).is_void());
        assert_eq!(map.cache().len(), 9);

    }

}
