//! A bounded, write-once cache of chunk textures. Textures are generated on demand or
//! eagerly preloaded, single-threaded or with a pool of terrain workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use indexmap::IndexMap;
use indexmap::map::Entry;

use tracing::{debug, info, instrument, trace};

use crate::chunk::{calc_tile_pos, ChunkPos, ChunkTexture, WorldBounds};
use crate::terrain::TerrainCompositor;


/// Generate the texture of a chunk by resolving the terrain of each of its tiles.
pub fn generate_texture(compositor: &TerrainCompositor, pos: ChunkPos) -> ChunkTexture {
    ChunkTexture::from_fn(|tx, ty| compositor.resolve(calc_tile_pos(pos, tx, ty)))
}


/// The chunk cache owns the terrain compositor and every texture generated from it.
/// Only chunks inside the world bounds are ever generated and stored, so the cache size
/// can't exceed the number of chunks in bounds. There is no eviction, textures live as
/// long as the cache.
pub struct ChunkCache {
    /// Bounds of the world, chunks outside are void.
    bounds: WorldBounds,
    /// The terrain compositor used to generate new textures.
    compositor: TerrainCompositor,
    /// Generated textures, in generation order.
    chunks: IndexMap<ChunkPos, Arc<ChunkTexture>>,
    /// The texture returned for all chunks outside of bounds.
    void: Arc<ChunkTexture>,
    /// Internal statistics.
    stats: CacheStats,
}

/// Statistics about the use of a chunk cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of requests answered from already generated textures.
    pub hits: u64,
    /// Number of requests for chunks outside of the world bounds.
    pub void_hits: u64,
    /// Number of textures generated, this includes duplicated parallel builds.
    pub generated: u64,
    /// Total time spent generating textures, summed over all workers.
    pub generate_duration: Duration,
}

impl ChunkCache {

    /// Create a new empty cache.
    pub fn new(bounds: WorldBounds, compositor: TerrainCompositor) -> Self {
        Self {
            bounds,
            compositor,
            chunks: IndexMap::new(),
            void: Arc::new(ChunkTexture::new_void()),
            stats: CacheStats::default(),
        }
    }

    /// Create a new empty cache with the default terrain of the given world.
    pub fn for_world(bounds: WorldBounds) -> Self {
        Self::new(bounds, TerrainCompositor::for_world(&bounds))
    }

    #[inline]
    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    #[inline]
    pub fn compositor(&self) -> &TerrainCompositor {
        &self.compositor
    }

    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The shared texture used for chunks outside of bounds.
    #[inline]
    pub fn void_texture(&self) -> &Arc<ChunkTexture> {
        &self.void
    }

    /// Number of textures stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The maximum number of textures this cache can ever store.
    #[inline]
    pub fn capacity_bound(&self) -> usize {
        self.bounds.chunk_count()
    }

    /// Return true if the texture of this chunk is already generated.
    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Get an already generated texture, never generating it.
    #[inline]
    pub fn get(&self, pos: ChunkPos) -> Option<&Arc<ChunkTexture>> {
        self.chunks.get(&pos)
    }

    /// Iterate over all generated textures, in generation order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ChunkPos, &Arc<ChunkTexture>)> + '_ {
        self.chunks.iter().map(|(&pos, texture)| (pos, texture))
    }

    /// Get the texture of the given chunk, generating it if needed. Chunks outside of
    /// the world bounds all share the void texture and are never stored. The same
    /// texture instance is returned on each call for the same chunk.
    pub fn get_or_build(&mut self, pos: ChunkPos) -> Arc<ChunkTexture> {

        if !self.bounds.contains(pos) {
            self.stats.void_hits += 1;
            return Arc::clone(&self.void);
        }

        match self.chunks.entry(pos) {
            Entry::Occupied(o) => {
                self.stats.hits += 1;
                Arc::clone(o.get())
            }
            Entry::Vacant(v) => {

                let start = Instant::now();
                let texture = Arc::new(generate_texture(&self.compositor, pos));
                let duration = start.elapsed();

                self.stats.generated += 1;
                self.stats.generate_duration += duration;
                trace!("generated chunk {pos} in {duration:?}");

                Arc::clone(v.insert(texture))

            }
        }

    }

    /// Generate every chunk in the world bounds on the calling thread, row by row.
    /// Already generated chunks are kept.
    #[instrument(skip_all)]
    pub fn preload(&mut self) {

        let start = Instant::now();
        let before = self.chunks.len();

        for pos in self.bounds.range() {
            self.get_or_build(pos);
        }

        info!("preloaded {} chunks in {:?}", self.chunks.len() - before, start.elapsed());

    }

    /// Generate every chunk in the world bounds using the given number of terrain
    /// workers. Workers only generate textures, they are inserted by the calling thread
    /// which keeps the first texture received for each chunk. Zero workers is the same
    /// as [`Self::preload`].
    #[instrument(skip(self))]
    pub fn preload_parallel(&mut self, workers: usize) {

        if workers == 0 {
            self.preload();
            return;
        }

        let start = Instant::now();
        let before = self.chunks.len();

        let (request_sender, request_receiver) = unbounded::<ChunkPos>();
        // The bound on the reply channel blocks workers if the inserting thread can't
        // keep up, the request channel is fully filled before workers start.
        let (reply_sender, reply_receiver) = bounded::<(ChunkPos, Arc<ChunkTexture>)>(100 * workers);

        for pos in self.bounds.range() {
            if !self.chunks.contains_key(&pos) {
                request_sender.send(pos).expect("receiver should be alive");
            }
        }

        drop(request_sender);

        let generate_micros = AtomicU64::new(0);
        let generated = AtomicU64::new(0);

        let Self { compositor, chunks, .. } = self;
        let compositor = &*compositor;

        thread::scope(|scope| {

            for i in 0..workers {

                let request_receiver = request_receiver.clone();
                let reply_sender = reply_sender.clone();
                let generate_micros = &generate_micros;
                let generated = &generated;

                thread::Builder::new()
                    .name(format!("Chunk Terrain Worker #{i}"))
                    .spawn_scoped(scope, move || {
                        // Run while there are requests or until the inserting side stops.
                        while let Ok(pos) = request_receiver.recv() {
                            let start = Instant::now();
                            let texture = Arc::new(generate_texture(compositor, pos));
                            generate_micros.fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
                            generated.fetch_add(1, Ordering::Relaxed);
                            if reply_sender.send((pos, texture)).is_err() {
                                break;
                            }
                        }
                    })
                    .expect("failed to spawn terrain worker");

            }

            // Only workers hold senders now, the loop ends when all workers are done.
            drop(reply_sender);

            while let Ok((pos, texture)) = reply_receiver.recv() {
                if let Entry::Vacant(v) = chunks.entry(pos) {
                    v.insert(texture);
                } else {
                    debug!("dropping duplicated build of chunk {pos}");
                }
            }

        });

        self.stats.generated += generated.into_inner();
        self.stats.generate_duration += Duration::from_micros(generate_micros.into_inner());

        info!("preloaded {} chunks with {workers} workers in {:?}", self.chunks.len() - before, start.elapsed());

    }

}


#[cfg(test)]
mod tests {

    use glam::IVec2;

    use super::*;
    use crate::chunk::{Color, CHUNK_TILES};

    fn small_cache() -> ChunkCache {
        let bounds = WorldBounds::new(IVec2::new(0, 0), IVec2::new(2, 1)).unwrap();
        ChunkCache::new(bounds, TerrainCompositor::for_world(&WorldBounds::DEFAULT))
    }

    #[test]
    fn identity() {

        let mut cache = small_cache();
        let pos = IVec2::new(1, 1);

        let a = cache.get_or_build(pos);
        let b = cache.get_or_build(pos);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(pos));
        assert!(Arc::ptr_eq(cache.get(pos).unwrap(), &a));
        assert_eq!(cache.stats().generated, 1);
        assert_eq!(cache.stats().hits, 1);

    }

    #[test]
    fn texture_matches_compositor() {
        let mut cache = small_cache();
        let pos = IVec2::new(2, 0);
        let texture = cache.get_or_build(pos);
        for ty in (0..CHUNK_TILES).step_by(7) {
            for tx in (0..CHUNK_TILES).step_by(5) {
                let kind = cache.compositor().resolve(calc_tile_pos(pos, tx, ty));
                assert_eq!(texture.kind(tx, ty), Some(kind));
                assert_eq!(texture.color(tx, ty), kind.color());
            }
        }
    }

    #[test]
    fn out_of_bounds() {

        let mut cache = small_cache();

        for pos in [IVec2::new(-1, 0), IVec2::new(3, 0), IVec2::new(0, 2), IVec2::new(9999, 9999)] {
            let texture = cache.get_or_build(pos);
            assert!(texture.is_void());
            assert!(texture.pixels().iter().all(|&c| c == Color::VOID));
            assert!(Arc::ptr_eq(&texture, cache.void_texture()));
            assert!(!cache.contains(pos));
        }

        assert!(cache.is_empty());
        assert_eq!(cache.stats().void_hits, 4);
        assert_eq!(cache.stats().generated, 0);

    }

    #[test]
    fn preload() {

        let mut cache = small_cache();
        let first = cache.get_or_build(IVec2::new(1, 0));
        cache.preload();

        assert_eq!(cache.len(), cache.capacity_bound());
        assert_eq!(cache.len(), 6);
        assert_eq!(cache.stats().generated, 6);
        assert!(Arc::ptr_eq(&first, cache.get(IVec2::new(1, 0)).unwrap()));

        // Preloading again never generates anything.
        cache.preload();
        assert_eq!(cache.stats().generated, 6);
        assert!(cache.iter().all(|(pos, _)| cache.bounds().contains(pos)));

    }

    #[test]
    fn preload_parallel_matches_sequential() {

        let mut sequential = small_cache();
        sequential.preload();

        let mut parallel = small_cache();
        let first = parallel.get_or_build(IVec2::new(0, 1));
        parallel.preload_parallel(3);

        assert_eq!(parallel.len(), sequential.len());
        assert!(Arc::ptr_eq(&first, parallel.get(IVec2::new(0, 1)).unwrap()));
        for (pos, texture) in sequential.iter() {
            assert_eq!(**parallel.get(pos).unwrap(), **texture);
        }

    }

    #[test]
    fn preload_parallel_zero_workers() {
        let mut cache = small_cache();
        cache.preload_parallel(0);
        assert_eq!(cache.len(), cache.capacity_bound());
    }

    #[test]
    fn bounded_size() {
        let mut cache = small_cache();
        for x in -5..8 {
            for y in -5..8 {
                cache.get_or_build(IVec2::new(x, y));
                assert!(cache.len() <= cache.capacity_bound());
            }
        }
        assert_eq!(cache.len(), cache.capacity_bound());
    }

    #[test]
    fn default_world_scenario() {

        let mut cache = ChunkCache::for_world(WorldBounds::DEFAULT);

        let a = cache.get_or_build(IVec2::new(0, 0));
        let b = cache.get_or_build(IVec2::new(0, 0));
        assert_eq!(a.pixels().len(), 32 * 32);
        assert_eq!(*a, *b);
        assert!(Arc::ptr_eq(&a, &b));
        // The world corner is far in the ocean.
        assert_eq!(a.kind(0, 0), Some(crate::chunk::TerrainKind::Ocean));

        let void = cache.get_or_build(IVec2::new(9999, 9999));
        assert!(void.is_void());
        assert_eq!(cache.len(), 1);

    }

}
