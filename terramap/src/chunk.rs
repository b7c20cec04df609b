//! Chunk coordinates, world bounds and the immutable chunk textures produced from the
//! terrain compositor.

use std::iter::FusedIterator;

use glam::{DVec2, IVec2};


/// World-space size of a single tile.
pub const TILE_SIZE: f64 = 32.0;
/// Number of tiles along each side of a chunk.
pub const CHUNK_TILES: usize = 32;
/// World-space size of a chunk side.
pub const CHUNK_SIZE: f64 = TILE_SIZE * CHUNK_TILES as f64;
/// Number of tiles in a chunk.
pub const CHUNK_AREA: usize = CHUNK_TILES * CHUNK_TILES;

/// A chunk coordinate, the chunk covers world positions from `pos * CHUNK_SIZE`
/// (included) to `(pos + 1) * CHUNK_SIZE` (excluded).
pub type ChunkPos = IVec2;


/// Calculate the chunk position containing the given world position.
#[inline]
pub fn calc_chunk_pos(pos: DVec2) -> ChunkPos {
    (pos / CHUNK_SIZE).floor().as_ivec2()
}

/// Calculate the world-space origin (minimum corner) of a chunk.
#[inline]
pub fn calc_chunk_origin(pos: ChunkPos) -> DVec2 {
    pos.as_dvec2() * CHUNK_SIZE
}

/// Calculate the world position sampled for the given tile of a chunk.
#[inline]
pub fn calc_tile_pos(pos: ChunkPos, tx: usize, ty: usize) -> DVec2 {
    debug_assert!(tx < CHUNK_TILES && ty < CHUNK_TILES);
    calc_chunk_origin(pos) + DVec2::new(tx as f64, ty as f64) * TILE_SIZE
}

#[inline]
fn calc_index(tx: usize, ty: usize) -> usize {
    debug_assert!(tx < CHUNK_TILES && ty < CHUNK_TILES);
    ty * CHUNK_TILES + tx
}


/// Inclusive rectangle of chunk coordinates where terrain exists, chunks outside of it
/// are never generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldBounds {
    min: ChunkPos,
    max: ChunkPos,
}

impl WorldBounds {

    /// The default 101x101 chunks world.
    pub const DEFAULT: Self = Self {
        min: IVec2::new(0, 0),
        max: IVec2::new(100, 100),
    };

    /// Create new bounds, both `min` and `max` are included.
    pub fn new(min: ChunkPos, max: ChunkPos) -> Result<Self, BoundsError> {
        if min.x > max.x || min.y > max.y {
            return Err(BoundsError::Inverted { min, max });
        }
        let span = max.as_i64vec2() - min.as_i64vec2() + 1;
        if span.max_element() > i32::MAX as i64 {
            return Err(BoundsError::TooLarge { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> ChunkPos {
        self.min
    }

    #[inline]
    pub fn max(&self) -> ChunkPos {
        self.max
    }

    /// Return true if the chunk is inside these bounds.
    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }

    /// Size of the bounds in chunks along each axis.
    #[inline]
    pub fn size(&self) -> IVec2 {
        self.max - self.min + 1
    }

    /// Total number of chunks in these bounds.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        let size = self.size().as_i64vec2();
        (size.x * size.y) as usize
    }

    /// Iterate over all chunks of these bounds, row by row.
    #[inline]
    pub fn range(&self) -> ChunkRange {
        ChunkRange::new(self.min, self.max)
    }

    /// World-space size of the bounded area.
    #[inline]
    pub fn extent(&self) -> DVec2 {
        self.size().as_dvec2() * CHUNK_SIZE
    }

    /// World-space center of the bounded area.
    #[inline]
    pub fn center(&self) -> DVec2 {
        calc_chunk_origin(self.min) + self.extent() * 0.5
    }

}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error returned when constructing invalid world bounds.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("inverted world bounds, min {min} is greater than max {max}")]
    Inverted { min: ChunkPos, max: ChunkPos },
    #[error("world bounds from {min} to {max} are too large")]
    TooLarge { min: ChunkPos, max: ChunkPos },
}


/// Iterator of chunk coordinates, both start and end are inclusive. Chunks are returned
/// row by row, X varying first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRange {
    /// Cursor, wider than chunk coordinates so it can step past `i32::MAX`.
    cx: i64,
    cy: i64,
    start: ChunkPos,
    end: ChunkPos,
}

impl ChunkRange {

    /// Construct a chunk range iterator, note that both start and end are included in the
    /// range. The range is empty if start is greater than end on any axis.
    #[inline]
    pub fn new(start: ChunkPos, end: ChunkPos) -> Self {
        Self {
            cx: start.x as i64,
            cy: start.y as i64,
            start,
            end,
        }
    }

    /// An empty range.
    #[inline]
    pub fn empty() -> Self {
        Self::new(IVec2::ZERO, IVec2::NEG_ONE)
    }

    #[inline]
    pub fn start(&self) -> ChunkPos {
        self.start
    }

    #[inline]
    pub fn end(&self) -> ChunkPos {
        self.end
    }

    /// Return true if the whole range (not only the remaining items) contains the chunk.
    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        pos.cmpge(self.start).all() && pos.cmple(self.end).all()
    }

    /// Restrict this range to the given bounds, the iteration is restarted.
    pub fn intersect(&self, bounds: &WorldBounds) -> Self {
        Self::new(self.start.max(bounds.min()), self.end.min(bounds.max()))
    }

}

impl FusedIterator for ChunkRange {}
impl Iterator for ChunkRange {

    type Item = ChunkPos;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {

        if self.cx > self.end.x as i64 || self.cy > self.end.y as i64 {
            return None;
        }

        let ret = IVec2::new(self.cx as i32, self.cy as i32);

        self.cx += 1;
        if self.cx > self.end.x as i64 {
            self.cx = self.start.x as i64;
            self.cy += 1;
        }

        Some(ret)

    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cx > self.end.x as i64 || self.cy > self.end.y as i64 {
            return (0, Some(0));
        }
        let width = (self.end.x as i64 - self.start.x as i64 + 1) as usize;
        let full_rows = (self.end.y as i64 - self.cy) as usize;
        let current_row = (self.end.x as i64 - self.cx + 1) as usize;
        let len = full_rows.saturating_mul(width).saturating_add(current_row);
        (len, Some(len))
    }

}

impl ExactSizeIterator for ChunkRange {}


/// An RGBA color with 8 bits per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {

    pub const OCEAN: Self = Self::rgb(0, 50, 150);
    pub const LAKE: Self = Self::rgb(0, 0, 255);
    pub const GRASSLAND: Self = Self::rgb(0, 128, 0);
    pub const MOUNTAIN: Self = Self::rgb(128, 128, 128);
    /// Fill color of chunks outside of the world bounds.
    pub const VOID: Self = Self::rgb(100, 149, 237);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

}


/// Final classification of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    Ocean,
    Lake,
    Grassland,
    Mountain,
}

impl TerrainKind {

    pub const ALL: [Self; 4] = [Self::Ocean, Self::Lake, Self::Grassland, Self::Mountain];

    /// The display color of this terrain.
    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Self::Ocean => Color::OCEAN,
            Self::Lake => Color::LAKE,
            Self::Grassland => Color::GRASSLAND,
            Self::Mountain => Color::MOUNTAIN,
        }
    }

    /// Return true for water terrains.
    #[inline]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Ocean | Self::Lake)
    }

}


/// An immutable grid of `CHUNK_TILES x CHUNK_TILES` colors, one per tile. Generated
/// textures also keep the terrain kind of each tile, the void texture has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTexture {
    /// Color of each tile, row-major.
    pixels: Box<[Color; CHUNK_AREA]>,
    /// Terrain of each tile, row-major, absent for the void texture.
    kinds: Option<Box<[TerrainKind; CHUNK_AREA]>>,
}

impl ChunkTexture {

    /// Create a texture filled with the void color.
    pub fn new_void() -> Self {
        Self {
            pixels: Box::new([Color::VOID; CHUNK_AREA]),
            kinds: None,
        }
    }

    /// Create a texture by classifying each tile with the given function, called with
    /// tile coordinates in row-major order.
    pub fn from_fn(mut func: impl FnMut(usize, usize) -> TerrainKind) -> Self {

        let mut kinds = Box::new([TerrainKind::Grassland; CHUNK_AREA]);
        for ty in 0..CHUNK_TILES {
            for tx in 0..CHUNK_TILES {
                kinds[calc_index(tx, ty)] = func(tx, ty);
            }
        }

        let pixels = Box::new(std::array::from_fn(|i| kinds[i].color()));
        Self {
            pixels,
            kinds: Some(kinds),
        }

    }

    /// Return true if this is a void texture of an out of bounds chunk.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.kinds.is_none()
    }

    /// Get the color of a tile.
    /// Panics if the tile coordinate is not lower than [`CHUNK_TILES`].
    #[inline]
    pub fn color(&self, tx: usize, ty: usize) -> Color {
        self.pixels[calc_index(tx, ty)]
    }

    /// Get the terrain of a tile, none for void textures.
    /// Panics if the tile coordinate is not lower than [`CHUNK_TILES`].
    #[inline]
    pub fn kind(&self, tx: usize, ty: usize) -> Option<TerrainKind> {
        self.kinds.as_ref().map(|kinds| kinds[calc_index(tx, ty)])
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels[..]
    }

    /// Iterate over rows of pixels, from `ty = 0`.
    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.pixels.chunks_exact(CHUNK_TILES)
    }

    /// Count tiles of each terrain kind, indexed like [`TerrainKind::ALL`].
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        if let Some(kinds) = &self.kinds {
            for &kind in &kinds[..] {
                counts[kind as usize] += 1;
            }
        }
        counts
    }

    /// The most frequent terrain of this texture, none for void textures. Ties are
    /// resolved in [`TerrainKind::ALL`] order.
    pub fn dominant_kind(&self) -> Option<TerrainKind> {
        self.kinds.as_ref()?;
        let counts = self.histogram();
        let mut best = 0;
        for i in 1..counts.len() {
            if counts[i] > counts[best] {
                best = i;
            }
        }
        Some(TerrainKind::ALL[best])
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn chunk_range() {

        let r = |sx, sy, ex, ey| ChunkRange::new(IVec2::new(sx, sy), IVec2::new(ex, ey)).map(|p| (p.x, p.y)).collect::<Vec<_>>();

        assert_eq!(r(0, 0, 0, 0), [(0, 0)]);
        assert_eq!(r(0, 0, 1, 0), [(0, 0), (1, 0)]);
        assert_eq!(r(0, 0, 1, 1), [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(r(0, 0, -1, 0), []);
        assert_eq!(r(0, 0, 0, -1), []);
        assert_eq!(r(0, 0, -1, -1), []);
        assert_eq!(ChunkRange::empty().count(), 0);

    }

    #[test]
    fn chunk_range_len() {
        let mut range = ChunkRange::new(IVec2::new(-2, 3), IVec2::new(1, 5));
        assert_eq!(range.len(), 12);
        range.next();
        range.next();
        assert_eq!(range.len(), 10);
        assert_eq!(range.count(), 10);
    }

    #[test]
    fn chunk_range_intersect() {
        let bounds = WorldBounds::DEFAULT;
        let range = ChunkRange::new(IVec2::new(-3, 98), IVec2::new(2, 104)).intersect(&bounds);
        assert_eq!(range.start(), IVec2::new(0, 98));
        assert_eq!(range.end(), IVec2::new(2, 100));
        assert!(range.clone().all(|p| bounds.contains(p)));
        let outside = ChunkRange::new(IVec2::splat(200), IVec2::splat(210)).intersect(&bounds);
        assert_eq!(outside.count(), 0);
    }

    #[test]
    fn chunk_pos() {
        assert_eq!(calc_chunk_pos(DVec2::new(0.0, 0.0)), IVec2::new(0, 0));
        assert_eq!(calc_chunk_pos(DVec2::new(1023.9, 1024.0)), IVec2::new(0, 1));
        assert_eq!(calc_chunk_pos(DVec2::new(-0.1, -1024.0)), IVec2::new(-1, -1));
        assert_eq!(calc_chunk_origin(IVec2::new(2, -1)), DVec2::new(2048.0, -1024.0));
        assert_eq!(calc_tile_pos(IVec2::new(1, 0), 3, 31), DVec2::new(1024.0 + 96.0, 992.0));
    }

    #[test]
    fn bounds() {

        let bounds = WorldBounds::DEFAULT;
        assert_eq!(bounds.chunk_count(), 101 * 101);
        assert!(bounds.contains(IVec2::new(0, 0)));
        assert!(bounds.contains(IVec2::new(100, 100)));
        assert!(!bounds.contains(IVec2::new(101, 0)));
        assert!(!bounds.contains(IVec2::new(0, -1)));
        assert!(!bounds.contains(IVec2::new(9999, 9999)));
        assert_eq!(bounds.center(), DVec2::splat(101.0 * 32.0 * 32.0 * 0.5));
        assert_eq!(bounds.range().count(), bounds.chunk_count());

        assert!(matches!(WorldBounds::new(IVec2::new(1, 0), IVec2::new(0, 0)), Err(BoundsError::Inverted { .. })));
        let single = WorldBounds::new(IVec2::new(-4, 7), IVec2::new(-4, 7)).unwrap();
        assert_eq!(single.chunk_count(), 1);

    }

    #[test]
    fn extreme_bounds() {

        assert!(matches!(WorldBounds::new(IVec2::splat(i32::MIN), IVec2::splat(i32::MAX)), Err(BoundsError::TooLarge { .. })));
        assert!(matches!(WorldBounds::new(IVec2::new(-1, 0), IVec2::new(i32::MAX, 0)), Err(BoundsError::TooLarge { .. })));

        // The widest accepted span along an axis.
        let wide = WorldBounds::new(IVec2::new(0, 0), IVec2::new(i32::MAX - 1, 0)).unwrap();
        assert_eq!(wide.size(), IVec2::new(i32::MAX, 1));
        assert_eq!(wide.chunk_count(), i32::MAX as usize);

        // Bounds touching the coordinate limits still iterate to the end.
        let edge = WorldBounds::new(IVec2::new(i32::MAX - 1, i32::MAX - 1), IVec2::splat(i32::MAX)).unwrap();
        assert_eq!(edge.size(), IVec2::splat(2));
        let all = edge.range().collect::<Vec<_>>();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last(), Some(&IVec2::splat(i32::MAX)));

        let mut range = ChunkRange::new(IVec2::splat(i32::MAX), IVec2::splat(i32::MAX));
        assert_eq!(range.len(), 1);
        assert_eq!(range.next(), Some(IVec2::splat(i32::MAX)));
        assert_eq!(range.next(), None);
        assert_eq!(range.len(), 0);

    }

    #[test]
    fn texture() {

        let void = ChunkTexture::new_void();
        assert!(void.is_void());
        assert!(void.pixels().iter().all(|&c| c == Color::VOID));
        assert_eq!(void.kind(0, 0), None);
        assert_eq!(void.dominant_kind(), None);

        let tex = ChunkTexture::from_fn(|tx, ty| if tx < 8 && ty < 8 { TerrainKind::Lake } else { TerrainKind::Ocean });
        assert!(!tex.is_void());
        assert_eq!(tex.kind(7, 7), Some(TerrainKind::Lake));
        assert_eq!(tex.color(8, 0), Color::OCEAN);
        assert_eq!(tex.rows().count(), CHUNK_TILES);
        assert_eq!(tex.rows().nth(3).unwrap()[2], Color::LAKE);
        assert_eq!(tex.histogram(), [CHUNK_AREA - 64, 64, 0, 0]);
        assert_eq!(tex.dominant_kind(), Some(TerrainKind::Ocean));

    }

}
