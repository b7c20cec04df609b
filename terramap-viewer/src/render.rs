//! Text rendering of chunk textures, one character per chunk.

use std::fmt::Write;
use std::sync::Arc;

use terramap::chunk::{ChunkPos, ChunkTexture, TerrainKind};


/// Character used for a chunk, given its dominant terrain.
pub fn chunk_char(texture: &ChunkTexture) -> char {
    match texture.dominant_kind() {
        None => ' ',
        Some(TerrainKind::Ocean) => '~',
        Some(TerrainKind::Lake) => 'o',
        Some(TerrainKind::Grassland) => '.',
        Some(TerrainKind::Mountain) => '^',
    }
}

/// Render the given chunks as a grid of characters, row by row. Chunks are expected in
/// the row-major order of a chunk range, missing cells are left blank.
pub fn render_overview(chunks: &[(ChunkPos, Arc<ChunkTexture>)]) -> String {

    let Some(min) = chunks.iter().map(|(pos, _)| *pos).reduce(|a, b| a.min(b)) else {
        return String::new();
    };
    let max = chunks.iter().map(|(pos, _)| *pos).fold(min, |a, b| a.max(b));

    let width = (max.x - min.x + 1) as usize;
    let height = (max.y - min.y + 1) as usize;
    let mut grid = vec![' '; width * height];

    for (pos, texture) in chunks {
        let rel = *pos - min;
        grid[rel.y as usize * width + rel.x as usize] = chunk_char(texture);
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in grid.chunks_exact(width) {
        out.extend(row);
        out.push('\n');
    }

    out

}

/// Summary of terrain proportions over all given chunks.
pub fn render_summary(chunks: &[(ChunkPos, Arc<ChunkTexture>)]) -> String {

    let mut counts = [0usize; 4];
    for (_, texture) in chunks {
        for (count, add) in counts.iter_mut().zip(texture.histogram()) {
            *count += add;
        }
    }

    let total = counts.iter().sum::<usize>().max(1) as f64;
    let mut out = String::new();
    for (kind, count) in TerrainKind::ALL.into_iter().zip(counts) {
        let _ = writeln!(out, "{kind:?}: {:.1}%", count as f64 / total * 100.0);
    }

    out

}
