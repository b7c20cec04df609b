//! Camera state and selection of the chunks visible through a viewport.

use glam::{DVec2, IVec2};

use crate::chunk::{calc_chunk_pos, ChunkRange, WorldBounds, CHUNK_SIZE};


/// Minimum zoom factor, also used to avoid divisions by zero.
pub const MIN_ZOOM: f64 = 0.01;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Default camera speed, in world units per second.
pub const CAMERA_SPEED: f64 = 500.0;
/// Speed multiplier applied when the fast movement is requested.
pub const CAMERA_FAST_FACTOR: f64 = 40.0;
/// Scroll units for a zoom change of 1.
pub const SCROLL_PER_ZOOM: f64 = 6000.0;

/// Maximum visible radius, in chunks, to keep chunk coordinates far from overflow.
const MAX_RADIUS: f64 = (1 << 20) as f64;


/// Clamp a zoom factor in the supported range, non finite zoom are reset to 1.
#[inline]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

/// Compute the range of chunks to display for a camera centered on `position` with the
/// given zoom and viewport size in screen pixels. The range contains the chunk of the
/// camera and, along each axis, `ceil(viewport / (2 * zoom * CHUNK_SIZE)) + 1` chunks on
/// each side to cover partially visible chunks. The range is then restricted to the
/// world bounds, so it may be empty.
pub fn visible_chunks(position: DVec2, zoom: f64, viewport: DVec2, bounds: &WorldBounds) -> ChunkRange {

    if !position.is_finite() {
        return ChunkRange::empty();
    }

    let zoom = clamp_zoom(zoom);
    let sanitize = |size: f64| if size.is_finite() { size.max(0.0) } else { 0.0 };
    let viewport = DVec2::new(sanitize(viewport.x), sanitize(viewport.y));

    let center = calc_chunk_pos(position);
    let radius = (viewport / (2.0 * zoom * CHUNK_SIZE)).ceil()
        .min(DVec2::splat(MAX_RADIUS))
        .as_ivec2() + IVec2::ONE;

    ChunkRange::new(center.saturating_sub(radius), center.saturating_add(radius)).intersect(bounds)

}


/// A camera looking at the world, its position is the world position displayed at the
/// center of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: DVec2,
    zoom: f64,
    speed: f64,
}

impl Camera {

    /// Create a camera at the given position with a zoom of 1.
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            zoom: 1.0,
            speed: CAMERA_SPEED,
        }
    }

    /// Change the base movement speed of this camera.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, clamped to the supported range.
    #[inline]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Move the camera in the given direction for `dt` seconds. The direction is not
    /// normalized, each component is expected in `[-1, 1]`.
    pub fn pan(&mut self, direction: DVec2, dt: f64, fast: bool) {
        let speed = if fast { self.speed * CAMERA_FAST_FACTOR } else { self.speed };
        self.position += direction * speed * dt;
    }

    /// Apply a scroll wheel delta to the zoom.
    pub fn zoom_by(&mut self, scroll_delta: f64) {
        if scroll_delta != 0.0 {
            self.set_zoom(self.zoom + scroll_delta / SCROLL_PER_ZOOM);
        }
    }

    /// Convert a world position to a screen position in a viewport of the given size.
    #[inline]
    pub fn world_to_screen(&self, world: DVec2, viewport: DVec2) -> DVec2 {
        (world - self.position) * self.zoom + viewport * 0.5
    }

    /// Convert a screen position in a viewport of the given size to a world position.
    #[inline]
    pub fn screen_to_world(&self, screen: DVec2, viewport: DVec2) -> DVec2 {
        (screen - viewport * 0.5) / self.zoom + self.position
    }

    /// Range of chunks visible through a viewport of the given size.
    #[inline]
    pub fn visible_chunks(&self, viewport: DVec2, bounds: &WorldBounds) -> ChunkRange {
        visible_chunks(self.position, self.zoom, viewport, bounds)
    }

}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec2::ZERO)
    }
}
