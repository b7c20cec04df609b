//! Mountain layer, draws the mountain ridges of the continent.
//!
//! Ridges only exist within a fade region around the world center whose border is
//! irregular. The main feature is a long S-shaped spine crossing the continent, a few
//! branch ridges are then added in their own sub-regions. Each ridge system gives a
//! ridge strength for a position and only the strongest one is kept, so ridges never
//! cancel each other. The strength is then textured with ridged noise, perturbed and
//! thresholded. Isolated peaks are finally scattered where the ridges are weak.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::chunk::{TerrainKind, WorldBounds};
use crate::util::noise::{self, DomainWarp, FbmParams};
use crate::util::math::band_blend;

use super::TerrainGenerator;


/// The main spine ridge, its centerline is a sine period along X, which gives the S
/// shape, displaced on Y by noise at two scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpineRidge {
    /// Start X of the centerline, relative to the world center.
    pub x_start: f64,
    /// End X of the centerline, relative to the world center.
    pub x_end: f64,
    /// Y offset of the centerline, relative to the world center.
    pub y_offset: f64,
    /// Amplitude of the S curve.
    pub curve_amplitude: f64,
    /// Large scale noise displacing the centerline: frequency and amplitude.
    pub bend_noise: (f64, f64),
    /// Small scale noise displacing the centerline: frequency and amplitude.
    pub jitter_noise: (f64, f64),
    /// Half width of the ridge.
    pub width: f64,
}

impl SpineRidge {

    /// Get the Y coordinate of the centerline at the given X, both relative to center.
    pub fn centerline(&self, x: f64) -> f64 {
        let span = self.x_end - self.x_start;
        let phase = (x - self.x_start) / span * TAU;
        let (bend_freq, bend_amp) = self.bend_noise;
        let (jitter_freq, jitter_amp) = self.jitter_noise;
        self.y_offset
            + phase.sin() * self.curve_amplitude
            + noise::perlin_signed(x * bend_freq, 17.5) * bend_amp
            + noise::perlin_signed(x * jitter_freq, 91.25) * jitter_amp
    }

    /// Distance to the centerline, the part beyond both ends is measured to the end.
    fn distance(&self, rel: DVec2) -> f64 {
        let x = rel.x.clamp(self.x_start, self.x_end);
        let dx = rel.x - x;
        let dy = rel.y - self.centerline(x);
        dx.hypot(dy)
    }

}


/// A secondary straight ridge, active only inside a rectangular region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchRidge {
    /// Start point of the ridge, relative to world center.
    pub start: DVec2,
    /// End point of the ridge, relative to world center.
    pub end: DVec2,
    /// Half width of the ridge.
    pub width: f64,
    /// Minimum corner of the active region, relative to world center.
    pub region_min: DVec2,
    /// Maximum corner of the active region, relative to world center.
    pub region_max: DVec2,
}

impl BranchRidge {

    #[inline]
    pub fn is_active(&self, rel: DVec2) -> bool {
        rel.cmpge(self.region_min).all() && rel.cmple(self.region_max).all()
    }

    /// Distance to the ridge segment.
    fn distance(&self, rel: DVec2) -> f64 {
        let seg = self.end - self.start;
        let len_sq = seg.length_squared();
        if len_sq <= 0.0 {
            return rel.distance(self.start);
        }
        let t = ((rel - self.start).dot(seg) / len_sq).clamp(0.0, 1.0);
        rel.distance(self.start + seg * t)
    }

}


/// Isolated peaks scattered outside of the main ridges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeaksConfig {
    pub noise: FbmParams,
    /// Offset applied to positions so that peaks are uncorrelated with ridge texture.
    pub offset: f64,
    /// Ridged noise value above which a peak is placed.
    pub threshold: f64,
    /// Peaks are only placed where the ridge composite is lower than this.
    pub max_composite: f64,
}


/// Configuration of the [`MountainGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct MountainConfig {
    /// World-space center of the mountain region.
    pub center: DVec2,
    /// Radius of the mountain region.
    pub fade_radius: f64,
    /// Half width of the smooth transition at the region border, in world units.
    pub fade_band: f64,
    /// Frequency of the noise making the region border irregular.
    pub fade_noise_frequency: f64,
    /// Amplitude of the border noise, relative to the radius.
    pub fade_noise_amplitude: f64,
    pub warp: DomainWarp,
    pub spine: SpineRidge,
    pub branches: Vec<BranchRidge>,
    /// Frequency of the noise varying ridge widths.
    pub width_noise_frequency: f64,
    /// Amplitude of the width noise, relative to ridge width.
    pub width_noise_amplitude: f64,
    /// Exponent applied to ridge strengths, higher is sharper.
    pub sharpness: f64,
    /// Ridged noise texturing peaks and valleys along the ridges.
    pub texture: FbmParams,
    /// Part of the ridge strength that is modulated by the texture.
    pub texture_weight: f64,
    /// Frequency of the noise perturbing the final threshold.
    pub threshold_noise_frequency: f64,
    /// Amplitude of the threshold perturbation.
    pub threshold_noise_amplitude: f64,
    pub threshold: f64,
    /// Half width of the smooth transition band around the threshold.
    pub band: f64,
    pub peaks: PeaksConfig,
}

impl MountainConfig {

    /// The default tuning of mountains, scaled to the given world.
    pub fn for_world(bounds: &WorldBounds) -> Self {
        let size = bounds.extent().min_element();
        let rel = |x: f64, y: f64| DVec2::new(x, y) * size;
        Self {
            center: bounds.center(),
            fade_radius: size * 0.27,
            fade_band: size * 0.04,
            fade_noise_frequency: 0.00004,
            fade_noise_amplitude: 0.15,
            warp: DomainWarp {
                frequency: 0.00004,
                amplitude: size * 0.015,
                offset: 9137.0,
            },
            spine: SpineRidge {
                x_start: size * -0.22,
                x_end: size * 0.22,
                y_offset: 0.0,
                curve_amplitude: size * 0.06,
                bend_noise: (0.00005, size * 0.02),
                jitter_noise: (0.0004, size * 0.004),
                width: size * 0.025,
            },
            branches: vec![
                BranchRidge {
                    start: rel(-0.12, 0.0),
                    end: rel(-0.20, 0.16),
                    width: size * 0.016,
                    region_min: rel(-0.26, -0.02),
                    region_max: rel(-0.06, 0.20),
                },
                BranchRidge {
                    start: rel(0.05, -0.02),
                    end: rel(0.12, -0.18),
                    width: size * 0.014,
                    region_min: rel(0.0, -0.22),
                    region_max: rel(0.18, 0.0),
                },
                BranchRidge {
                    start: rel(0.14, 0.04),
                    end: rel(0.24, 0.10),
                    width: size * 0.012,
                    region_min: rel(0.10, 0.0),
                    region_max: rel(0.27, 0.14),
                },
            ],
            width_noise_frequency: 0.0002,
            width_noise_amplitude: 0.4,
            sharpness: 1.6,
            texture: FbmParams::new(5, 0.0005, 2.0, 0.8),
            texture_weight: 0.45,
            threshold_noise_frequency: 0.0003,
            threshold_noise_amplitude: 0.08,
            threshold: 0.15,
            band: 0.25,
            peaks: PeaksConfig {
                noise: FbmParams::new(3, 0.0011, 2.1, 0.6),
                offset: 7777.0,
                threshold: 0.93,
                max_composite: 0.08,
            },
        }
    }

}


/// The mountain layer, always decides between mountain and grassland.
#[derive(Debug, Clone)]
pub struct MountainGenerator {
    config: MountainConfig,
}

impl MountainGenerator {

    pub fn new(config: MountainConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &MountainConfig {
        &self.config
    }

    /// Fade factor of the mountain region, 1 inside and 0 outside.
    pub fn fade(&self, pos: DVec2) -> f64 {
        let config = &self.config;
        let f = config.fade_noise_frequency;
        let radius = config.fade_radius * (1.0 + noise::perlin_signed(pos.x * f, pos.y * f) * config.fade_noise_amplitude);
        1.0 - band_blend(pos.distance(config.center), radius, config.fade_band)
    }

    /// Turn a distance to a ridge into a strength in `[0, 1]`.
    #[inline]
    fn strength(&self, distance: f64, width: f64) -> f64 {
        if width <= 0.0 {
            return 0.0;
        }
        (1.0 - distance / width).max(0.0).powf(self.config.sharpness)
    }

    /// The strongest ridge strength at the given warped position, before texturing.
    pub fn ridge_strength(&self, warped: DVec2) -> f64 {

        let config = &self.config;
        let rel = warped - config.center;

        let f = config.width_noise_frequency;
        let width_factor = 1.0 + noise::perlin_signed(warped.x * f, warped.y * f) * config.width_noise_amplitude;

        let mut strength = self.strength(config.spine.distance(rel), config.spine.width * width_factor);

        for branch in &config.branches {
            if branch.is_active(rel) {
                strength = strength.max(self.strength(branch.distance(rel), branch.width * width_factor));
            }
        }

        strength

    }

    /// The final ridge composite at the given position, textured and faded, but not yet
    /// perturbed by the threshold noise.
    pub fn composite(&self, pos: DVec2) -> f64 {
        let fade = self.fade(pos);
        if fade <= 0.0 {
            return 0.0;
        }
        self.textured(self.config.warp.apply(pos)) * fade
    }

    fn textured(&self, warped: DVec2) -> f64 {
        let config = &self.config;
        let texture = config.texture.ridged(warped);
        self.ridge_strength(warped) * ((1.0 - config.texture_weight) + config.texture_weight * texture)
    }

    fn is_peak(&self, pos: DVec2, composite: f64) -> bool {
        let peaks = &self.config.peaks;
        composite < peaks.max_composite && peaks.noise.ridged(pos + peaks.offset) > peaks.threshold
    }

}

impl TerrainGenerator for MountainGenerator {

    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind> {

        let config = &self.config;

        let fade = self.fade(pos);
        if fade <= 0.0 {
            return Some(TerrainKind::Grassland);
        }

        let warped = config.warp.apply(pos);
        let composite = self.textured(warped) * fade;

        let f = config.threshold_noise_frequency;
        let perturbed = composite + noise::perlin_signed(warped.x * f, warped.y * f) * config.threshold_noise_amplitude;

        if band_blend(perturbed, config.threshold, config.band) > 0.5 {
            return Some(TerrainKind::Mountain);
        }

        if self.is_peak(pos, composite) {
            return Some(TerrainKind::Mountain);
        }

        Some(TerrainKind::Grassland)

    }

}
