//! Perlin, fractal and ridged multifractal noise functions.
//!
//! All functions here are pure and stateless, they sample the classic improved Perlin
//! noise over the reference permutation table. Outputs are remapped to `[0, 1]` because
//! every threshold of the terrain generators is tuned against that range.

use glam::{DVec2, DVec3};


/// Reference permutation table of the improved Perlin noise.
const REFERENCE_PERMUTATIONS: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// The single shared Perlin generator, the table is fully computed at compile time.
static PERLIN: PerlinNoise = PerlinNoise::reference();


/// A 3D/2D Perlin noise generator.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// All permutations used by Perlin noise algorithm, duplicated to avoid wrapping.
    permutations: [u8; 512],
}

impl PerlinNoise {

    /// Create the Perlin noise generator using the reference permutation table.
    pub const fn reference() -> Self {
        let mut permutations = [0; 512];
        let mut i = 0;
        while i < 512 {
            permutations[i] = REFERENCE_PERMUTATIONS[i & 255];
            i += 1;
        }
        Self { permutations }
    }

    /// Get the raw noise value at given 3D coordinates, roughly in `[-1, 1]`.
    pub fn gen_3d_point(&self, pos: DVec3) -> f64 {

        let pos_floor = pos.floor();
        let pos = pos - pos_floor;
        let factor = pos * pos * pos * (pos * (pos * 6.0 - 15.0) + 10.0);

        let pos_int = pos_floor.as_ivec3();
        let x_index = (pos_int.x & 255) as usize;
        let y_index = (pos_int.y & 255) as usize;
        let z_index = (pos_int.z & 255) as usize;

        let p = &self.permutations;
        let a = p[x_index] as usize + y_index;
        let a0 = p[a] as usize + z_index;
        let a1 = p[a + 1] as usize + z_index;
        let b = p[x_index + 1] as usize + y_index;
        let b0 = p[b] as usize + z_index;
        let b1 = p[b + 1] as usize + z_index;

        lerp(factor.z,
            lerp(factor.y,
                lerp(factor.x,
                    grad(p[a0], pos),
                    grad(p[b0], pos - DVec3::new(1.0, 0.0, 0.0))),
                lerp(factor.x,
                    grad(p[a1], pos - DVec3::new(0.0, 1.0, 0.0)),
                    grad(p[b1], pos - DVec3::new(1.0, 1.0, 0.0)))),
            lerp(factor.y,
                lerp(factor.x,
                    grad(p[a0 + 1], pos - DVec3::new(0.0, 0.0, 1.0)),
                    grad(p[b0 + 1], pos - DVec3::new(1.0, 0.0, 1.0))),
                lerp(factor.x,
                    grad(p[a1 + 1], pos - DVec3::new(0.0, 1.0, 1.0)),
                    grad(p[b1 + 1], pos - DVec3::new(1.0, 1.0, 1.0)))))

    }

    /// Get the raw noise value at given 2D coordinates, sampled on the `z = 0` plane.
    #[inline]
    pub fn gen_2d_point(&self, pos: DVec2) -> f64 {
        self.gen_3d_point(pos.extend(0.0))
    }

}

#[inline]
fn lerp(factor: f64, from: f64, to: f64) -> f64 {
    from + factor * (to - from)
}

#[inline]
fn grad(value: u8, pos: DVec3) -> f64 {
    let value = value & 15;
    let a = if value < 8 { pos.x } else { pos.y };
    let b = if value < 4 { pos.y } else if value != 12 && value != 14 { pos.z } else { pos.x };
    (if value & 1 == 0 { a } else { -a }) + (if value & 2 == 0 { b } else { -b })
}


/// Perlin noise at the given point, normalized to `[0, 1]`.
#[inline]
pub fn perlin(x: f64, y: f64) -> f64 {
    ((PERLIN.gen_2d_point(DVec2::new(x, y)) + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Perlin noise remapped to `[-1, 1]`, this is the shape used for domain warping and
/// additive perturbations.
#[inline]
pub fn perlin_signed(x: f64, y: f64) -> f64 {
    perlin(x, y) * 2.0 - 1.0
}

/// Fractal Brownian motion: sum of `octaves` Perlin samples with frequency multiplied by
/// `lacunarity` and amplitude by `gain` for each octave. The sum is normalized by the
/// total amplitude so the result stays in `[0, 1]`.
pub fn fbm(x: f64, y: f64, octaves: u32, base_frequency: f64, lacunarity: f64, gain: f64) -> f64 {

    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut freq = base_frequency;
    let mut amp = 1.0;

    for _ in 0..octaves {
        sum += perlin(x * freq, y * freq) * amp;
        norm += amp;
        freq *= lacunarity;
        amp *= gain;
    }

    if norm > 0.0 { sum / norm } else { 0.0 }

}

/// Ridged multifractal noise: each octave contributes `(1 - |n|)²` where `n` is the
/// signed Perlin sample, which turns the zero crossings of the noise into sharp ridges.
/// Normalized by the total amplitude, the result is in `[0, 1]`.
pub fn ridged_multifractal(x: f64, y: f64, octaves: u32, base_frequency: f64, lacunarity: f64, gain: f64) -> f64 {

    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut freq = base_frequency;
    let mut amp = 1.0;

    for _ in 0..octaves {
        let signal = 1.0 - perlin_signed(x * freq, y * freq).abs();
        sum += signal * signal * amp;
        norm += amp;
        freq *= lacunarity;
        amp *= gain;
    }

    if norm > 0.0 { sum / norm } else { 0.0 }

}


/// Parameters shared by fractal noise functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FbmParams {
    pub octaves: u32,
    pub frequency: f64,
    pub lacunarity: f64,
    pub gain: f64,
}

impl FbmParams {

    #[inline]
    pub const fn new(octaves: u32, frequency: f64, lacunarity: f64, gain: f64) -> Self {
        Self { octaves, frequency, lacunarity, gain }
    }

    /// Sample [`fbm`] with these parameters.
    #[inline]
    pub fn fbm(&self, pos: DVec2) -> f64 {
        fbm(pos.x, pos.y, self.octaves, self.frequency, self.lacunarity, self.gain)
    }

    /// Sample [`ridged_multifractal`] with these parameters.
    #[inline]
    pub fn ridged(&self, pos: DVec2) -> f64 {
        ridged_multifractal(pos.x, pos.y, self.octaves, self.frequency, self.lacunarity, self.gain)
    }

}


/// Domain warping parameters: the position is displaced by two independent Perlin
/// fields, the second one being sampled with an offset to decorrelate both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainWarp {
    /// Frequency of both warp fields.
    pub frequency: f64,
    /// Maximum displacement, in world units.
    pub amplitude: f64,
    /// Offset added to the position before sampling the Y warp field.
    pub offset: f64,
}

impl DomainWarp {

    /// Return the warped position.
    #[inline]
    pub fn apply(&self, pos: DVec2) -> DVec2 {
        let f = self.frequency;
        let warp_x = perlin_signed(pos.x * f, pos.y * f);
        let warp_y = perlin_signed((pos.x + self.offset) * f, (pos.y + self.offset) * f);
        pos + DVec2::new(warp_x, warp_y) * self.amplitude
    }

}
