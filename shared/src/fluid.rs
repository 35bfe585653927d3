//! Fluid background parameters
//!
//! The renderer reads coordinates and an intensity flag once per frame and
//! eases a small set of uniforms toward targets derived from them. Colors
//! are kept in linear RGB floats so the drawing layer can hand them straight
//! to its own color types.

use crate::coords::Coordinates;

const MOUSE_LERP: f32 = 0.1;
const COLOR_LERP: f32 = 0.05;
const DISTORTION_LERP: f32 = 0.1;
/// Extra distortion while a charge is running
const INTENSITY_BOOST: f32 = 0.6;

/// An (h, s, l) triple with every component in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn to_rgb(self) -> [f32; 3] {
        let Hsl { h, s, l } = self;
        if s <= 0.0 {
            return [l, l, l];
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

/// Linear remap of `v` from [a0, a1] to [b0, b1]
fn map_linear(v: f32, a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    b0 + (v - a0) * (b1 - b0) / (a1 - a0)
}

/// Target base and mood colors for a point on the tuning plane
///
/// Hue follows the weather axis in three bands (blue storm, cyan fog,
/// orange sun); saturation and lightness rise with mood.
pub fn target_colors(coords: Coordinates) -> (Hsl, Hsl) {
    let h = if coords.x < -0.3 {
        0.65
    } else if coords.x > 0.3 {
        0.1
    } else {
        0.55
    };
    let s = map_linear(coords.y, -1.0, 1.0, 0.2, 0.9);
    let l = map_linear(coords.y, -1.0, 1.0, 0.1, 0.6);

    let base = Hsl { h, s, l };
    let mood = Hsl {
        h: (h + 0.1) % 1.0,
        s: s * 0.8,
        l: l * 0.5,
    };
    (base, mood)
}

/// Smoothed per-frame shader inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidUniforms {
    /// Eased pointer position on the tuning plane
    pub mouse: [f32; 2],
    pub color_base: [f32; 3],
    pub color_mood: [f32; 3],
    pub distortion: f32,
    /// Background opacity; fades out while morphing
    pub opacity: f32,
}

impl Default for FluidUniforms {
    fn default() -> Self {
        Self {
            mouse: [0.0, 0.0],
            color_base: [0.102, 0.102, 0.102],
            color_mood: [0.165, 0.165, 0.165],
            distortion: 0.0,
            opacity: 1.0,
        }
    }
}

impl FluidUniforms {
    /// Ease every uniform one frame toward its target
    ///
    /// `intensity` is true while a charge is running; `visible` is false
    /// during the morph transition.
    pub fn step(&mut self, coords: Coordinates, intensity: bool, visible: bool) {
        self.mouse[0] = lerp(self.mouse[0], coords.x, MOUSE_LERP);
        self.mouse[1] = lerp(self.mouse[1], coords.y, MOUSE_LERP);

        let (base, mood) = target_colors(coords);
        self.color_base = lerp_rgb(self.color_base, base.to_rgb(), COLOR_LERP);
        self.color_mood = lerp_rgb(self.color_mood, mood.to_rgb(), COLOR_LERP);

        let boost = if intensity { INTENSITY_BOOST } else { 0.0 };
        let target = coords.magnitude() * 2.0 + boost;
        self.distortion = lerp(self.distortion, target, DISTORTION_LERP);

        let target_opacity = if visible { 1.0 } else { 0.0 };
        self.opacity = lerp(self.opacity, target_opacity, COLOR_LERP);
    }

    /// Mix of base and mood color for a fluid value (roughly -1..1)
    pub fn shade(&self, fluid: f32) -> [f32; 3] {
        lerp_rgb(self.color_base, self.color_mood, (fluid + 0.5).clamp(0.0, 1.0))
    }

    /// Pointer influence at a point in [0, 1]² uv space
    pub fn pointer_effect(&self, uv: [f32; 2]) -> f32 {
        let cx = self.mouse[0] * 0.5 + 0.5;
        let cy = self.mouse[1] * 0.5 + 0.5;
        let dist = ((uv[0] - cx).powi(2) + (uv[1] - cy).powi(2)).sqrt();
        smoothstep(0.5, 0.0, dist) * self.distortion
    }

    /// Fluid value at `uv` after `time` seconds: two drifting noise octaves
    /// plus the pointer's pull
    pub fn fluid_at(&self, uv: [f32; 2], time: f32) -> f32 {
        let n1 = simplex2(uv[0] * 3.0 + time * 0.1, uv[1] * 3.0 + time * 0.1);
        let n2 = simplex2(uv[0] * 6.0 - time * 0.15, uv[1] * 6.0 - time * 0.15);
        n1 * 0.5 + n2 * 0.2 + self.pointer_effect(uv)
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mod289(x: f32) -> f32 {
    x - (x / 289.0).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289((x * 34.0 + 1.0) * x)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// 2D simplex noise, roughly in [-1, 1]
pub fn simplex2(vx: f32, vy: f32) -> f32 {
    const C: [f32; 4] = [
        0.211_324_87,
        0.366_025_4,
        -0.577_350_26,
        0.024_390_243,
    ];

    // Skew to the simplex cell
    let s = (vx + vy) * C[1];
    let ix = (vx + s).floor();
    let iy = (vy + s).floor();
    let t = (ix + iy) * C[0];
    let x0 = vx - ix + t;
    let y0 = vy - iy + t;

    let (i1x, i1y) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };
    let corners = [
        (x0, y0),
        (x0 + C[0] - i1x, y0 + C[0] - i1y),
        (x0 + C[2], y0 + C[2]),
    ];

    let ix = mod289(ix);
    let iy = mod289(iy);
    let p = [
        permute(permute(iy) + ix),
        permute(permute(iy + i1y) + ix + i1x),
        permute(permute(iy + 1.0) + ix + 1.0),
    ];

    let mut total = 0.0;
    for k in 0..3 {
        let (cx, cy) = corners[k];
        let m = (0.5 - (cx * cx + cy * cy)).max(0.0);
        let m = m * m * m * m;

        let x = 2.0 * fract(p[k] * C[3]) - 1.0;
        let h = x.abs() - 0.5;
        let a0 = x - (x + 0.5).floor();
        let m = m * (1.792_842_9 - 0.853_734_7 * (a0 * a0 + h * h));

        total += m * (a0 * cx + h * cy);
    }
    130.0 * total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_hue_bands() {
        let (storm, _) = target_colors(Coordinates::new(-0.9, 0.0).unwrap());
        let (fog, _) = target_colors(Coordinates::ORIGIN);
        let (sun, _) = target_colors(Coordinates::new(0.9, 0.0).unwrap());
        assert_eq!(storm.h, 0.65);
        assert_eq!(fog.h, 0.55);
        assert_eq!(sun.h, 0.1);
    }

    #[test]
    fn test_mood_raises_saturation_and_lightness() {
        let (void, void_mood) = target_colors(Coordinates::new(0.0, -1.0).unwrap());
        let (manic, _) = target_colors(Coordinates::new(0.0, 1.0).unwrap());
        assert!((void.s - 0.2).abs() < 1e-6 && (void.l - 0.1).abs() < 1e-6);
        assert!((manic.s - 0.9).abs() < 1e-6 && (manic.l - 0.6).abs() < 1e-6);
        assert!((void_mood.l - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Hsl { h: 0.0, s: 1.0, l: 0.5 }.to_rgb();
        let grey = Hsl { h: 0.3, s: 0.0, l: 0.4 }.to_rgb();
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);
        assert_eq!(grey, [0.4, 0.4, 0.4]);
    }

    #[test]
    fn test_step_converges_toward_targets() {
        let mut u = FluidUniforms::default();
        let coords = Coordinates::new(0.8, 0.6).unwrap();
        for _ in 0..400 {
            u.step(coords, false, true);
        }
        assert!((u.mouse[0] - 0.8).abs() < 1e-3);
        assert!((u.distortion - 2.0).abs() < 1e-3);
        let (base, _) = target_colors(coords);
        let rgb = base.to_rgb();
        assert!((u.color_base[0] - rgb[0]).abs() < 1e-3);
    }

    #[test]
    fn test_simplex_is_bounded_and_zero_at_lattice_origin() {
        assert_eq!(simplex2(0.0, 0.0), 0.0);
        for i in 0..60 {
            for j in 0..60 {
                let v = simplex2(i as f32 * 0.173 - 3.0, j as f32 * 0.291 + 7.0);
                assert!(v.is_finite());
                assert!(v.abs() <= 1.2, "noise {} out of range", v);
            }
        }
        assert_eq!(simplex2(1.7, -2.3), simplex2(1.7, -2.3));
    }

    #[test]
    fn test_intensity_and_visibility() {
        let mut calm = FluidUniforms::default();
        let mut charged = FluidUniforms::default();
        for _ in 0..10 {
            calm.step(Coordinates::ORIGIN, false, false);
            charged.step(Coordinates::ORIGIN, true, true);
        }
        assert!(charged.distortion > calm.distortion);
        assert!(calm.opacity < charged.opacity);
    }
}
