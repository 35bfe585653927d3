//! Drawing module for Ether
//!
//! Handles rendering of the fluid background, the tuning cursor with its
//! charge ring, the morph transition and the static overlay text.

use std::f32::consts::{PI, TAU};

use nannou::prelude::*;

use crate::Model;

/// Cells across the window for the fluid field
const FLUID_COLUMNS: usize = 64;
/// Cursor ring radius in points
const CURSOR_RADIUS: f32 = 26.0;
/// Horizontal strips in the morph transition
const MORPH_BANDS: usize = 20;

/// Color palette
#[allow(dead_code)]
pub mod colors {
    use nannou::prelude::*;

    /// Deep background behind the fluid
    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 0,
        green: 0,
        blue: 0,
        standard: std::marker::PhantomData,
    };

    /// Primary text
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 240,
        green: 240,
        blue: 240,
        standard: std::marker::PhantomData,
    };

    /// Faint guide lines and secondary labels
    pub fn faint(alpha: f32) -> Rgba {
        rgba(1.0, 1.0, 1.0, alpha)
    }
}

/// Draw the fluid field as a grid of shaded cells
pub fn draw_fluid(draw: &Draw, rect: Rect, model: &Model) {
    let fluid = &model.fluid;
    if fluid.opacity < 0.01 {
        return;
    }

    let cell = rect.w() / FLUID_COLUMNS as f32;
    let rows = (rect.h() / cell).ceil() as usize;
    let time = if model.settings.reduced_motion {
        0.0
    } else {
        model.animation_time
    };

    for row in 0..rows {
        for col in 0..FLUID_COLUMNS {
            let cx = rect.left() + (col as f32 + 0.5) * cell;
            let cy = rect.bottom() + (row as f32 + 0.5) * cell;
            let uv = [
                (cx - rect.left()) / rect.w(),
                (cy - rect.bottom()) / rect.h(),
            ];

            let [r, g, b] = fluid.shade(fluid.fluid_at(uv, time));
            draw.rect()
                .x_y(cx, cy)
                // Slight overlap hides seams between cells
                .w_h(cell + 0.5, cell + 0.5)
                .color(rgba(r, g, b, fluid.opacity));
        }
    }
}

/// Draw the centre cross and tracking label
pub fn draw_grid_guide(draw: &Draw, rect: Rect) {
    let guide = colors::faint(0.1);

    draw.line()
        .start(pt2(rect.x(), rect.bottom()))
        .end(pt2(rect.x(), rect.top()))
        .weight(1.0)
        .color(guide);
    draw.line()
        .start(pt2(rect.left(), rect.y()))
        .end(pt2(rect.right(), rect.y()))
        .weight(1.0)
        .color(guide);

    draw.text("XY_POS_TRACKING")
        .x_y(rect.left() + 110.0, rect.top() - 30.0)
        .w(200.0)
        .left_justify()
        .font_size(11)
        .color(colors::faint(0.4));
}

/// Draw the four axis labels
pub fn draw_axis_labels(draw: &Draw, rect: Rect) {
    let labels = [
        ("MANIC", pt2(rect.x(), rect.top() - 56.0)),
        ("VOID", pt2(rect.x(), rect.bottom() + 56.0)),
        ("STORM", pt2(rect.left() + 80.0, rect.y())),
        ("SUN", pt2(rect.right() - 80.0, rect.y())),
    ];

    for (label, pos) in labels {
        draw.text(label)
            .xy(pos)
            .w(160.0)
            .font_size(20)
            .color(colors::faint(0.9));
    }
}

/// Draw the cursor ring, charge progress and hint
pub fn draw_cursor(draw: &Draw, model: &Model) {
    let c = model.cursor;
    let sub = model.machine.sub_state();
    let radius = if sub.pressing {
        CURSOR_RADIUS * 1.1
    } else {
        CURSOR_RADIUS
    };

    draw.ellipse()
        .xy(c)
        .radius(radius)
        .no_fill()
        .stroke(colors::faint(0.4))
        .stroke_weight(1.5);

    // Charge ring, clockwise from the top
    let progress = model.machine.charge_progress();
    if progress > 0.0 {
        let steps = 96;
        let drawn = ((steps as f32 * progress).ceil() as usize).max(1);
        let points = (0..=drawn).map(|i| {
            let t = (i as f32 / steps as f32).min(progress);
            let theta = PI / 2.0 - t * TAU;
            pt2(c.x + radius * theta.cos(), c.y + radius * theta.sin())
        });
        draw.polyline().weight(1.5).color(WHITE).points(points);
    }

    // Core
    draw.rect().xy(c).w_h(8.0, 8.0).color(WHITE);

    if sub.pressing {
        draw.text("INITIALIZING...")
            .xy(c + vec2(0.0, -radius - 30.0))
            .w(220.0)
            .font_size(10)
            .color(colors::TEXT_PRIMARY);
    }
}

/// Draw the morph transition: strips sweeping across a black field
pub fn draw_morph(draw: &Draw, rect: Rect, progress: f32, time: f32, reduced_motion: bool) {
    draw.rect().xy(rect.xy()).wh(rect.wh()).color(BLACK);

    if !reduced_motion {
        let band_h = rect.h() / MORPH_BANDS as f32;
        for i in 0..MORPH_BANDS {
            // Staggered start per band
            let delay = ((i * 7) % 5) as f32 * 0.08;
            let t = ((progress - delay) / (1.0 - delay)).clamp(0.0, 1.0);
            let (scale, alpha) = if t < 0.5 {
                (t * 2.0, t * 2.0)
            } else {
                (1.0 + (t - 0.5) * 2.0, 1.0 - (t - 0.5) * 2.0)
            };
            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            let w = rect.w() * scale;
            let x = rect.x() + dir * (w - rect.w()) / 2.0;
            let y = rect.top() - band_h * (i as f32 + 0.5);
            draw.rect()
                .x_y(x, y)
                .w_h(w, band_h)
                .color(colors::faint(0.05 * alpha));
        }
    }

    let pulse = if reduced_motion {
        1.0
    } else {
        0.5 + 0.5 * (time * TAU).sin().abs()
    };
    draw.text("MORPHING SEQUENCE...")
        .xy(rect.xy())
        .w(400.0)
        .font_size(12)
        .color(colors::faint(pulse));
}

/// Draw the branding and credits
pub fn draw_branding(draw: &Draw, rect: Rect, time: f32) {
    draw.text("[ETHER_V1.0]")
        .x_y(rect.left() + 90.0, rect.top() - 60.0)
        .w(160.0)
        .left_justify()
        .font_size(11)
        .color(colors::TEXT_PRIMARY);
    draw.line()
        .start(pt2(rect.left() + 24.0, rect.top() - 72.0))
        .end(pt2(rect.left() + 56.0, rect.top() - 72.0))
        .weight(1.0)
        .color(WHITE);

    draw.text("VISUAL SYNTHESIS\nGENERATIVE POETRY")
        .x_y(rect.right() - 100.0, rect.bottom() + 48.0)
        .w(180.0)
        .right_justify()
        .font_size(10)
        .color(colors::faint(0.6));

    let dot_alpha = 0.5 + 0.5 * (time * PI).sin();
    draw.ellipse()
        .x_y(rect.right() - 28.0, rect.bottom() + 24.0)
        .radius(4.0)
        .color(colors::faint(dot_alpha));
}
