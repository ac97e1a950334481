//! Security pattern: short random gaps cut into the seal border.
use crate::math_utils::{centered_segment, ellipse_point};
use crate::models::SecurityPatternConfig;
use crate::shapes::draw_line;
use crate::units::UnitScale;
use rand::Rng;
use std::f32::consts::TAU;
use tiny_skia::{BlendMode, Color, Paint, PixmapMut};
use tracing::debug;

/// One cached gap: where it sits on the border and which way it points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecurityPatternParam {
    /// Parametric angle on the ellipse, radians
    pub angle: f32,
    /// Stroke direction, radians
    pub line_angle: f32,
}

/// Base stroke direction for a gap at parametric angle `theta`.
pub fn pattern_base_angle(radius_x: f32, radius_y: f32, theta: f32) -> f32 {
    (radius_y * theta.cos()).atan2(radius_x * theta.sin())
}

/// Owns the random draw so redraws stay stable until a refresh.
#[derive(Debug, Default)]
pub struct SecurityPatternGenerator {
    params: Vec<SecurityPatternParam>,
}

impl SecurityPatternGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[SecurityPatternParam] {
        &self.params
    }

    /// Drop the cached draw; the next render regenerates it.
    pub fn invalidate(&mut self) {
        self.params.clear();
    }

    /// Replace the cache with a fresh draw of `config.count` gaps.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &SecurityPatternConfig,
        radius_x: f32,
        radius_y: f32,
    ) {
        let range = config.angle_range_degrees.to_radians();
        self.params = (0..config.count)
            .map(|_| {
                let angle = rng.gen::<f32>() * TAU;
                let base = pattern_base_angle(radius_x, radius_y, angle);
                let line_angle = base + (rng.gen::<f32>() - 0.5) * range;
                SecurityPatternParam { angle, line_angle }
            })
            .collect();
        debug!(count = self.params.len(), "regenerated security pattern");
    }

    fn is_stale(&self, config: &SecurityPatternConfig) -> bool {
        self.params.is_empty() || self.params.len() != config.count
    }

    /// Erase the cached gaps out of `mask`, regenerating first when asked to
    /// or when nothing valid is cached. Disabled patterns leave the cache alone.
    #[allow(clippy::too_many_arguments)]
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        mask: &mut PixmapMut,
        rng: &mut R,
        config: &SecurityPatternConfig,
        scale: UnitScale,
        center: (f32, f32),
        radius_x: f32,
        radius_y: f32,
        force_refresh: bool,
    ) {
        if !config.open_security_pattern {
            return;
        }
        if force_refresh || self.is_stale(config) {
            self.regenerate(rng, config, radius_x, radius_y);
        }

        let mut paint = Paint::default();
        paint.set_color(Color::WHITE);
        paint.blend_mode = BlendMode::DestinationOut;
        let width = scale.mm_to_px(config.width);
        let length = scale.mm_to_px(config.length);
        if width <= 0.0 || length <= 0.0 {
            return;
        }

        for param in &self.params {
            let anchor = ellipse_point(center, radius_x, radius_y, param.angle);
            let (from, to) = centered_segment(anchor, length, param.line_angle);
            draw_line(mask, from, to, width, &paint);
        }
    }
}
