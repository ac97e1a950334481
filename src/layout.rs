//! Placement of seal characters along an arc or a straight baseline.
//!
//! Layout is pure geometry: it turns a character count (plus measured
//! advances for width-based spacing) into per-character positions and
//! rotations. Drawing happens in the renderer.
use crate::math_utils::ellipse_point;
use euclid::default::Point2D;
use std::f32::consts::FRAC_PI_2;

/// How characters share the available span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutStrategy {
    /// Every character gets the same slot regardless of its width.
    /// On a straight baseline the slots are equal-width cells.
    EqualAngle,
    /// Slots follow measured advances plus a fixed gap, centred on the midpoint.
    EqualWidth { letter_spacing: f32 },
}

/// Walking direction along an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    /// Increasing angle: text across the top, glyph tops facing outwards.
    Clockwise,
    /// Decreasing angle: text across the bottom, readable left to right.
    CounterClockwise,
}

/// Baseline the text follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPath {
    Arc {
        center: Point2D<f32>,
        radius_x: f32,
        radius_y: f32,
        /// Angle (radians) of the span's midpoint
        mid_angle: f32,
        /// Total angle (radians) available to the text
        span: f32,
        direction: ArcDirection,
    },
    Line {
        center: Point2D<f32>,
        /// Total width available to `EqualAngle` cells
        span: f32,
    },
}

/// Where one character lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub position: Point2D<f32>,
    /// Rotation in radians applied around `position`
    pub rotation: f32,
    /// Parametric arc angle, or x offset from the line centre
    pub slot: f32,
}

/// First slot boundary of an arc span, in walking order.
pub fn arc_start(mid_angle: f32, span: f32, direction: ArcDirection) -> f32 {
    match direction {
        ArcDirection::Clockwise => mid_angle - span / 2.0,
        ArcDirection::CounterClockwise => mid_angle + span / 2.0,
    }
}

/// Slot centres as signed offsets from the span midpoint.
fn slot_offsets(count: usize, span: f32, strategy: LayoutStrategy, advances: &[f32]) -> Vec<f32> {
    match strategy {
        LayoutStrategy::EqualAngle => {
            let per_char = span / count as f32;
            (0..count)
                .map(|i| per_char * (i as f32 + 0.5) - span / 2.0)
                .collect()
        }
        LayoutStrategy::EqualWidth { letter_spacing } => {
            let width = |i: usize| advances.get(i).copied().unwrap_or(0.0);
            let total: f32 =
                (0..count).map(width).sum::<f32>() + letter_spacing * count.saturating_sub(1) as f32;
            let mut cursor = -total / 2.0;
            (0..count)
                .map(|i| {
                    let centre = cursor + width(i) / 2.0;
                    cursor += width(i) + letter_spacing;
                    centre
                })
                .collect()
        }
    }
}

/// Lay out `text` along `path`.
///
/// `advances` holds each character's measured width in pixels and is only
/// read by [`LayoutStrategy::EqualWidth`]. On an arc those widths are
/// converted to angles through the mean radius.
pub fn layout_text(
    text: &str,
    path: &TextPath,
    strategy: LayoutStrategy,
    advances: &[f32],
) -> Vec<GlyphPlacement> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    match *path {
        TextPath::Arc {
            center,
            radius_x,
            radius_y,
            mid_angle,
            span,
            direction,
        } => {
            let offsets = match strategy {
                LayoutStrategy::EqualAngle => slot_offsets(chars.len(), span, strategy, advances),
                LayoutStrategy::EqualWidth { letter_spacing } => {
                    let mean_radius = ((radius_x + radius_y) / 2.0).max(f32::EPSILON);
                    let angular: Vec<f32> = advances.iter().map(|w| w / mean_radius).collect();
                    let spacing = letter_spacing / mean_radius;
                    slot_offsets(
                        chars.len(),
                        span,
                        LayoutStrategy::EqualWidth {
                            letter_spacing: spacing,
                        },
                        &angular,
                    )
                }
            };
            chars
                .iter()
                .zip(offsets)
                .map(|(&ch, offset)| {
                    let (angle, rotation) = match direction {
                        ArcDirection::Clockwise => {
                            let angle = mid_angle + offset;
                            (angle, angle + FRAC_PI_2)
                        }
                        ArcDirection::CounterClockwise => {
                            let angle = mid_angle - offset;
                            (angle, angle - FRAC_PI_2)
                        }
                    };
                    let (x, y) = ellipse_point((center.x, center.y), radius_x, radius_y, angle);
                    GlyphPlacement {
                        ch,
                        position: Point2D::new(x, y),
                        rotation,
                        slot: angle,
                    }
                })
                .collect()
        }
        TextPath::Line { center, span } => slot_offsets(chars.len(), span, strategy, advances)
            .into_iter()
            .zip(chars)
            .map(|(offset, ch)| GlyphPlacement {
                ch,
                position: Point2D::new(center.x + offset, center.y),
                rotation: 0.0,
                slot: offset,
            })
            .collect(),
    }
}
