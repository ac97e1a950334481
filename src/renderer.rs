use crate::aging::{AgingFrame, AgingProcessor};
use crate::color_utils::{to_skia_color, InkMatcher};
use crate::error::{Result, StampError};
use crate::font_utils::{draw_text_run, measure_advances, FontBook, TextBaseline, TextStyle};
use crate::layout::{layout_text, ArcDirection, LayoutStrategy, TextPath};
use crate::models::{StampConfig, ViewBox};
use crate::ruler::draw_rulers;
use crate::security::SecurityPatternGenerator;
use crate::shapes::{draw_ellipse_stroke, draw_star, solid_paint};
use crate::units::UnitScale;
use crate::utils::{calculate_seal_region, save_png_with_quality};
use euclid::default::Point2D;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;
use tiny_skia::{
    BlendMode, Color, FilterQuality, Mask, PathBuilder, Pixmap, PixmapMut, PixmapPaint, Rect,
    Transform,
};
use tracing::{debug, trace, warn};

/// Default canvas size in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 500;
/// Vertical stretch applied to tax-number glyphs.
const TAX_NUMBER_STRETCH: f32 = 1.35;
/// Margin on each side of an exported image, as a fraction of its size.
pub const EXPORT_MARGIN_RATIO: f32 = 0.01;
/// Extra mm added around the seal when cutting the export region.
const EXPORT_PADDING_MM: f32 = 2.0;

/// Progress of the render pipeline; a failed render stops on the failing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Idle,
    BackgroundCleared,
    ShapesDrawn,
    TextDrawn,
    PatternApplied,
    MaskComposited,
    AgingApplied,
    Done,
}

/// Per-call switches for [`SealRenderer::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub refresh_security_pattern: bool,
    pub refresh_aging: bool,
    /// Draw the ruler overlay when the config enables it.
    pub draw_ruler: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            refresh_security_pattern: false,
            refresh_aging: false,
            draw_ruler: true,
        }
    }
}

/// Seal geometry resolved to pixels for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SealGeometry {
    pub center: (f32, f32),
    /// Radii of the border's centre line
    pub radius_x: f32,
    pub radius_y: f32,
    pub border_width: f32,
}

/// Draws seals onto an owned raster surface.
///
/// The renderer owns the random draws behind the security pattern and the
/// aging effect, so repeated renders are pixel-identical until a refresh is
/// requested. It is meant for use from a single thread.
pub struct SealRenderer {
    config: StampConfig,
    scale: UnitScale,
    surface: Pixmap,
    seal_layer: Pixmap,
    mask: Pixmap,
    fonts: FontBook,
    rng: StdRng,
    security: SecurityPatternGenerator,
    aging: AgingProcessor,
    offset_mm: (f32, f32),
    stage: RenderStage,
}

fn allocate(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(StampError::SurfaceAllocation { width, height })
}

impl SealRenderer {
    /// Create a renderer with a `width` x `height` surface and system fonts.
    pub fn new(width: u32, height: u32, scale: UnitScale) -> Result<Self> {
        Self::with_fonts(width, height, scale, FontBook::with_system_fonts())
    }

    pub fn with_fonts(width: u32, height: u32, scale: UnitScale, fonts: FontBook) -> Result<Self> {
        if fonts.is_empty() {
            warn!("no fonts available, seal text will not be drawn");
        }
        Ok(Self {
            config: StampConfig::default(),
            scale,
            surface: allocate(width, height)?,
            seal_layer: allocate(width, height)?,
            mask: allocate(width, height)?,
            fonts,
            rng: StdRng::from_entropy(),
            security: SecurityPatternGenerator::new(),
            aging: AgingProcessor::new(),
            offset_mm: (0.0, 0.0),
            stage: RenderStage::Idle,
        })
    }

    /// Make every random draw reproducible from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    pub fn scale(&self) -> UnitScale {
        self.scale
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    /// Tinted seal on a transparent background, without ruler.
    pub fn seal_layer(&self) -> &Pixmap {
        &self.seal_layer
    }

    pub fn stage(&self) -> RenderStage {
        self.stage
    }

    pub fn security_pattern(&self) -> &SecurityPatternGenerator {
        &self.security
    }

    pub fn aging(&self) -> &AgingProcessor {
        &self.aging
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset_mm
    }

    /// Validate and replace the rendering parameters. Does not render.
    pub fn configure(&mut self, config: StampConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Move the seal centre by (`dx_mm`, `dy_mm`) from the canvas centre.
    pub fn set_offset(&mut self, dx_mm: f32, dy_mm: f32) {
        self.offset_mm = (dx_mm, dy_mm);
    }

    pub fn geometry(&self) -> SealGeometry {
        let cfg = &self.config;
        let scale = self.scale;
        SealGeometry {
            center: (
                self.surface.width() as f32 / 2.0 + scale.mm_to_px(self.offset_mm.0),
                self.surface.height() as f32 / 2.0 + scale.mm_to_px(self.offset_mm.1),
            ),
            radius_x: scale.mm_to_px((cfg.width - cfg.border_width) / 2.0),
            radius_y: scale.mm_to_px((cfg.height - cfg.border_width) / 2.0),
            border_width: scale.mm_to_px(cfg.border_width),
        }
    }

    fn aging_frame(&self, geometry: &SealGeometry) -> AgingFrame {
        AgingFrame {
            width: self.seal_layer.width(),
            height: self.seal_layer.height(),
            center: geometry.center,
            radius: self
                .scale
                .mm_to_px(self.config.width.max(self.config.height) / 2.0),
        }
    }

    /// Run the full pipeline onto the visible surface.
    pub fn render(&mut self, options: RenderOptions) -> Result<()> {
        self.stage = RenderStage::Idle;
        let refresh_pattern = options.refresh_security_pattern || self.config.refresh_security_pattern;
        let refresh_aging = options.refresh_aging || self.config.refresh_old;
        let tint = to_skia_color(&self.config.primary_color)?;
        let background = to_skia_color(&self.config.background_color)?;
        let geometry = self.geometry();

        self.surface.fill(background);
        self.advance(RenderStage::BackgroundCleared);

        self.mask.fill(Color::TRANSPARENT);
        let mut mask = self.mask.as_mut();
        draw_shapes(&mut mask, &self.config, self.scale, &geometry);
        self.advance(RenderStage::ShapesDrawn);

        let mut mask = self.mask.as_mut();
        draw_texts(&mut mask, &self.fonts, &self.config, self.scale, &geometry);
        self.advance(RenderStage::TextDrawn);

        let mut mask = self.mask.as_mut();
        self.security.apply(
            &mut mask,
            &mut self.rng,
            &self.config.security_pattern,
            self.scale,
            geometry.center,
            geometry.radius_x,
            geometry.radius_y,
            refresh_pattern,
        );
        self.advance(RenderStage::PatternApplied);

        self.seal_layer.fill(tint);
        self.seal_layer.draw_pixmap(
            0,
            0,
            self.mask.as_ref(),
            &PixmapPaint {
                blend_mode: BlendMode::DestinationIn,
                ..PixmapPaint::default()
            },
            Transform::identity(),
            None,
        );
        self.advance(RenderStage::MaskComposited);

        if self.config.aging.apply_aging {
            let frame = self.aging_frame(&geometry);
            let ink = InkMatcher::from_color_str(&self.config.primary_color)?;
            self.aging.apply(
                &mut self.rng,
                self.seal_layer.data_mut(),
                frame,
                ink,
                self.config.aging.intensity,
                refresh_aging,
            );
            self.advance(RenderStage::AgingApplied);
        }

        self.surface.draw_pixmap(
            0,
            0,
            self.seal_layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        if options.draw_ruler {
            let mut surface = self.surface.as_mut();
            draw_rulers(&mut surface, &self.fonts, &self.config.ruler, self.scale);
        }

        self.config.refresh_security_pattern = false;
        self.config.refresh_old = false;
        self.advance(RenderStage::Done);
        Ok(())
    }

    fn advance(&mut self, stage: RenderStage) {
        trace!(?stage, "render stage");
        self.stage = stage;
    }

    /// Square region of the surface holding the seal, in pixels.
    pub fn seal_region(&self) -> ViewBox {
        calculate_seal_region(
            &self.config,
            self.scale,
            (self.surface.width(), self.surface.height()),
            self.offset_mm,
            EXPORT_PADDING_MM,
        )
    }

    /// Resample the seal into an `output_size` square with a transparent
    /// margin of 1% on every side. Live render state is left untouched.
    pub fn export(&self, output_size: u32) -> Result<Pixmap> {
        self.export_with_background(output_size, None)
    }

    /// Like [`export`](Self::export), but fills the whole output with
    /// `background` first when one is given.
    pub fn export_with_background(
        &self,
        output_size: u32,
        background: Option<Color>,
    ) -> Result<Pixmap> {
        let mut output = allocate(output_size, output_size)?;
        if let Some(color) = background {
            output.fill(color);
        }
        let region = self.seal_region();
        let size = output_size as f32;
        let margin = size * EXPORT_MARGIN_RATIO;
        let draw_size = size - 2.0 * margin;
        let k = draw_size / region.width;

        let inner = Rect::from_xywh(margin, margin, draw_size, draw_size)
            .ok_or_else(|| StampError::Render(format!("export size {output_size} is too small")))?;
        let mut clip = Mask::new(output_size, output_size)
            .ok_or(StampError::SurfaceAllocation {
                width: output_size,
                height: output_size,
            })?;
        clip.fill_path(
            &PathBuilder::from_rect(inner),
            tiny_skia::FillRule::Winding,
            false,
            Transform::identity(),
        );

        let transform = Transform::from_row(
            k,
            0.0,
            0.0,
            k,
            margin - region.min_x * k,
            margin - region.min_y * k,
        );
        output.draw_pixmap(
            0,
            0,
            self.seal_layer.as_ref(),
            &PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            },
            transform,
            Some(&clip),
        );
        debug!(output_size, ?region, "exported seal");
        Ok(output)
    }

    /// Export and write a PNG file, on the configured background colour when
    /// `opaque` is set.
    pub fn export_png(&self, output_size: u32, path: &Path, opaque: bool) -> Result<()> {
        let background = if opaque {
            Some(to_skia_color(&self.config.background_color)?)
        } else {
            None
        };
        let output = self.export_with_background(output_size, background)?;
        save_png_with_quality(&output, path, 90)
    }

    /// Write the whole visible surface, ruler included, as a PNG file.
    pub fn save_surface_png(&self, path: &Path) -> Result<()> {
        save_png_with_quality(&self.surface, path, 90)
    }
}

/// Border and optional star, in white, onto the mask.
fn draw_shapes(mask: &mut PixmapMut, config: &StampConfig, scale: UnitScale, geometry: &SealGeometry) {
    let white = solid_paint(Color::WHITE, true);
    draw_ellipse_stroke(
        mask,
        geometry.center,
        geometry.radius_x,
        geometry.radius_y,
        geometry.border_width,
        &white,
    );

    let star = &config.draw_star;
    if star.draw_star {
        let center = (
            geometry.center.0,
            geometry.center.1 + scale.mm_to_px(star.star_position_y),
        );
        draw_star(mask, center, scale.mm_to_px(star.star_diameter / 2.0), &white);
    }

    if config.inner_circle.show_inner_circle {
        let inset = 2.0 * geometry.border_width;
        draw_ellipse_stroke(
            mask,
            geometry.center,
            geometry.radius_x - inset,
            geometry.radius_y - inset,
            geometry.border_width / 2.0,
            &white,
        );
    }
}

/// Company name, stamp type, code and tax number, in white, onto the mask.
fn draw_texts(
    mask: &mut PixmapMut,
    fonts: &FontBook,
    config: &StampConfig,
    scale: UnitScale,
    geometry: &SealGeometry,
) {
    let white = solid_paint(Color::WHITE, true);
    let center = Point2D::new(geometry.center.0, geometry.center.1);

    let company = &config.company_name;
    if !company.text.is_empty() {
        let font_size = scale.mm_to_px(company.font_size_mm);
        let inset = font_size + scale.mm_to_px(company.margin_mm);
        let path = TextPath::Arc {
            center,
            radius_x: geometry.radius_x - inset,
            radius_y: geometry.radius_y - inset,
            mid_angle: -FRAC_PI_2,
            span: company.span(),
            direction: ArcDirection::Clockwise,
        };
        let style = TextStyle::new(&company.font_family, font_size, TextBaseline::Bottom)
            .compressed(company.compression);
        let placements = layout_text(&company.text, &path, LayoutStrategy::EqualAngle, &[]);
        draw_text_run(mask, fonts, &style, &placements, &white, Transform::identity());
    }

    let stamp_type = &config.stamp_type;
    if !stamp_type.text.is_empty() {
        let style = TextStyle::new(
            &stamp_type.font_family,
            scale.mm_to_px(stamp_type.font_size_mm),
            TextBaseline::Middle,
        );
        let advances = measure_advances(fonts, &style, &stamp_type.text);
        let path = TextPath::Line {
            center: Point2D::origin(),
            span: advances.iter().sum(),
        };
        let strategy = LayoutStrategy::EqualWidth {
            letter_spacing: scale.mm_to_px(stamp_type.letter_spacing_mm),
        };
        let placements = layout_text(&stamp_type.text, &path, strategy, &advances);
        // Compression squeezes the whole line, spacing included
        let base = Transform::from_translate(
            center.x,
            center.y + geometry.radius_x * 0.5 + scale.mm_to_px(stamp_type.position_y_mm),
        )
        .pre_concat(Transform::from_scale(stamp_type.compression, 1.0));
        draw_text_run(mask, fonts, &style, &placements, &white, base);
    }

    let code = &config.code;
    if !code.text.is_empty() {
        let font_size = scale.mm_to_px(code.font_size_mm);
        let inset = font_size / 2.0 + scale.mm_to_px(code.margin_mm);
        let path = TextPath::Arc {
            center,
            radius_x: geometry.radius_x - inset,
            radius_y: geometry.radius_y - inset,
            mid_angle: FRAC_PI_2,
            span: code.span(),
            direction: ArcDirection::CounterClockwise,
        };
        let style = TextStyle::new(&code.font_family, font_size, TextBaseline::Middle)
            .compressed(code.compression);
        let placements = layout_text(&code.text, &path, LayoutStrategy::EqualAngle, &[]);
        draw_text_run(mask, fonts, &style, &placements, &white, Transform::identity());
    }

    let tax = &config.tax_number;
    if !tax.text.is_empty() {
        let style = TextStyle::new(
            &tax.font_family,
            scale.mm_to_px(tax.font_size_mm),
            TextBaseline::Middle,
        )
        .compressed(tax.compression)
        .stretched(TAX_NUMBER_STRETCH);
        let path = TextPath::Line {
            center: Point2D::new(center.x, center.y + scale.mm_to_px(tax.position_y_mm)),
            span: scale.mm_to_px(tax.total_width_mm) * tax.compression
                + scale.mm_to_px(tax.letter_spacing_mm),
        };
        let placements = layout_text(&tax.text, &path, LayoutStrategy::EqualAngle, &[]);
        draw_text_run(mask, fonts, &style, &placements, &white, Transform::identity());
    }
}
