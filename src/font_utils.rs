//! Font discovery (fontdb) and glyph outlines (skrifa) for seal text.
use crate::error::Result;
use crate::layout::GlyphPlacement;
use fontdb::{Database, Family, Query, ID};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    raw::FontRef as ReadFontsRef,
    MetadataProvider,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path as FsPath;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, PixmapMut, Transform};
use tracing::debug;

/// Families tried when the requested face lacks a CJK glyph.
const CJK_FALLBACKS: &[&str] = &[
    "SimSun",
    "Noto Serif CJK SC",
    "Noto Sans CJK SC",
    "Source Han Serif SC",
    "WenQuanYi Micro Hei",
    "AR PL UMing CN",
];

/// Vertical anchor of a glyph relative to its placement point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// Glyph box bottom (baseline minus descent) sits on the point.
    Bottom,
    /// Glyph box middle sits on the point.
    Middle,
    /// Glyph box top (baseline minus ascent) sits on the point.
    Top,
}

/// A single glyph outline in local coordinates: x in `0..advance`,
/// baseline at y = 0, y growing downwards.
#[derive(Debug, Clone)]
pub struct GlyphShape {
    pub path: Option<Path>,
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl GlyphShape {
    /// Offset that moves the glyph's anchor point to the origin.
    pub fn anchor_offset(&self, baseline: TextBaseline) -> (f32, f32) {
        let dy = match baseline {
            TextBaseline::Bottom => self.descent,
            TextBaseline::Middle => (self.ascent + self.descent) / 2.0,
            TextBaseline::Top => self.ascent,
        };
        (-self.advance / 2.0, dy)
    }
}

/// Collects skrifa outline commands into a tiny-skia path (y flipped).
struct PathPen {
    open_path: PathBuilder,
}

impl PathPen {
    fn new() -> Self {
        Self {
            open_path: PathBuilder::new(),
        }
    }

    fn finish(self) -> Option<Path> {
        self.open_path.finish()
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.open_path.move_to(x, -y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.open_path.line_to(x, -y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.open_path.quad_to(cx0, -cy0, x, -y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.open_path.cubic_to(cx0, -cy0, cx1, -cy1, x, -y);
    }

    fn close(&mut self) {
        self.open_path.close();
    }
}

/// Font database used to turn seal characters into outlines.
///
/// Candidate faces are resolved once per family name and cached until the
/// next font is loaded.
pub struct FontBook {
    db: Database,
    resolved: RefCell<HashMap<String, Vec<ID>>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty book; text renders as nothing until fonts are loaded.
    pub fn new() -> Self {
        Self::from_database(Database::new())
    }

    fn from_database(db: Database) -> Self {
        Self {
            db,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system fonts");
        Self::from_database(db)
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.resolved.get_mut().clear();
    }

    pub fn load_font_file(&mut self, path: &FsPath) -> Result<()> {
        self.db.load_font_file(path)?;
        self.resolved.get_mut().clear();
        debug!(path = %path.display(), "loaded font file");
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn cached_family_count(&self) -> usize {
        self.resolved.borrow().len()
    }

    fn query(&self, family: Family<'_>) -> Option<ID> {
        let families = [family];
        self.db.query(&Query {
            families: &families,
            ..Query::default()
        })
    }

    /// Candidate faces for `family`, best match first.
    fn candidates(&self, family: &str) -> Vec<ID> {
        if let Some(ids) = self.resolved.borrow().get(family) {
            return ids.clone();
        }
        let ids = self.resolve(family);
        self.resolved
            .borrow_mut()
            .insert(family.to_string(), ids.clone());
        ids
    }

    fn resolve(&self, family: &str) -> Vec<ID> {
        let mut ids = Vec::new();
        let named = std::iter::once(family)
            .chain(CJK_FALLBACKS.iter().copied())
            .map(Family::Name);
        for family in named.chain([Family::Serif, Family::SansSerif]) {
            if let Some(id) = self.query(family) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        if ids.is_empty() {
            ids.extend(self.db.faces().next().map(|face| face.id));
        }
        ids
    }

    /// Outline of `ch` at `size_px`, from the first candidate face that maps it.
    pub fn glyph(&self, family: &str, ch: char, size_px: f32) -> Option<GlyphShape> {
        for id in self.candidates(family) {
            let shape = self
                .db
                .with_face_data(id, |data, index| outline_char(data, index, ch, size_px))
                .flatten();
            if shape.is_some() {
                return shape;
            }
        }
        debug!(%ch, family, "no font face provides this character");
        None
    }

    /// Horizontal advance of `ch`, zero when no face provides it.
    pub fn advance(&self, family: &str, ch: char, size_px: f32) -> f32 {
        self.glyph(family, ch, size_px)
            .map(|shape| shape.advance)
            .unwrap_or(0.0)
    }
}

fn outline_char(data: &[u8], index: u32, ch: char, size_px: f32) -> Option<GlyphShape> {
    let font_ref = ReadFontsRef::from_index(data, index).ok()?;
    let glyph_id = font_ref.charmap().map(ch)?;
    let size = Size::new(size_px);
    let metrics = font_ref.metrics(size, LocationRef::default());
    let advance = font_ref
        .glyph_metrics(size, LocationRef::default())
        .advance_width(glyph_id)
        .unwrap_or(size_px);

    let mut pen = PathPen::new();
    if let Some(outline) = font_ref.outline_glyphs().get(glyph_id) {
        let settings = DrawSettings::unhinted(size, LocationRef::default());
        outline.draw(settings, &mut pen).ok()?;
    }

    Some(GlyphShape {
        path: pen.finish(),
        advance,
        ascent: metrics.ascent,
        descent: metrics.descent,
    })
}

/// Fill a glyph's outline with `paint` under `transform`.
pub fn fill_glyph(pixmap: &mut PixmapMut, shape: &GlyphShape, paint: &Paint, transform: Transform) {
    if let Some(path) = &shape.path {
        pixmap.fill_path(path, paint, FillRule::Winding, transform, None);
    }
}

/// How the glyphs of one text run are sized and anchored.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    pub size_px: f32,
    /// Horizontal scale applied to each glyph
    pub compression: f32,
    /// Vertical scale applied to each glyph
    pub stretch_y: f32,
    pub baseline: TextBaseline,
}

impl<'a> TextStyle<'a> {
    pub fn new(family: &'a str, size_px: f32, baseline: TextBaseline) -> Self {
        Self {
            family,
            size_px,
            compression: 1.0,
            stretch_y: 1.0,
            baseline,
        }
    }

    pub fn compressed(mut self, compression: f32) -> Self {
        self.compression = compression;
        self
    }

    pub fn stretched(mut self, stretch_y: f32) -> Self {
        self.stretch_y = stretch_y;
        self
    }
}

/// Measured advance of every character in `text`.
pub fn measure_advances(fonts: &FontBook, style: &TextStyle, text: &str) -> Vec<f32> {
    text.chars()
        .map(|ch| fonts.advance(style.family, ch, style.size_px))
        .collect()
}

/// Draw laid-out characters. `base` maps layout space onto the pixmap.
pub fn draw_text_run(
    pixmap: &mut PixmapMut,
    fonts: &FontBook,
    style: &TextStyle,
    placements: &[GlyphPlacement],
    paint: &Paint,
    base: Transform,
) {
    for placement in placements {
        let Some(shape) = fonts.glyph(style.family, placement.ch, style.size_px) else {
            continue;
        };
        let (ox, oy) = shape.anchor_offset(style.baseline);
        let transform = base
            .pre_concat(Transform::from_translate(
                placement.position.x,
                placement.position.y,
            ))
            .pre_concat(Transform::from_rotate(placement.rotation.to_degrees()))
            .pre_concat(Transform::from_scale(style.compression, style.stretch_y))
            .pre_concat(Transform::from_translate(ox, oy));
        fill_glyph(pixmap, &shape, paint, transform);
    }
}
