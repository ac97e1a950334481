/// Physical seal diameter (mm) used to calibrate the default scale.
pub const REFERENCE_SEAL_DIAMETER_MM: f32 = 45.0;
/// Pixel size the reference seal occupies on the default canvas.
pub const REFERENCE_SEAL_SIZE_PX: f32 = 180.0;

/// Millimetre to pixel mapping, fixed for the lifetime of a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pixels_per_mm: f32,
}

impl UnitScale {
    pub fn new(pixels_per_mm: f32) -> Self {
        Self { pixels_per_mm }
    }

    /// Derive the scale from a physical diameter mapped onto a pixel size.
    pub fn from_reference(diameter_mm: f32, size_px: f32) -> Self {
        Self::new(size_px / diameter_mm)
    }

    pub fn pixels_per_mm(&self) -> f32 {
        self.pixels_per_mm
    }

    pub fn mm_to_px(&self, mm: f32) -> f32 {
        mm * self.pixels_per_mm
    }

    pub fn px_to_mm(&self, px: f32) -> f32 {
        px / self.pixels_per_mm
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::from_reference(REFERENCE_SEAL_DIAMETER_MM, REFERENCE_SEAL_SIZE_PX)
    }
}
