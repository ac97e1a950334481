use crate::color_utils::parse_color;
use crate::error::{Result, StampError};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Arc covered by the company name when no distribution factor is set.
pub const DEFAULT_COMPANY_SPAN_DEGREES: f32 = 270.0;
/// Upper bound on security-pattern gaps per seal.
pub const MAX_SECURITY_PATTERN_COUNT: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulerConfig {
    pub show_ruler: bool,
    pub show_full_ruler: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StarConfig {
    pub draw_star: bool,
    /// Star diameter in mm
    pub star_diameter: f32,
    /// Vertical offset from the seal centre in mm
    pub star_position_y: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            draw_star: false,
            star_diameter: 14.0,
            star_position_y: 0.0,
        }
    }
}

/// Thin ring inside the border, as on contract seals. It sits two border
/// widths inside the border line and is half as thick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnerCircleConfig {
    pub show_inner_circle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityPatternConfig {
    #[serde(alias = "enabled")]
    pub open_security_pattern: bool,
    /// Stroke width in mm
    pub width: f32,
    /// Segment length in mm
    pub length: f32,
    pub count: usize,
    /// Total jitter around the base direction, in degrees
    pub angle_range_degrees: f32,
}

impl Default for SecurityPatternConfig {
    fn default() -> Self {
        Self {
            open_security_pattern: true,
            width: 0.15,
            length: 3.0,
            count: 5,
            angle_range_degrees: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyNameConfig {
    pub text: String,
    pub compression: f32,
    /// Gap between the border and the glyph tops in mm
    #[serde(rename = "marginMM")]
    pub margin_mm: f32,
    /// `None` keeps the fixed 270° arc; `Some(f)` spans `π·(1 + n/f)`.
    pub distribution_factor: Option<f32>,
    #[serde(rename = "fontSizeMM")]
    pub font_size_mm: f32,
    pub font_family: String,
}

impl Default for CompanyNameConfig {
    fn default() -> Self {
        Self {
            text: "印章绘制有限责任公司".to_string(),
            compression: 1.0,
            margin_mm: 1.0,
            distribution_factor: None,
            font_size_mm: 4.2,
            font_family: "SimSun".to_string(),
        }
    }
}

impl CompanyNameConfig {
    /// Angular span of the title arc in radians.
    pub fn span(&self) -> f32 {
        let n = self.text.chars().count() as f32;
        match self.distribution_factor {
            Some(factor) => PI * (1.0 + n / factor),
            None => DEFAULT_COMPANY_SPAN_DEGREES.to_radians(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeConfig {
    pub text: String,
    pub compression: f32,
    #[serde(rename = "fontSizeMM")]
    pub font_size_mm: f32,
    pub font_family: String,
    #[serde(rename = "marginMM")]
    pub margin_mm: f32,
    pub distribution_factor: f32,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            compression: 1.0,
            font_size_mm: 1.2,
            font_family: "Arial".to_string(),
            margin_mm: 1.0,
            distribution_factor: 50.0,
        }
    }
}

impl CodeConfig {
    /// Angular span of the code arc in radians, growing with the code length.
    pub fn span(&self) -> f32 {
        let n = self.text.chars().count() as f32;
        PI * (1.0 + n) / self.distribution_factor
    }
}

/// Horizontal centre text, e.g. "发票专用章".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StampTypeConfig {
    pub text: String,
    pub compression: f32,
    #[serde(rename = "fontSizeMM")]
    pub font_size_mm: f32,
    pub font_family: String,
    #[serde(rename = "letterSpacingMM")]
    pub letter_spacing_mm: f32,
    #[serde(rename = "positionYMM")]
    pub position_y_mm: f32,
}

impl Default for StampTypeConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            compression: 0.75,
            font_size_mm: 4.6,
            font_family: "SimSun".to_string(),
            letter_spacing_mm: 0.0,
            position_y_mm: -3.0,
        }
    }
}

/// Horizontal row of equally sized cells, used for taxpayer numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxNumberConfig {
    pub text: String,
    pub compression: f32,
    #[serde(rename = "fontSizeMM")]
    pub font_size_mm: f32,
    pub font_family: String,
    #[serde(rename = "letterSpacingMM")]
    pub letter_spacing_mm: f32,
    #[serde(rename = "positionYMM")]
    pub position_y_mm: f32,
    #[serde(rename = "totalWidthMM")]
    pub total_width_mm: f32,
}

impl Default for TaxNumberConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            compression: 0.7,
            font_size_mm: 3.7,
            font_family: "Arial".to_string(),
            letter_spacing_mm: 0.0,
            position_y_mm: 0.0,
            total_width_mm: 26.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgingConfig {
    pub apply_aging: bool,
    /// 0..=100
    pub intensity: f32,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            apply_aging: false,
            intensity: 50.0,
        }
    }
}

/// Declarative description of a seal. Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StampConfig {
    pub ruler: RulerConfig,
    pub draw_star: StarConfig,
    pub inner_circle: InnerCircleConfig,
    pub security_pattern: SecurityPatternConfig,
    pub company_name: CompanyNameConfig,
    pub code: CodeConfig,
    pub stamp_type: StampTypeConfig,
    pub tax_number: TaxNumberConfig,
    pub aging: AgingConfig,
    pub width: f32,
    pub height: f32,
    pub border_width: f32,
    pub primary_color: String,
    pub background_color: String,
    /// One-shot: regenerate the security pattern on the next render.
    pub refresh_security_pattern: bool,
    /// One-shot: regenerate the aging parameters on the next render.
    pub refresh_old: bool,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            ruler: RulerConfig::default(),
            draw_star: StarConfig::default(),
            inner_circle: InnerCircleConfig::default(),
            security_pattern: SecurityPatternConfig::default(),
            company_name: CompanyNameConfig::default(),
            code: CodeConfig::default(),
            stamp_type: StampTypeConfig::default(),
            tax_number: TaxNumberConfig::default(),
            aging: AgingConfig::default(),
            width: 40.0,
            height: 30.0,
            border_width: 1.0,
            primary_color: "#ff0000".to_string(),
            background_color: "#ffffff".to_string(),
            refresh_security_pattern: false,
            refresh_old: false,
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StampError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StampError::invalid(field, format!("must not be negative, got {value}")))
    }
}

fn require_span(field: &'static str, span: f32) -> Result<()> {
    if span.is_finite() && span <= TAU + f32::EPSILON {
        Ok(())
    } else {
        Err(StampError::invalid(
            field,
            format!("spans {:.1}°, more than a full turn", span.to_degrees()),
        ))
    }
}

/// Text inset from the border line must leave a positive baseline radius.
fn require_inset(field: &'static str, inset: f32, radius: f32) -> Result<()> {
    if inset < radius {
        Ok(())
    } else {
        Err(StampError::invalid(
            field,
            format!("text needs {inset:.1} mm inside a {radius:.1} mm border radius"),
        ))
    }
}

impl StampConfig {
    /// Reject geometry the renderer must not attempt to draw.
    pub fn validate(&self) -> Result<()> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        require_non_negative("borderWidth", self.border_width)?;
        if self.border_width >= self.width.min(self.height) {
            return Err(StampError::invalid(
                "borderWidth",
                "must be smaller than the seal's width and height",
            ));
        }
        parse_color(&self.primary_color)?;
        parse_color(&self.background_color)?;
        // Radius of the border's centre line along the short axis
        let border_radius = (self.width.min(self.height) - self.border_width) / 2.0;
        if self.inner_circle.show_inner_circle && border_radius <= 2.0 * self.border_width {
            return Err(StampError::invalid(
                "innerCircle.showInnerCircle",
                "seal is too small for an inner ring at this border width",
            ));
        }

        let company = &self.company_name;
        require_positive("companyName.fontSizeMM", company.font_size_mm)?;
        require_positive("companyName.compression", company.compression)?;
        require_non_negative("companyName.marginMM", company.margin_mm)?;
        if let Some(factor) = company.distribution_factor {
            require_positive("companyName.distributionFactor", factor)?;
        }
        require_span("companyName", company.span())?;
        if !company.text.is_empty() {
            require_inset(
                "companyName.fontSizeMM",
                company.font_size_mm + company.margin_mm,
                border_radius,
            )?;
        }

        let code = &self.code;
        require_positive("code.fontSizeMM", code.font_size_mm)?;
        require_positive("code.compression", code.compression)?;
        require_non_negative("code.marginMM", code.margin_mm)?;
        require_positive("code.distributionFactor", code.distribution_factor)?;
        require_span("code", code.span())?;
        if !code.text.is_empty() {
            require_inset(
                "code.fontSizeMM",
                code.font_size_mm / 2.0 + code.margin_mm,
                border_radius,
            )?;
        }

        require_positive("stampType.fontSizeMM", self.stamp_type.font_size_mm)?;
        require_positive("stampType.compression", self.stamp_type.compression)?;
        require_positive("taxNumber.fontSizeMM", self.tax_number.font_size_mm)?;
        require_positive("taxNumber.compression", self.tax_number.compression)?;
        require_positive("taxNumber.totalWidthMM", self.tax_number.total_width_mm)?;

        if self.draw_star.draw_star {
            require_non_negative("drawStar.starDiameter", self.draw_star.star_diameter)?;
        }

        let pattern = &self.security_pattern;
        if pattern.count > MAX_SECURITY_PATTERN_COUNT {
            return Err(StampError::invalid(
                "securityPattern.count",
                format!(
                    "at most {MAX_SECURITY_PATTERN_COUNT} lines, got {}",
                    pattern.count
                ),
            ));
        }
        if pattern.open_security_pattern {
            require_non_negative("securityPattern.width", pattern.width)?;
            require_non_negative("securityPattern.length", pattern.length)?;
            require_non_negative(
                "securityPattern.angleRangeDegrees",
                pattern.angle_range_degrees,
            )?;
        }

        if !(0.0..=100.0).contains(&self.aging.intensity) {
            return Err(StampError::invalid(
                "aging.intensity",
                format!("must be within 0..=100, got {}", self.aging.intensity),
            ));
        }
        Ok(())
    }

    /// Load a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Axis-aligned region of a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}
