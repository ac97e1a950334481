//! Built-in configurations for the common seal subtypes.
use crate::models::{
    CodeConfig, CompanyNameConfig, InnerCircleConfig, SecurityPatternConfig, StampConfig,
    StampTypeConfig, StarConfig, TaxNumberConfig,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 45 mm round company seal with a star
    Official,
    /// 40 mm round contract seal in blue, with an inner ring
    Contract,
    /// 40 x 30 mm oval invoice seal with a taxpayer number
    Invoice,
    /// 38 mm round finance seal
    Financial,
    /// 18 mm round legal representative seal
    Legal,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Official,
        Preset::Contract,
        Preset::Invoice,
        Preset::Financial,
        Preset::Legal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Official => "official",
            Preset::Contract => "contract",
            Preset::Invoice => "invoice",
            Preset::Financial => "financial",
            Preset::Legal => "legal",
        }
    }

    pub fn config(self) -> StampConfig {
        match self {
            Preset::Official => official(),
            Preset::Contract => contract(),
            Preset::Invoice => invoice(),
            Preset::Financial => financial(),
            Preset::Legal => legal(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown preset {s:?}, expected one of: official, contract, invoice, financial, legal")
            })
    }
}

fn official() -> StampConfig {
    StampConfig {
        width: 45.0,
        height: 45.0,
        border_width: 1.5,
        draw_star: StarConfig {
            draw_star: true,
            star_diameter: 16.0,
            star_position_y: 0.0,
        },
        company_name: CompanyNameConfig {
            font_size_mm: 6.5,
            margin_mm: 1.5,
            compression: 0.8,
            ..CompanyNameConfig::default()
        },
        code: CodeConfig {
            text: "1234567890".to_string(),
            font_size_mm: 1.2,
            ..CodeConfig::default()
        },
        ..StampConfig::default()
    }
}

fn contract() -> StampConfig {
    StampConfig {
        width: 40.0,
        height: 40.0,
        border_width: 1.0,
        primary_color: "#0000ff".to_string(),
        inner_circle: InnerCircleConfig {
            show_inner_circle: true,
        },
        draw_star: StarConfig {
            draw_star: true,
            star_diameter: 12.0,
            star_position_y: 0.0,
        },
        company_name: CompanyNameConfig {
            font_size_mm: 5.0,
            compression: 0.85,
            ..CompanyNameConfig::default()
        },
        stamp_type: StampTypeConfig {
            text: "合同专用章".to_string(),
            font_size_mm: 4.0,
            position_y_mm: 1.0,
            ..StampTypeConfig::default()
        },
        ..StampConfig::default()
    }
}

fn invoice() -> StampConfig {
    StampConfig {
        width: 40.0,
        height: 30.0,
        border_width: 1.0,
        company_name: CompanyNameConfig {
            distribution_factor: Some(20.0),
            ..CompanyNameConfig::default()
        },
        stamp_type: StampTypeConfig {
            text: "发票专用章".to_string(),
            ..StampTypeConfig::default()
        },
        tax_number: TaxNumberConfig {
            text: "000000000000000000".to_string(),
            ..TaxNumberConfig::default()
        },
        ..StampConfig::default()
    }
}

fn financial() -> StampConfig {
    StampConfig {
        width: 38.0,
        height: 38.0,
        border_width: 0.8,
        draw_star: StarConfig {
            draw_star: true,
            star_diameter: 10.0,
            star_position_y: -1.0,
        },
        company_name: CompanyNameConfig {
            font_size_mm: 2.8,
            ..CompanyNameConfig::default()
        },
        code: CodeConfig {
            font_size_mm: 1.8,
            ..CodeConfig::default()
        },
        stamp_type: StampTypeConfig {
            text: "财务专用章".to_string(),
            font_size_mm: 4.0,
            ..StampTypeConfig::default()
        },
        ..StampConfig::default()
    }
}

fn legal() -> StampConfig {
    StampConfig {
        width: 18.0,
        height: 18.0,
        border_width: 0.6,
        company_name: CompanyNameConfig {
            font_size_mm: 2.0,
            margin_mm: 0.5,
            ..CompanyNameConfig::default()
        },
        code: CodeConfig {
            font_size_mm: 1.5,
            margin_mm: 0.5,
            ..CodeConfig::default()
        },
        security_pattern: SecurityPatternConfig {
            length: 1.5,
            count: 3,
            ..SecurityPatternConfig::default()
        },
        ..StampConfig::default()
    }
}
