pub mod aging;
pub mod color_utils;
pub mod error;
pub mod font_utils;
pub mod layout;
pub mod math_utils;
pub mod models;
pub mod presets;
pub mod renderer;
pub mod ruler;
pub mod security;
pub mod shapes;
pub mod units;
pub mod utils;

pub use error::{Result, StampError};
pub use font_utils::FontBook;
pub use models::StampConfig;
pub use presets::Preset;
pub use renderer::{RenderOptions, RenderStage, SealRenderer};
pub use units::UnitScale;

#[cfg(test)]
mod tests;
