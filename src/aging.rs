//! Aging post-process: randomized speckles and fading on seal ink.
//!
//! Works on a flat premultiplied RGBA buffer. The random draw is made once
//! per scanned frame and cached; later passes replay it unchanged.
use crate::color_utils::InkMatcher;
use crate::math_utils::distance;
use rand::Rng;
use tracing::debug;

const LIGHT_NOISE_CHANCE: f32 = 0.4;
const STRONG_NOISE_CHANCE: f32 = 0.05;
const FADE_CHANCE: f32 = 0.2;

/// Randomized effect parameters for one ink pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgingEffectParam {
    pub x: u32,
    pub y: u32,
    pub noise_size: f32,
    pub noise_intensity: f32,
    pub strong_noise_size: f32,
    pub strong_noise_intensity: f32,
    pub fade_amount: f32,
    /// Decides which effects apply; fixed at generation time.
    pub seed: f32,
}

/// Region the aging pass scans and is confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgingFrame {
    pub width: u32,
    pub height: u32,
    pub center: (f32, f32),
    pub radius: f32,
}

impl AgingFrame {
    fn contains(&self, x: f32, y: f32) -> bool {
        distance(self.center, (x, y)) <= self.radius
    }

    /// Offset of pixel (x, y) in an RGBA buffer of this frame's width.
    pub fn byte_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

#[derive(Debug, Default)]
pub struct AgingProcessor {
    params: Vec<AgingEffectParam>,
    frame: Option<AgingFrame>,
}

impl AgingProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[AgingEffectParam] {
        &self.params
    }

    pub fn invalidate(&mut self) {
        self.params.clear();
        self.frame = None;
    }

    /// Scan `data` for ink pixels inside `frame` and draw fresh parameters
    /// for each of them, replacing the whole cache.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        data: &[u8],
        frame: AgingFrame,
        ink: InkMatcher,
        intensity: f32,
    ) {
        let k = intensity / 100.0;
        let mut params = Vec::new();
        for y in 0..frame.height {
            for x in 0..frame.width {
                if !frame.contains(x as f32, y as f32) {
                    continue;
                }
                let index = frame.byte_index(x, y);
                if !ink.matches(&data[index..index + 4]) {
                    continue;
                }
                let seed = rng.gen::<f32>();
                params.push(AgingEffectParam {
                    x,
                    y,
                    noise_size: rng.gen::<f32>() * 3.0 + 1.0,
                    noise_intensity: rng.gen::<f32>() * 200.0 * k,
                    strong_noise_size: rng.gen::<f32>() * 5.0 + 2.0,
                    strong_noise_intensity: rng.gen::<f32>() * 250.0 * k + 5.0,
                    fade_amount: rng.gen::<f32>() * 50.0 * k,
                    seed,
                });
            }
        }
        debug!(pixels = params.len(), "regenerated aging parameters");
        self.params = params;
        self.frame = Some(frame);
    }

    /// Age `data` in place. Parameters are regenerated when refresh is
    /// requested, when none are cached, or when the frame moved.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        data: &mut [u8],
        frame: AgingFrame,
        ink: InkMatcher,
        intensity: f32,
        force_refresh: bool,
    ) {
        if force_refresh || self.params.is_empty() || self.frame != Some(frame) {
            self.regenerate(rng, data, frame, ink, intensity);
        }

        for param in &self.params {
            if param.seed < LIGHT_NOISE_CHANCE {
                add_circular_noise(data, &frame, param.x, param.y, param.noise_size, param.noise_intensity);
            }
            if param.seed < STRONG_NOISE_CHANCE {
                add_circular_noise(
                    data,
                    &frame,
                    param.x,
                    param.y,
                    param.strong_noise_size,
                    param.strong_noise_intensity,
                );
            }
            if param.seed < FADE_CHANCE {
                let index = frame.byte_index(param.x, param.y);
                lighten(&mut data[index..index + 4], param.fade_amount);
            }
        }
    }
}

/// Add `amount` to the color channels, keeping them valid for premultiplied alpha.
fn lighten(px: &mut [u8], amount: f32) {
    let alpha = px[3] as f32;
    for c in &mut px[..3] {
        *c = (*c as f32 + amount).min(alpha).min(255.0) as u8;
    }
}

/// Spread `intensity` over a disc of diameter `size` around (x, y).
fn add_circular_noise(data: &mut [u8], frame: &AgingFrame, x: u32, y: u32, size: f32, intensity: f32) {
    let half = size / 2.0;
    let radius_squared = size * size / 4.0;
    let mut dy = -half;
    while dy < half {
        let mut dx = -half;
        while dx < half {
            if dx * dx + dy * dy <= radius_squared {
                let nx = (x as f32 + dx).round();
                let ny = (y as f32 + dy).round();
                let inside = nx >= 0.0
                    && ny >= 0.0
                    && (nx as u32) < frame.width
                    && (ny as u32) < frame.height
                    && frame.contains(nx, ny);
                if inside {
                    let index = frame.byte_index(nx as u32, ny as u32);
                    lighten(&mut data[index..index + 4], intensity);
                }
            }
            dx += 1.0;
        }
        dy += 1.0;
    }
}
