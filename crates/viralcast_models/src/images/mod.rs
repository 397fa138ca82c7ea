//! Image generation providers.

mod dalle3;
mod free;
mod gemini_image;
mod stable_diffusion;
mod style;

pub use dalle3::Dalle3Provider;
pub use free::{FreeImageProvider, gradient_svg, picsum_url, prompt_seed};
pub use gemini_image::GeminiImageProvider;
pub use stable_diffusion::{SDXL_ENDPOINT, StableDiffusionFreeProvider, StableDiffusionProvider};
pub use style::NicheStyles;
