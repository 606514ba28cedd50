pub mod assets;
pub mod error;
pub mod layout;
pub mod render;
pub mod text;

pub use assets::{pixmap_from_rgba, ImageCache};
pub use error::RenderError;
pub use layout::{fit_image, Bounds, SceneLayout};
pub use render::{FrameStats, RenderConfig, SkiaRenderer};
pub use text::{render_text_pixmap, TextCache};
