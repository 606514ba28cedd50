use crate::assets::ImageCache;
use crate::error::RenderError;
use crate::layout::{fit_image, Bounds, SceneLayout};
use crate::text::TextCache;
use ab_glyph::FontArc;
use scenex_core::{Phase, SceneView};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

const PROMPT_SIZE: f32 = 28.0;
const LABEL_SIZE: f32 = 22.0;
const INFO_SIZE: f32 = 16.0;
const RESPONDED_OUTLINE: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub font_path: PathBuf,
    /// Directory the `/renders/` URLs resolve against.
    pub asset_root: PathBuf,
    pub background: [u8; 4],
    pub text: [u8; 4],
    pub button: [u8; 4],
    pub button_disabled: [u8; 4],
    pub placeholder: [u8; 4],
    pub responded: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            asset_root: PathBuf::from("renders"),
            background: [0, 0, 0, 255],
            text: [255, 255, 255, 255],
            button: [70, 70, 90, 255],
            button_disabled: [40, 40, 40, 255],
            placeholder: [60, 60, 60, 255],
            responded: [255, 255, 0, 255],
        }
    }
}

fn color([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub clear: Duration,
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

/// Rasterizes the session onto an RGBA frame buffer.
pub struct SkiaRenderer {
    width: u32,
    height: u32,
    config: RenderConfig,
    canvas: Pixmap,
    prompt_text: TextCache,
    label_text: TextCache,
    info_text: TextCache,
    images: ImageCache,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, config: RenderConfig) -> Result<Self, RenderError> {
        let bytes = std::fs::read(&config.font_path).map_err(|source| RenderError::FontRead {
            path: config.font_path.clone(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|_| RenderError::InvalidFont {
            path: config.font_path.clone(),
        })?;
        Self::with_font(width, height, config, font)
    }

    pub fn with_font(
        width: u32,
        height: u32,
        config: RenderConfig,
        font: FontArc,
    ) -> Result<Self, RenderError> {
        let canvas = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        Ok(Self {
            width,
            height,
            canvas,
            prompt_text: TextCache::new(font.clone(), PROMPT_SIZE),
            label_text: TextCache::new(font.clone(), LABEL_SIZE),
            info_text: TextCache::new(font, INFO_SIZE),
            images: ImageCache::new(config.asset_root.clone()),
            config,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.canvas = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn images(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    pub fn layout(&self, view: &SceneView) -> SceneLayout {
        SceneLayout::compute(self.width, self.height, view)
    }

    /// Draws one frame and copies it into `frame`, which must be exactly
    /// `width * height * 4` bytes.
    pub fn render_frame<P: Phase>(
        &mut self,
        phase: &P,
        view: Option<&SceneView>,
        progress: Option<(usize, usize)>,
        frame: &mut [u8],
    ) -> Result<FrameStats, RenderError> {
        let expected = self.canvas.data().len();
        if frame.len() != expected {
            return Err(RenderError::FrameSize {
                expected,
                actual: frame.len(),
            });
        }

        let t0 = Instant::now();
        self.canvas.fill(color(self.config.background));
        let clear = t0.elapsed();

        let t1 = Instant::now();
        self.draw_phase(phase, view, progress);
        let draw = t1.elapsed();

        let t2 = Instant::now();
        frame.copy_from_slice(self.canvas.data());
        let copy = t2.elapsed();

        Ok(FrameStats {
            clear,
            draw,
            copy,
            total: t0.elapsed(),
        })
    }

    fn draw_phase<P: Phase>(
        &mut self,
        phase: &P,
        view: Option<&SceneView>,
        progress: Option<(usize, usize)>,
    ) {
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;

        if phase.is_welcome() {
            self.draw_prompt_text("Press SPACE to begin", (cx, cy - 20.0));
            self.draw_info_text("Press ESC to exit", (cx, cy + 30.0), 1.0);
        } else if phase.is_debrief() {
            self.draw_prompt_text("Thank you!", (cx, cy - 20.0));
            self.draw_info_text("Press SPACE or ESC to exit", (cx, cy + 30.0), 1.0);
        } else if phase.is_trials() {
            // An empty region between trials is a blank screen.
            if let Some(view) = view {
                self.draw_scene(view);
            }
            if let Some((current, total)) = progress {
                let text = format!("Trial: {current}/{total}");
                self.draw_info_text_at(&text, (20.0, 20.0), 0.6);
            }
        }
    }

    fn draw_scene(&mut self, view: &SceneView) {
        let layout = self.layout(view);

        let drawn = match view.image.as_deref() {
            Some(url) => self.draw_image(url, layout.image),
            None => None,
        };
        let image_bounds = drawn.unwrap_or_else(|| {
            self.fill(layout.image, self.config.placeholder);
            layout.image
        });
        if view.responded {
            self.outline(image_bounds, self.config.responded, RESPONDED_OUTLINE);
        }

        self.draw_prompt_text(&view.prompt, layout.prompt);

        for (button, bounds) in view.buttons.iter().zip(&layout.buttons) {
            let (fill, opacity) = if button.disabled {
                (self.config.button_disabled, 0.5)
            } else {
                (self.config.button, 1.0)
            };
            self.fill(*bounds, fill);
            if let Some(label) = self.label_text.get_or_render(&button.label) {
                self.blit_centered(&label, bounds.center(), opacity);
            }
        }
    }

    /// Draws the image fitted into `bounds`. Returns where it landed.
    fn draw_image(&mut self, url: &str, bounds: Bounds) -> Option<Bounds> {
        let image = self.images.get(url)?;
        let fitted = fit_image(bounds, image.width(), image.height());
        let scale = fitted.width / image.width() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.canvas.draw_pixmap(
            0,
            0,
            Pixmap::as_ref(&image),
            &paint,
            Transform::from_row(scale, 0.0, 0.0, scale, fitted.x, fitted.y),
            None,
        );
        Some(fitted)
    }

    fn fill(&mut self, bounds: Bounds, rgba: [u8; 4]) {
        let Some(rect) = bounds.to_rect() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color(rgba));
        self.canvas
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn outline(&mut self, bounds: Bounds, rgba: [u8; 4], width: f32) {
        let Some(rect) = bounds.to_rect() else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(color(rgba));
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.canvas
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_prompt_text(&mut self, text: &str, center: (f32, f32)) {
        if let Some(pm) = self.prompt_text.get_or_render(text) {
            self.blit_centered(&pm, center, 1.0);
        }
    }

    fn draw_info_text(&mut self, text: &str, center: (f32, f32), opacity: f32) {
        if let Some(pm) = self.info_text.get_or_render(text) {
            self.blit_centered(&pm, center, opacity);
        }
    }

    fn draw_info_text_at(&mut self, text: &str, top_left: (f32, f32), opacity: f32) {
        if let Some(pm) = self.info_text.get_or_render(text) {
            self.blit(&pm, top_left.0 as i32, top_left.1 as i32, opacity);
        }
    }

    fn blit_centered(&mut self, pm: &Pixmap, center: (f32, f32), opacity: f32) {
        let x = (center.0 - pm.width() as f32 / 2.0).round() as i32;
        let y = (center.1 - pm.height() as f32 / 2.0).round() as i32;
        self.blit(pm, x, y, opacity);
    }

    fn blit(&mut self, pm: &Pixmap, x: i32, y: i32, opacity: f32) {
        let paint = PixmapPaint {
            opacity,
            ..PixmapPaint::default()
        };
        self.canvas
            .draw_pixmap(x, y, pm.as_ref(), &paint, Transform::identity(), None);
    }
}
