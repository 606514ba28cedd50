use scenex_core::SceneView;
use tiny_skia::Rect;

const MARGIN: f32 = 40.0;
const IMAGE_SHARE: f32 = 0.6;
const PROMPT_GAP: f32 = 48.0;
const BUTTON_GAP: f32 = 32.0;
const BUTTON_HEIGHT: f32 = 48.0;
/// Horizontal margin on each side of a button.
const BUTTON_MARGIN: f32 = 8.0;
const BUTTON_PADDING: f32 = 24.0;
const BUTTON_MIN_WIDTH: f32 = 72.0;
/// Rough advance of one label glyph at button text size.
const LABEL_CHAR_WIDTH: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// `None` for empty or non-finite bounds.
    pub fn to_rect(&self) -> Option<Rect> {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Scales an `image_w`×`image_h` image to fit `bounds`, centered, keeping
/// its aspect ratio.
pub fn fit_image(bounds: Bounds, image_w: u32, image_h: u32) -> Bounds {
    if image_w == 0 || image_h == 0 {
        return Bounds::new(bounds.x, bounds.y, 0.0, 0.0);
    }
    let scale = (bounds.width / image_w as f32).min(bounds.height / image_h as f32);
    let w = image_w as f32 * scale;
    let h = image_h as f32 * scale;
    Bounds::new(
        bounds.x + (bounds.width - w) / 2.0,
        bounds.y + (bounds.height - h) / 2.0,
        w,
        h,
    )
}

/// Screen positions of everything in a [`SceneView`]: the stimulus on top,
/// the prompt below it and a centered row of buttons at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub image: Bounds,
    /// Center of the prompt line.
    pub prompt: (f32, f32),
    /// One entry per button, in view order.
    pub buttons: Vec<Bounds>,
}

impl SceneLayout {
    pub fn compute(width: u32, height: u32, view: &SceneView) -> Self {
        let w = width as f32;
        let h = height as f32;

        let image = Bounds::new(
            MARGIN,
            MARGIN,
            (w - 2.0 * MARGIN).max(0.0),
            (h * IMAGE_SHARE - MARGIN).max(0.0),
        );
        let prompt = (w / 2.0, image.y + image.height + PROMPT_GAP);

        let widths: Vec<f32> = view.labels().map(button_width).collect();
        let row: f32 = widths.iter().map(|bw| bw + 2.0 * BUTTON_MARGIN).sum();
        let top = prompt.1 + BUTTON_GAP;

        let mut x = (w - row) / 2.0;
        let buttons = widths
            .into_iter()
            .map(|bw| {
                x += BUTTON_MARGIN;
                let b = Bounds::new(x, top, bw, BUTTON_HEIGHT);
                x += bw + BUTTON_MARGIN;
                b
            })
            .collect();

        Self {
            image,
            prompt,
            buttons,
        }
    }

    /// Index of the enabled button under the point, if any.
    pub fn hit_test(&self, view: &SceneView, x: f32, y: f32) -> Option<usize> {
        self.buttons
            .iter()
            .zip(&view.buttons)
            .position(|(bounds, button)| !button.disabled && bounds.contains(x, y))
    }
}

fn button_width(label: &str) -> f32 {
    (label.chars().count() as f32 * LABEL_CHAR_WIDTH + 2.0 * BUTTON_PADDING).max(BUTTON_MIN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        let fitted = fit_image(Bounds::new(0.0, 0.0, 400.0, 100.0), 200, 100);
        assert_eq!(fitted, Bounds::new(100.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn short_labels_get_minimum_width() {
        assert_eq!(button_width("A"), BUTTON_MIN_WIDTH);
        assert!(button_width("in front of") > BUTTON_MIN_WIDTH);
    }
}
