use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use std::collections::HashMap;
use std::sync::Arc;
use string_cache::DefaultAtom as Atom;
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

/// Rasterized strings at one pixel size, keyed by interned text.
pub struct TextCache {
    font: FontArc,
    size_px: f32,
    map: HashMap<Atom, Option<Arc<Pixmap>>>,
}

impl TextCache {
    pub fn new(font: FontArc, size_px: f32) -> Self {
        Self {
            font,
            size_px,
            map: HashMap::new(),
        }
    }

    /// `None` when the text has no visible glyphs.
    pub fn get_or_render(&mut self, text: &str) -> Option<Arc<Pixmap>> {
        let atom = Atom::from(text);
        if let Some(p) = self.map.get(&atom) {
            return p.clone();
        }
        let pm = render_text_pixmap(text, self.size_px, &self.font, Color::WHITE).map(Arc::new);
        self.map.insert(atom, pm.clone());
        pm
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Renders a single line into a tightly cropped, premultiplied pixmap.
pub fn render_text_pixmap(
    text: &str,
    font_size: f32,
    font: &FontArc,
    color: Color,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with the baseline at the ascent.
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return None;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;
    let stride = w as usize;
    let dst = pm.pixels_mut();

    let cu = color.to_color_u8();
    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // Porter-Duff over in premultiplied space.
            let a = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
            let bg = dst[i];
            let inv = 1.0 - a;
            let r = (cu.red() as f32 * a + bg.red() as f32 * inv) as u8;
            let g = (cu.green() as f32 * a + bg.green() as f32 * inv) as u8;
            let bl = (cu.blue() as f32 * a + bg.blue() as f32 * inv) as u8;
            let al = (255.0 * a + bg.alpha() as f32 * inv) as u8;
            if let Some(px) = PremultipliedColorU8::from_rgba(r.min(al), g.min(al), bl.min(al), al)
            {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}
