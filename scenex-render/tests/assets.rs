use image::{Rgba, RgbaImage};
use scenex_core::{Phase, SceneView};
use scenex_render::{pixmap_from_rgba, ImageCache, RenderConfig, RenderError, SkiaRenderer};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scenex-render-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn rgba_is_premultiplied() {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
    img.put_pixel(1, 0, Rgba([200, 100, 50, 0]));

    let pm = pixmap_from_rgba(img).unwrap();
    let opaque = pm.pixel(0, 0).unwrap();
    let clear = pm.pixel(1, 0).unwrap();
    assert_eq!(
        (opaque.red(), opaque.green(), opaque.blue(), opaque.alpha()),
        (200, 100, 50, 255)
    );
    assert_eq!(
        (clear.red(), clear.green(), clear.blue(), clear.alpha()),
        (0, 0, 0, 0)
    );
}

#[test]
fn empty_images_are_rejected() {
    assert!(matches!(
        pixmap_from_rgba(RgbaImage::new(0, 0)),
        Err(RenderError::EmptyImage)
    ));
}

#[test]
fn image_cache_loads_once_and_remembers_misses() {
    let dir = scratch_dir("cache");
    let mut img = RgbaImage::new(4, 3);
    img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
    img.save(dir.join("frame.png")).unwrap();

    let mut cache = ImageCache::new(&dir);
    let first = cache.get("/renders/frame.png").expect("decoded");
    assert_eq!((first.width(), first.height()), (4, 3));
    let again = cache.get("/renders/frame.png").expect("cached");
    assert!(std::sync::Arc::ptr_eq(&first, &again));

    assert!(cache.get("/renders/missing.png").is_none());
    assert!(cache.get("frame.png").is_none(), "outside the render root");
    assert_eq!(
        cache.preload(["/renders/frame.png", "/renders/missing.png"]),
        1
    );

    fs::remove_dir_all(dir).unwrap();
}

/// Needs a TrueType font on the machine; skipped when none is installed.
#[test]
fn renderer_rejects_mismatched_frame_buffers() {
    let config = RenderConfig::default();
    if !config.font_path.exists() {
        eprintln!("skipping: no font at {}", config.font_path.display());
        return;
    }
    let mut renderer = SkiaRenderer::new(64, 48, config).unwrap();
    let view = SceneView::default();
    let phase = scenex_core::SessionPhase::Trials;
    assert!(phase.is_trials());

    let mut short = vec![0u8; 10];
    assert!(matches!(
        renderer.render_frame(&phase, Some(&view), None, &mut short),
        Err(RenderError::FrameSize { expected: 12288, actual: 10 })
    ));

    let mut frame = vec![0u8; 64 * 48 * 4];
    renderer
        .render_frame(&phase, Some(&view), Some((1, 3)), &mut frame)
        .unwrap();
    assert_eq!(&frame[..], renderer.canvas().data());
}
