use super::*;

fn small_config() -> AnimationConfig {
    AnimationConfig {
        screen_width: 64,
        screen_height: 32,
        total_frames: 4,
        circle_radius: 8.0,
        circle_color: Rgba8::rgb(255, 0, 0),
        background_color: Rgba8::rgb(0, 0, 255),
        ..AnimationConfig::default()
    }
}

fn render_default_at(r: &mut CpuRenderer, x: f64, y: f64) -> FrameBuffer {
    r.begin_frame();
    r.draw_default(x, y).unwrap();
    r.end_frame().unwrap();
    r.extract_pixels().unwrap().clone()
}

#[test]
fn default_frame_has_background_and_circle() {
    let mut r = CpuRenderer::new(&small_config(), CpuRendererOpts::default()).unwrap();
    let f = render_default_at(&mut r, 20.0, 16.0);

    assert_eq!(f.width, 64);
    assert_eq!(f.height, 32);
    assert_eq!(f.data().len(), 64 * 32 * 3);
    assert_eq!(f.pixel(20, 16), Some([255, 0, 0]));
    assert_eq!(f.pixel(0, 0), Some([0, 0, 255]));
    assert_eq!(f.pixel(60, 30), Some([0, 0, 255]));
}

#[test]
fn render_is_deterministic() {
    let cfg = small_config();
    let mut a = CpuRenderer::new(&cfg, CpuRendererOpts::default()).unwrap();
    let mut b = CpuRenderer::new(&cfg, CpuRendererOpts::default()).unwrap();

    let fa = render_default_at(&mut a, 30.5, 10.0);
    let fb = render_default_at(&mut b, 30.5, 10.0);
    assert_eq!(fa, fb);

    // Re-rendering on a used surface must not leak the previous frame.
    let _ = render_default_at(&mut a, 5.0, 5.0);
    let again = render_default_at(&mut a, 30.5, 10.0);
    assert_eq!(again, fa);
}

#[test]
fn rectangle_and_line_land_on_expected_pixels() {
    let mut r = CpuRenderer::new(&small_config(), CpuRendererOpts::default()).unwrap();
    r.begin_frame();
    r.paint(&DrawCommand::rectangle(0.0, 0.0, 10.0, 10.0, Rgba8::rgb(0, 255, 0)).unwrap())
        .unwrap();
    r.paint(&DrawCommand::Line {
        from: Point::new(0.0, 20.5),
        to: Point::new(64.0, 20.5),
        color: Rgba8::WHITE,
    })
    .unwrap();
    r.end_frame().unwrap();
    let f = r.extract_pixels().unwrap();

    assert_eq!(f.pixel(5, 5), Some([0, 255, 0]));
    assert_eq!(f.pixel(15, 5), Some([0, 0, 255]));
    assert_eq!(f.pixel(32, 20), Some([255, 255, 255]));
}

#[test]
fn text_without_font_is_skipped() {
    let mut r = CpuRenderer::new(&small_config(), CpuRendererOpts::default()).unwrap();
    r.begin_frame();
    r.paint(&DrawCommand::Text {
        text: "hello".to_string(),
        origin: Point::new(0.0, 0.0),
        font_size: 12.0,
        color: Rgba8::WHITE,
    })
    .unwrap();
    r.end_frame().unwrap();
    let f = r.extract_pixels().unwrap();
    assert!(f.data().chunks_exact(3).all(|px| px == [0, 0, 255]));
}

#[test]
fn frame_protocol_is_enforced() {
    let mut r = CpuRenderer::new(&small_config(), CpuRendererOpts::default()).unwrap();
    assert!(r.end_frame().is_err());
    assert!(r.draw_default(1.0, 1.0).is_err());

    r.begin_frame();
    assert!(r.extract_pixels().is_err());
}

#[test]
fn invalid_command_is_rejected_before_drawing() {
    let mut r = CpuRenderer::new(&small_config(), CpuRendererOpts::default()).unwrap();
    r.begin_frame();
    let err = r
        .paint(&DrawCommand::Circle {
            center: Point::new(1.0, 1.0),
            radius: f64::INFINITY,
            color: Rgba8::WHITE,
        })
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn text_glyphs_advance_along_the_line_below_the_origin() {
    let cfg = AnimationConfig {
        screen_width: 200,
        screen_height: 100,
        background_color: Rgba8::BLACK,
        ..AnimationConfig::default()
    };
    let font_path =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSansMono.ttf");
    let font = std::fs::read(font_path).unwrap();
    let mut r = CpuRenderer::new(
        &cfg,
        CpuRendererOpts {
            font_bytes: Some(font),
        },
    )
    .unwrap();

    r.begin_frame();
    r.paint(&DrawCommand::Text {
        text: "HHHHHHHH".to_string(),
        origin: Point::new(20.0, 20.0),
        font_size: 24.0,
        color: Rgba8::WHITE,
    })
    .unwrap();
    r.end_frame().unwrap();
    let f = r.extract_pixels().unwrap();

    let lit: Vec<(u32, u32)> = (0..f.height)
        .flat_map(|y| (0..f.width).map(move |x| (x, y)))
        .filter(|&(x, y)| f.pixel(x, y) != Some([0, 0, 0]))
        .collect();
    assert!(!lit.is_empty());

    let min_x = lit.iter().map(|&(x, _)| x).min().unwrap();
    let max_x = lit.iter().map(|&(x, _)| x).max().unwrap();
    let min_y = lit.iter().map(|&(_, y)| y).min().unwrap();
    // Eight monospace glyphs at 24px span roughly 110px; one glyph is about 14px wide.
    assert!(max_x - min_x > 60, "glyphs span x {min_x}..={max_x}");
    assert!(min_y >= 20, "ink starts at y {min_y}, above the origin");
}
