use super::*;

fn cfg(width: u32, height: u32, total_frames: u64) -> AnimationConfig {
    AnimationConfig {
        screen_width: width,
        screen_height: height,
        total_frames,
        ..AnimationConfig::default()
    }
}

#[test]
fn default_canvas_path() {
    let path = MotionPath::for_config(&cfg(1920, 1080, 600));
    assert_eq!(path.step(), 1720.0 / 600.0);
    assert_eq!(path.start(), Point::new(100.0, 540.0));
    assert_eq!(path.position(FrameIndex(0)), Point::new(100.0, 540.0));
    assert_eq!(path.position(FrameIndex(10)).x, 100.0 + 10.0 * path.step());
}

#[test]
fn positions_follow_the_closed_form() {
    let path = MotionPath::for_config(&cfg(1920, 1080, 60));
    let step = (1920.0 - 200.0) / 60.0;
    for i in 0..60u64 {
        let p = path.position(FrameIndex(i));
        assert_eq!(p.x, 100.0 + i as f64 * step);
        assert_eq!(p.y, 540.0);
    }
}

#[test]
fn final_frame_stops_one_step_short() {
    let path = MotionPath::for_config(&cfg(400, 100, 4));
    assert_eq!(path.step(), 50.0);
    assert_eq!(path.position(FrameIndex(3)).x, 250.0);
}

#[test]
fn narrow_canvas_moves_left() {
    let path = MotionPath::for_config(&cfg(100, 10, 10));
    assert_eq!(path.step(), -10.0);
    assert_eq!(path.position(FrameIndex(1)).x, 90.0);
}
