use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = AnimationConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas().width, 1920);
    assert_eq!(cfg.canvas().height, 1080);
    assert_eq!(cfg.frame_rate().unwrap().get(), 30);
    assert_eq!(cfg.total_frames, 600);
}

#[test]
fn validation_names_the_field() {
    let cfg = AnimationConfig {
        total_frames: 0,
        ..AnimationConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
    assert!(err.to_string().contains("totalFrames"));

    let cfg = AnimationConfig {
        screen_width: 70_000,
        ..AnimationConfig::default()
    };
    assert!(cfg.validate().unwrap_err().to_string().contains("screenWidth"));

    let cfg = AnimationConfig {
        circle_radius: -1.0,
        ..AnimationConfig::default()
    };
    assert!(cfg.validate().unwrap_err().to_string().contains("circleRadius"));
}

#[test]
fn json_uses_script_global_names() {
    let json = serde_json::to_value(AnimationConfig::default()).unwrap();
    assert_eq!(json["screenWidth"], 1920);
    assert_eq!(json["totalFrames"], 600);
    assert_eq!(json["backgroundColor"]["a"], 255);
    assert!(json.get("fontPath").is_none());
}
