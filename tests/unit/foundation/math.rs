use super::*;

#[test]
fn clamp_channel_saturates_and_rounds() {
    assert_eq!(clamp_channel(-12.0), 0);
    assert_eq!(clamp_channel(300.0), 255);
    assert_eq!(clamp_channel(127.6), 128);
    assert_eq!(clamp_channel(f64::NAN), 0);
    assert_eq!(clamp_channel(f64::INFINITY), 255);
}
