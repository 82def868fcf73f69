use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30).unwrap(),
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    let frame = FrameBuffer::new(Canvas {
        width: 4,
        height: 2,
    });
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg(4, 2)));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
}

#[test]
fn in_memory_sink_requires_begin() {
    let mut sink = InMemorySink::new();
    let frame = FrameBuffer::new(Canvas {
        width: 2,
        height: 2,
    });
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn check_frame_rejects_size_mismatch() {
    let frame = FrameBuffer::new(Canvas {
        width: 2,
        height: 2,
    });
    let err = cfg(4, 2).check_frame(&frame).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("2x2"));
}
