//! Frame-to-timecode conversion tests.

use framecut::{FrameRate, FramecutError, Timecode, VideoMetadata, frame_to_time};

fn has_timecode_shape(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 {
        return false;
    }
    let digits = |text: &str| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    let Some((seconds, millis)) = parts[2].split_once('.') else {
        return false;
    };
    parts[0].len() >= 2
        && digits(parts[0])
        && parts[1].len() == 2
        && digits(parts[1])
        && seconds.len() == 2
        && digits(seconds)
        && millis.len() == 3
        && digits(millis)
}

#[test]
fn frame_zero_is_origin() {
    for fps in [1.0, 23.976, 24.0, 25.0, 29.97, 30.0, 60.0, 120.0] {
        assert_eq!(frame_to_time(0, fps).unwrap().as_str(), "00:00:00.000");
    }
}

#[test]
fn one_minute_at_thirty_fps() {
    assert_eq!(frame_to_time(1800, 30.0).unwrap().as_str(), "00:01:00.000");
}

#[test]
fn hours_minutes_and_millis() {
    // 1 h 2 min 3.5 s at 24 fps.
    let frame = (3600 + 120 + 3) * 24 + 12;
    assert_eq!(frame_to_time(frame, 24.0).unwrap().as_str(), "01:02:03.500");
}

#[test]
fn hours_grow_past_two_digits() {
    let frame = 100 * 3600 * 25;
    assert_eq!(frame_to_time(frame, 25.0).unwrap().as_str(), "100:00:00.000");
}

#[test]
fn displayed_seconds_are_rounded() {
    // 1 / 30 s = 33.333.. ms; 2 / 30 s = 66.666.. ms.
    assert_eq!(frame_to_time(1, 30.0).unwrap().as_str(), "00:00:00.033");
    assert_eq!(frame_to_time(2, 30.0).unwrap().as_str(), "00:00:00.067");
}

#[test]
fn rounding_carries_into_minutes() {
    // 59.99996 s rounds up to a full minute instead of showing 60.000 s.
    let timecode = frame_to_time(5_999_996, 100_000.0).unwrap();
    assert_eq!(timecode.as_str(), "00:01:00.000");
}

#[test]
fn ntsc_rate_matches_expected_position() {
    let rate: FrameRate = "30000/1001".parse().unwrap();
    // 1800 frames at 29.97 fps = 60.06 s.
    let timecode = Timecode::from_frame(1800, &rate).unwrap();
    assert_eq!(timecode.as_str(), "00:01:00.060");
}

#[test]
fn output_shape_and_round_trip() {
    let rates = [1.0, 12.5, 23.976, 24.0, 29.97, 30.0, 59.94, 60.0, 144.0];
    let frames = [0, 1, 7, 59, 1799, 1800, 43_157, 86_399, 1_000_003, 9_999_991];

    for fps in rates {
        for frame in frames {
            let timecode = frame_to_time(frame, fps).unwrap();
            assert!(
                has_timecode_shape(timecode.as_str()),
                "bad shape for frame {frame} @ {fps}: {timecode}",
            );
            let expected = frame as f64 / fps;
            assert!(
                (timecode.seconds() - expected).abs() <= 0.001,
                "frame {frame} @ {fps}: {timecode} is {} s, expected {expected} s",
                timecode.seconds(),
            );
        }
    }
}

#[test]
fn parsed_timecode_round_trips() {
    let timecode: Timecode = "01:02:03.456".parse().unwrap();
    assert!((timecode.seconds() - 3723.456).abs() < 1e-9);
    assert_eq!(timecode.to_string(), "01:02:03.456");
}

#[test]
fn malformed_timecodes_are_rejected() {
    let malformed = [
        "",
        "1:02:03.456",
        "01:2:03.456",
        "01:02:03",
        "01:02:03.45",
        "01:60:00.000",
        "aa:bb:cc.ddd",
    ];
    for value in malformed {
        let result = value.parse::<Timecode>();
        assert!(
            matches!(result, Err(FramecutError::InvalidTimecode(_))),
            "{value:?} should not parse",
        );
    }
}

#[test]
fn invalid_frame_rate_is_an_error() {
    for fps in [0.0, -24.0, f64::NAN, f64::INFINITY] {
        let result = frame_to_time(10, fps);
        assert!(
            matches!(result, Err(FramecutError::InvalidFrameRate(_))),
            "{fps} fps should be rejected",
        );
    }
}

#[test]
fn negative_frame_is_an_error() {
    let result = frame_to_time(-1, 24.0);
    assert!(matches!(result, Err(FramecutError::InvalidFrameNumber(-1))));
}

#[test]
fn frame_rate_parsing() {
    let rate: FrameRate = "24000/1001".parse().unwrap();
    assert_eq!(rate.numerator(), 24000.0);
    assert_eq!(rate.denominator(), 1001.0);

    let bare: FrameRate = "25".parse().unwrap();
    assert_eq!(bare.frames_per_second(), 25.0);

    for value in ["", "30/0", "0/1", "-30/1", "thirty", "30/", "/1", "1/2/3"] {
        assert!(
            matches!(value.parse::<FrameRate>(), Err(FramecutError::InvalidFrameRate(_))),
            "{value:?} should not parse",
        );
    }
}

#[test]
fn frame_rate_serde_round_trip() {
    let rate: FrameRate = "24000/1001".parse().unwrap();
    let value = serde_json::to_value(rate).unwrap();
    assert_eq!(value, serde_json::json!({"numerator": 24000.0, "denominator": 1001.0}));
    assert_eq!(serde_json::from_value::<FrameRate>(value).unwrap(), rate);
}

#[test]
fn deserializing_rejects_invalid_frame_rate() {
    for (numerator, denominator) in [(0.0, 0.0), (24.0, 0.0), (0.0, 1.0), (-30.0, 1.0)] {
        let value = serde_json::json!({"numerator": numerator, "denominator": denominator});
        assert!(
            serde_json::from_value::<FrameRate>(value).is_err(),
            "{numerator}/{denominator} should be rejected",
        );
    }

    let metadata = serde_json::json!({
        "frame_count": 10,
        "frame_rate": {"numerator": 0.0, "denominator": 0.0},
    });
    assert!(serde_json::from_value::<VideoMetadata>(metadata).is_err());
}
