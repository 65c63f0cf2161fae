use frame_relay::{FrameRequest, FrameResult, READY_TOKEN, Relay, RelayError};
use relay_base::{Landmark, Tensor};
use relay_image::ChannelOrder;
use relay_infer::{HandDetector, InferError, PoseDetector};
use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::rc::Rc;

/// Reports the first pixel as the single pose landmark; nothing on black
/// frames.
struct PixelPose {
    seen: Rc<RefCell<Vec<[u8; 3]>>>,
}

impl PoseDetector for PixelPose {
    fn detect_pose(&mut self, frame: &Tensor<u8>) -> Result<Option<Vec<Landmark>>, InferError> {
        let px = [frame.data[0], frame.data[1], frame.data[2]];
        self.seen.borrow_mut().push(px);
        if px == [0, 0, 0] {
            return Ok(None);
        }
        Ok(Some(vec![Landmark::new(
            px[0] as f32,
            px[1] as f32,
            px[2] as f32,
        )]))
    }
}

/// Two hands on frames wider than tall; panics or fails on request.
struct ShapeHands;

impl HandDetector for ShapeHands {
    fn detect_hands(
        &mut self,
        frame: &Tensor<u8>,
    ) -> Result<Option<Vec<Vec<Landmark>>>, InferError> {
        let (h, w) = frame.hw().unwrap();
        match frame.data[0] {
            200 => panic!("hand model exploded"),
            201 => Err(InferError::BackendError("hand model failed".to_string())),
            _ if w > h => Ok(Some(vec![
                vec![Landmark::new(0.1, 0.2, 0.3); 21],
                vec![Landmark::new(0.4, 0.5, 0.6); 21],
            ])),
            _ => Ok(None),
        }
    }
}

fn relay() -> (Relay<PixelPose, ShapeHands>, Rc<RefCell<Vec<[u8; 3]>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let pose = PixelPose { seen: seen.clone() };
    (Relay::new(pose, ShapeHands), seen)
}

fn frame_line(width: usize, height: usize, first: [u8; 3]) -> String {
    let mut data = vec![0u8; width * height * 3];
    data[..3].copy_from_slice(&first);
    serde_json::to_string(&FrameRequest {
        width,
        height,
        data,
    })
    .unwrap()
}

fn run_lines<P: PoseDetector, H: HandDetector>(relay: &mut Relay<P, H>, input: &str) -> Vec<String> {
    let mut output = Vec::new();
    relay.run(Cursor::new(input.as_bytes()), &mut output).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn parse(line: &str) -> FrameResult {
    serde_json::from_str(line).unwrap()
}

const EMPTY: &str = r#"{"pose_landmarks":[],"hand_landmarks":[]}"#;

#[test]
fn test_ready_then_nothing_on_empty_input() {
    let (mut relay, _) = relay();
    let lines = run_lines(&mut relay, "");
    assert_eq!(lines, vec![READY_TOKEN.to_string()]);
    assert_eq!(relay.stats().frames, 0);
}

#[test]
fn test_one_result_per_line_in_order() {
    let (mut relay, _) = relay();
    let input = format!(
        "{}\n{}\n{}\n",
        frame_line(2, 2, [10, 20, 30]),
        frame_line(3, 1, [0, 0, 0]),
        frame_line(1, 1, [40, 50, 60]),
    );

    let lines = run_lines(&mut relay, &input);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], READY_TOKEN);

    let first = parse(&lines[1]);
    assert_eq!(first.pose_landmarks, vec![Landmark::new(10.0, 20.0, 30.0)]);
    assert!(first.hand_landmarks.is_empty());

    let second = parse(&lines[2]);
    assert!(second.pose_landmarks.is_empty());
    assert_eq!(second.hand_landmarks.len(), 2);
    assert_eq!(second.hand_landmarks[0].len(), 21);
    assert_eq!(second.hand_landmarks[1][0], Landmark::new(0.4, 0.5, 0.6));

    let third = parse(&lines[3]);
    assert_eq!(third.pose_landmarks, vec![Landmark::new(40.0, 50.0, 60.0)]);
}

#[test]
fn test_last_line_without_newline_is_answered() {
    let (mut relay, _) = relay();
    let lines = run_lines(&mut relay, &frame_line(1, 1, [1, 2, 3]));
    assert_eq!(lines.len(), 2);
    assert_eq!(parse(&lines[1]).pose_landmarks.len(), 1);
}

#[test]
fn test_bad_lines_get_empty_results() {
    let (mut relay, seen) = relay();
    let input = [
        "not json".to_string(),
        String::new(),
        r#"{"width": 2, "height": 2}"#.to_string(),
        r#"{"width": 2, "height": 2, "data": [1, 2, 3]}"#.to_string(),
        r#"{"width": 0, "height": 0, "data": []}"#.to_string(),
        r#"{"width": 1, "height": 1, "data": [1, 2, 300]}"#.to_string(),
        frame_line(1, 1, [7, 8, 9]),
    ]
    .join("\n");

    let lines = run_lines(&mut relay, &input);
    assert_eq!(lines.len(), 8);
    for line in &lines[1..7] {
        assert_eq!(line, EMPTY);
    }
    assert_eq!(parse(&lines[7]).pose_landmarks.len(), 1);

    // bad lines never reach the detectors
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(relay.stats().frames, 7);
    assert_eq!(relay.stats().failed, 6);
}

#[test]
fn test_invalid_utf8_gets_empty_result() {
    let (mut relay, _) = relay();
    let mut input = vec![0xff, 0xfe, b'\n'];
    input.extend_from_slice(frame_line(1, 1, [1, 1, 1]).as_bytes());

    let mut output = Vec::new();
    relay.run(Cursor::new(input), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], EMPTY);
    assert_eq!(parse(lines[2]).pose_landmarks.len(), 1);
}

#[test]
fn test_detector_panic_and_error_recover() {
    let (mut relay, _) = relay();
    let input = format!(
        "{}\n{}\n{}\n",
        frame_line(1, 1, [200, 0, 0]),
        frame_line(1, 1, [201, 0, 0]),
        frame_line(1, 1, [5, 5, 5]),
    );

    let lines = run_lines(&mut relay, &input);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], EMPTY);
    assert_eq!(lines[2], EMPTY);
    assert_eq!(parse(&lines[3]).pose_landmarks, vec![Landmark::new(5.0, 5.0, 5.0)]);
    assert_eq!(relay.stats().failed, 2);
}

#[test]
fn test_process_frame_reports_panic() {
    let (mut relay, _) = relay();
    let request = FrameRequest {
        width: 1,
        height: 1,
        data: vec![200, 0, 0],
    };
    match relay.process_frame(request) {
        Err(RelayError::Panic(message)) => assert_eq!(message, "hand model exploded"),
        other => panic!("expected panic error, got {:?}", other),
    }
}

#[test]
fn test_bgr_frames_reach_detectors_as_rgb() {
    let (relay, seen) = relay();
    let mut relay = relay.with_channel_order(ChannelOrder::Bgr);

    let result = relay.process_line(frame_line(1, 1, [1, 2, 3]).as_bytes());
    assert_eq!(seen.borrow()[0], [3, 2, 1]);
    assert_eq!(result.pose_landmarks, vec![Landmark::new(3.0, 2.0, 1.0)]);
}

#[test]
fn test_write_failure_stops_the_relay() {
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let (mut relay, _) = relay();
    let result = relay.run(Cursor::new(b"x\n".to_vec()), Closed);
    assert!(matches!(result, Err(RelayError::Io(_))));
}

#[test]
fn test_shutdown_returns_counters() {
    let (mut relay, _) = relay();
    relay.process_line(b"{}");
    relay.process_line(frame_line(1, 1, [1, 1, 1]).as_bytes());

    let stats = relay.shutdown();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.failed, 1);
}
