use crate::{FrameRequest, FrameResult, READY_TOKEN, RelayError};
use relay_image::{ChannelOrder, to_rgb};
use relay_infer::{HandDetector, InferError, PoseDetector};
use std::any::Any;
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    /// Input lines handled.
    pub frames: u64,
    /// Lines answered with an empty result because of an error.
    pub failed: u64,
}

/// Owns both detectors and answers one frame at a time.
pub struct Relay<P, H> {
    pose: P,
    hands: H,
    channel_order: ChannelOrder,
    stats: RelayStats,
}

impl<P: PoseDetector, H: HandDetector> Relay<P, H> {
    pub fn new(pose: P, hands: H) -> Self {
        Self {
            pose,
            hands,
            channel_order: ChannelOrder::Rgb,
            stats: RelayStats::default(),
        }
    }

    /// Channel order of incoming frames; BGR frames are swapped to RGB
    /// before detection.
    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Answer one raw input line. Never fails: any problem is logged and
    /// turned into the empty result.
    pub fn process_line(&mut self, line: &[u8]) -> FrameResult {
        self.stats.frames += 1;
        let outcome = FrameRequest::parse(line).and_then(|request| self.process_frame(request));
        match outcome {
            Ok(result) => result,
            Err(e) => {
                self.stats.failed += 1;
                log::warn!("frame {}: {}", self.stats.frames, e);
                FrameResult::empty()
            }
        }
    }

    /// Run both detectors on one request.
    pub fn process_frame(&mut self, request: FrameRequest) -> Result<FrameResult, RelayError> {
        let mut frame = request.into_frame()?;
        to_rgb(&mut frame, self.channel_order);

        let pose = &mut self.pose;
        let hands = &mut self.hands;
        let detected = panic::catch_unwind(AssertUnwindSafe(|| -> Result<_, InferError> {
            let pose_landmarks = pose.detect_pose(&frame)?.unwrap_or_default();
            let hand_landmarks = hands.detect_hands(&frame)?.unwrap_or_default();
            Ok(FrameResult {
                pose_landmarks,
                hand_landmarks,
            })
        }));

        match detected {
            Ok(result) => Ok(result?),
            Err(payload) => Err(RelayError::Panic(panic_message(payload.as_ref()))),
        }
    }

    /// Announce readiness, then answer every input line until end of input.
    /// Fails only when reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<RelayStats, RelayError> {
        writeln!(output, "{READY_TOKEN}")?;
        output.flush()?;
        log::info!("relay ready");

        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                log::info!("end of input after {} frames", self.stats.frames);
                return Ok(self.stats);
            }

            let result = self.process_line(&line);
            writeln!(output, "{}", result.to_line()?)?;
            output.flush()?;
        }
    }

    /// Release both detectors.
    pub fn shutdown(self) -> RelayStats {
        log::info!(
            "relay shut down: {} frames, {} failed",
            self.stats.frames,
            self.stats.failed
        );
        self.stats
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
