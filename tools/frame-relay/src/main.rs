use anyhow::Context;
use frame_relay::{Relay, RelayConfig};
use relay_base::{init_file_logger, init_stderr_logger};
use relay_infer::{OnnxBackend, OnnxHandDetector, OnnxPoseDetector};
use std::io;
use std::path::Path;
use std::process::ExitCode;

fn init_logging(log_dir: Option<&Path>) -> bool {
    if let Some(dir) = log_dir {
        match init_file_logger(dir) {
            Ok(()) => return true,
            Err(e) => {
                init_stderr_logger();
                log::warn!("cannot log to {}: {}, using stderr", dir.display(), e);
                return false;
            }
        }
    }
    init_stderr_logger();
    false
}

fn run(config: RelayConfig) -> anyhow::Result<()> {
    config.validate()?;
    log::info!(
        "models from {}, device {}, {:?} frames",
        config.model_dir.display(),
        config.device,
        config.channel_order
    );

    let backend = OnnxBackend::new(config.device.clone());
    let pose = OnnxPoseDetector::new(&backend, &config.model_dir, config.pose.clone())
        .context("failed to initialize pose detector")?;
    let hands = OnnxHandDetector::new(&backend, &config.model_dir, config.hands.clone())
        .context("failed to initialize hand detector")?;
    let mut relay = Relay::new(pose, hands).with_channel_order(config.channel_order);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = relay.run(stdin.lock(), stdout.lock());
    relay.shutdown();
    outcome.context("relay stopped")?;
    Ok(())
}

fn main() -> ExitCode {
    let config = RelayConfig::load();
    let log_dir = config.as_ref().ok().and_then(|c| c.log_dir.clone());
    let to_file = init_logging(log_dir.as_deref());

    match config
        .context("failed to load configuration")
        .and_then(run)
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            if to_file {
                eprintln!("frame-relay: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
