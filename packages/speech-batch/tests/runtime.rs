//! Shutdown of the binary's runtime after an abandoned generation.

use std::sync::mpsc;
use std::time::Duration;

use speech_batch::domain::{GenerationError, GenerationRequest, GeneratorLoader, SpeechGenerator};
use speech_batch::runtime::{SHUTDOWN_GRACE, build_runtime, shutdown};
use speech_batch::{BatchConfig, CancelFlag, FailureKind, NullObserver, WavWriter, convert_batch};
use tempfile::TempDir;

/// Never answers for `hang`; answers immediately otherwise.
struct Stuck;

impl SpeechGenerator for Stuck {
    fn sample_rate(&self) -> u32 {
        8_000
    }

    fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<f32>, GenerationError> {
        if request.text == "hang" {
            std::thread::sleep(Duration::from_secs(600));
        }
        Ok(vec![0.1; 800])
    }

    fn supports_concurrent_calls(&self) -> bool {
        true
    }
}

struct StuckLoader;

impl GeneratorLoader for StuckLoader {
    type Generator = Stuck;

    fn load(&self) -> Result<Stuck, GenerationError> {
        Ok(Stuck)
    }

    fn describe(&self) -> String {
        "stuck".to_string()
    }
}

#[test]
fn shutdown_returns_while_a_timed_out_call_is_still_running() {
    let dir = TempDir::new().unwrap();
    let config = BatchConfig {
        texts: vec!["hang".into(), "ok".into()],
        output_directory: dir.path().join("output"),
        generation_timeout_ms: Some(100),
        ..BatchConfig::default()
    };

    let rt = build_runtime().unwrap();
    let summary = rt
        .block_on(convert_batch(
            &config,
            StuckLoader,
            WavWriter,
            &CancelFlag::new(),
            &mut NullObserver,
        ))
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Timeout);

    let (done_tx, done_rx) = mpsc::channel();
    std::thread::spawn(move || {
        shutdown(rt);
        let _ = done_tx.send(());
    });
    done_rx
        .recv_timeout(SHUTDOWN_GRACE + Duration::from_secs(5))
        .expect("runtime shutdown did not return");
}
