//! Shared test infrastructure for rgb-crossfade integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use rgb_crossfade::{Channel, ColorVector, CrossfadeEngine, DelayNs, PwmError, PwmOutput};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock PWM output
// ============================================================================

/// Output that assembles channel writes into the vectors it was sent.
///
/// Can be told to fail on the red write of fade step `k` (1-based; the off
/// vector written when the engine is built does not count).
pub struct RecordingOutput {
    vectors: Vec<ColorVector>,
    pending: ColorVector,
    fail_on_vector: Option<usize>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self {
            vectors: Vec::new(),
            pending: ColorVector::default(),
            fail_on_vector: None,
        }
    }

    pub fn failing_on(step: usize) -> Self {
        Self {
            fail_on_vector: Some(step + 1),
            ..Self::new()
        }
    }

    /// Every complete vector written so far.
    pub fn vectors(&self) -> &[ColorVector] {
        &self.vectors
    }

    pub fn last(&self) -> Option<ColorVector> {
        self.vectors.last().copied()
    }
}

impl PwmOutput for RecordingOutput {
    fn set_duty_cycle(&mut self, channel: Channel, percent: f32) -> Result<(), PwmError> {
        if channel == Channel::Red && self.fail_on_vector == Some(self.vectors.len() + 1) {
            return Err(PwmError {
                channel,
                kind: ErrorKind::Other,
            });
        }

        match channel {
            Channel::Red => self.pending.red = percent,
            Channel::Green => self.pending.green = percent,
            Channel::Blue => {
                self.pending.blue = percent;
                self.vectors.push(self.pending);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Mock delay
// ============================================================================

/// Delay that only adds up the requested time.
///
/// Clones share the total, so a test can keep one while the engine owns another.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    total_ns: Arc<AtomicU64>,
}

impl RecordingDelay {
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_ns.load(Ordering::SeqCst))
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.fetch_add(u64::from(ns), Ordering::SeqCst);
    }
}

pub type TestEngine = CrossfadeEngine<RecordingOutput, RecordingDelay>;

pub fn engine(resolution: u32) -> TestEngine {
    engine_with(RecordingOutput::new(), resolution)
}

pub fn engine_with(output: RecordingOutput, resolution: u32) -> TestEngine {
    CrossfadeEngine::new(output, RecordingDelay::default(), resolution).unwrap()
}

/// Vectors written by fades, without the off vector written at construction.
pub fn emitted(engine: &TestEngine) -> &[ColorVector] {
    &engine.output().vectors()[1..]
}

// ============================================================================
// Mock PWM channel
// ============================================================================

/// `embedded_hal` PWM channel recording every duty it receives.
///
/// The duty log is shared so tests can inspect it after the channel moved
/// into a sink.
#[derive(Clone)]
pub struct MockPwm {
    max_duty: u16,
    log: Arc<Mutex<Vec<u16>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockPwm {
    pub fn new(max_duty: u16) -> Self {
        Self {
            max_duty,
            log: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn duties(&self) -> Vec<u16> {
        self.log.lock().unwrap().clone()
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.log.lock().unwrap().last().copied()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap() = failing;
    }
}

#[derive(Debug)]
pub struct MockPwmError;

impl embedded_hal::pwm::Error for MockPwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockPwm {
    type Error = MockPwmError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if *self.fail.lock().unwrap() {
            return Err(MockPwmError);
        }
        self.log.lock().unwrap().push(duty);
        Ok(())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: ColorVector, b: ColorVector) -> bool {
    colors_equal_epsilon(a, b, 0.01)
}

/// Compare two colors with custom epsilon
pub fn colors_equal_epsilon(a: ColorVector, b: ColorVector, epsilon: f32) -> bool {
    a.max_distance(b) <= epsilon
}
