//! Integration tests for SharedEngine

mod common;
use common::*;

use rgb_crossfade::{
    BLUE, CrossfadeEngine, CrossfadeError, DelayNs, EngineState, FadeOutcome, GREEN,
    LightCommand, RED, SharedEngine, Show,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Delay that parks the first sleep until the test lets it go.
struct GateDelay {
    started: Option<Sender<()>>,
    resume: Receiver<()>,
}

impl DelayNs for GateDelay {
    fn delay_ns(&mut self, _ns: u32) {
        if let Some(started) = self.started.take() {
            let _ = started.send(());
            let _ = self.resume.recv();
        }
    }
}

type GatedEngine = SharedEngine<RecordingOutput, GateDelay>;

/// Shared engine whose first fade step blocks until `resume` is sent.
fn gated_engine(resolution: u32) -> (GatedEngine, Receiver<()>, Sender<()>) {
    let (started_tx, started_rx) = mpsc::channel();
    let (resume_tx, resume_rx) = mpsc::channel();
    let delay = GateDelay {
        started: Some(started_tx),
        resume: resume_rx,
    };
    let engine = CrossfadeEngine::new(RecordingOutput::new(), delay, resolution).unwrap();
    (SharedEngine::new(engine), started_rx, resume_tx)
}

#[test_log::test]
fn overlapping_requests_are_rejected_while_fading() {
    let (shared, started, resume) = gated_engine(10);

    let worker = {
        let shared = shared.clone();
        thread::spawn(move || shared.fade_to(RED, Duration::from_millis(10)))
    };
    started.recv().unwrap();

    assert_eq!(shared.state(), EngineState::Fading);
    assert_eq!(
        shared.fade_to(BLUE, Duration::from_millis(10)),
        Err(CrossfadeError::Busy)
    );
    assert_eq!(shared.set_color(GREEN), Err(CrossfadeError::Busy));
    assert_eq!(shared.current_color(), Err(CrossfadeError::Busy));

    resume.send(()).unwrap();
    assert_eq!(worker.join().unwrap(), Ok(FadeOutcome::Completed));

    assert_eq!(shared.state(), EngineState::Idle);
    assert!(colors_equal(shared.current_color().unwrap(), RED));
}

#[test]
fn cancel_stops_running_fade_and_next_fade_runs() {
    let (shared, started, resume) = gated_engine(10);

    let worker = {
        let shared = shared.clone();
        thread::spawn(move || shared.run_show(3, Duration::from_millis(30), &[RED, GREEN, BLUE]))
    };
    started.recv().unwrap();
    shared.cancel();
    resume.send(()).unwrap();

    assert_eq!(worker.join().unwrap(), Ok(FadeOutcome::Cancelled));
    let held = shared.current_color().unwrap();
    assert!(colors_equal(held, RED / 10.0), "holds the first step");

    // the token is cleared when the next fade starts
    assert_eq!(
        shared.fade_to(BLUE, Duration::ZERO),
        Ok(FadeOutcome::Completed)
    );
    assert!(colors_equal(shared.current_color().unwrap(), BLUE));
}

#[test]
fn commands_dispatch_through_the_handle() {
    let (shared, _started, resume) = gated_engine(4);
    drop(resume);

    shared
        .handle_command::<1>(LightCommand::Set(GREEN))
        .unwrap();
    assert_eq!(shared.current_color(), Ok(GREEN));

    let show = Show::<1>::builder()
        .leg(RED)
        .unwrap()
        .period(Duration::ZERO)
        .build();
    assert_eq!(
        shared.handle_command(LightCommand::Play(show)),
        Ok(FadeOutcome::Completed)
    );
    assert!(colors_equal(shared.current_color().unwrap(), rgb_crossfade::OFF));
}

#[test]
fn release_requires_the_last_handle() {
    let (shared, _started, resume) = gated_engine(4);
    drop(resume);
    let other = shared.clone();

    assert!(matches!(shared.release(), Err(CrossfadeError::Busy)));

    let output = other.release().unwrap();
    assert_eq!(output.last(), Some(rgb_crossfade::OFF));
}

#[test]
fn closed_engine_rejects_late_requests() {
    let (shared, _started, resume) = gated_engine(4);
    drop(resume);
    shared.set_color(GREEN).unwrap();

    shared.close();

    assert!(shared.is_closed());
    assert_eq!(shared.fade_to(RED, Duration::ZERO), Err(CrossfadeError::Busy));
    assert_eq!(
        shared.handle_command::<1>(LightCommand::fade(BLUE)),
        Err(CrossfadeError::Busy)
    );
    assert_eq!(shared.set_color(RED), Err(CrossfadeError::Busy));
    assert_eq!(shared.state(), EngineState::Idle);

    let output = shared.release().unwrap();
    assert!(colors_equal(output.vectors()[1], GREEN), "no fade ran after close");
    assert_eq!(output.last(), Some(rgb_crossfade::OFF));
}

#[test]
fn close_cancels_the_running_fade() {
    let (shared, started, resume) = gated_engine(10);

    let worker = {
        let shared = shared.clone();
        thread::spawn(move || shared.run_show(2, Duration::from_millis(20), &[RED, BLUE]))
    };
    started.recv().unwrap();
    shared.close();
    resume.send(()).unwrap();

    assert_eq!(worker.join().unwrap(), Ok(FadeOutcome::Cancelled));
    assert!(colors_equal(shared.release().unwrap().vectors()[1], RED / 10.0));
}
