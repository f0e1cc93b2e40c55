use std::cell::Cell;
use std::rc::Rc;

use vizij_countup_core::{AnimationConfig, Animator, IntervalClock, Phase, FALLBACK_FRAME_MS};

fn shared_time() -> (Rc<Cell<f64>>, IntervalClock) {
    let t = Rc::new(Cell::new(0.0));
    let src = t.clone();
    (t, IntervalClock::with_time_source(move || src.get()))
}

/// Drive the animator the way a native host loop would: jump the time source to the
/// due time of the next frame and deliver it with that timestamp.
fn pump(a: &mut Animator<IntervalClock>, time: &Cell<f64>) -> Option<String> {
    let (frame, due) = a.clock().next_due()?;
    time.set(due);
    a.tick(frame, due).text().map(str::to_owned)
}

/// it should pace frames 16ms apart and finish exactly on the end value
#[test]
fn interval_clock_drives_full_run() {
    let (time, clock) = shared_time();
    let cfg = AnimationConfig::new(0.0, 160.0)
        .with_duration(160.0)
        .linear();
    let mut a = Animator::new(cfg, clock).unwrap();
    time.set(1000.0);
    a.start();

    let mut seen = Vec::new();
    while let Some(text) = pump(&mut a, &time) {
        seen.push(text);
    }
    assert_eq!(a.phase(), Phase::Finished);
    assert_eq!(seen.first().map(String::as_str), Some("0"));
    assert_eq!(seen.get(1).map(String::as_str), Some("16"));
    assert_eq!(seen.last().map(String::as_str), Some("160"));
    // 0, 16, ..., 160 → 11 frames
    assert_eq!(seen.len(), 11);
    assert_eq!(a.display_value(), "160");
}

/// it should fire at once when the host is already past the pacing interval
#[test]
fn late_host_gets_immediate_frames() {
    let (time, clock) = shared_time();
    let cfg = AnimationConfig::new(0.0, 10.0).with_duration(1000.0).linear();
    let mut a = Animator::new(cfg, clock).unwrap();
    time.set(500.0);
    a.start();
    let (first, due) = a.clock().next_due().unwrap();
    assert_eq!(due, 500.0);
    a.tick(first, due);

    // Host stalls for 200ms before the next request is serviced.
    time.set(700.0 + FALLBACK_FRAME_MS);
    let (second, due) = a.clock().next_due().unwrap();
    assert_eq!(due, 516.0);
    a.tick(second, time.get());
    let (_, due) = a.clock().next_due().unwrap();
    assert_eq!(due, time.get(), "late request should not be delayed further");
}

/// it should drop the pending registration on pause and reset
#[test]
fn pause_and_reset_clear_pending_frames() {
    let (time, clock) = shared_time();
    let mut a = Animator::new(AnimationConfig::new(0.0, 5.0), clock).unwrap();
    time.set(10.0);
    a.start();
    assert!(a.clock().next_due().is_some());
    a.pause();
    assert!(a.clock().next_due().is_none());
    a.resume();
    assert!(a.clock().next_due().is_some());
    a.reset();
    assert!(a.clock().next_due().is_none());
    assert_eq!(a.display_value(), "0");
}

/// it should honour a custom pacing interval
#[test]
fn custom_interval() {
    let (time, clock) = shared_time();
    let clock = clock.with_interval(40.0);
    let cfg = AnimationConfig::new(0.0, 100.0).with_duration(100.0).linear();
    let mut a = Animator::new(cfg, clock).unwrap();
    time.set(1000.0);
    a.start();
    let mut stamps = Vec::new();
    while let Some((frame, due)) = a.clock().next_due() {
        time.set(due);
        stamps.push(due);
        a.tick(frame, due);
    }
    assert_eq!(stamps, vec![1000.0, 1040.0, 1080.0, 1120.0]);
    assert_eq!(a.display_value(), "100");
}
