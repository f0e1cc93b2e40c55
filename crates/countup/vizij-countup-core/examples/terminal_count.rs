//! Count from 0 to 1,234,567.89 in the terminal using the interval clock.
//!
//! cargo run -p vizij-countup-core --example terminal_count

use std::io::Write;
use std::thread;
use std::time::Duration;

use vizij_countup_core::{AnimationConfig, Animator, CountEvent, IntervalClock};

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cfg = AnimationConfig::new(0.0, 1_234_567.89)
        .with_duration(2000.0)
        .with_decimals(2)
        .with_prefix("$");
    let mut counter = Animator::new(cfg, IntervalClock::new())?;
    counter.mount();

    let mut stdout = std::io::stdout();
    loop {
        let Some((frame, due)) = counter.clock().next_due() else {
            break;
        };
        let now = counter.clock_mut().now();
        if due > now {
            thread::sleep(Duration::from_secs_f64((due - now) / 1000.0));
        }
        let out = counter.tick(frame, due);
        if let Some(text) = out.text() {
            write!(stdout, "\r{text:>16}")?;
            stdout.flush()?;
        }
        for event in &out.events {
            if let CountEvent::Finished { value } = event {
                writeln!(stdout, "\ndone at {value}")?;
            }
        }
    }
    Ok(())
}
