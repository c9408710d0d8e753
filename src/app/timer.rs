use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::app::AppEvent;

/// How often a sleeping timer wakes up to check its stop flag
const TIMER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Background clock for one round. Sends [`AppEvent::Tick`] tagged with the
/// round's generation every `tick_duration` until stopped.
pub struct Timer {
    should_stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn start(generation: u64, tick_duration: Duration, app_event_tx: Sender<AppEvent>) -> Self {
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_timer = should_stop.clone();
        let handle = std::thread::spawn(move || {
            run_timer(generation, tick_duration, &should_stop_for_timer, app_event_tx)
        });
        Timer {
            should_stop,
            handle: Some(handle),
        }
    }

    /// Stop the clock and wait for its thread. No ticks are sent after this returns.
    pub fn stop(&mut self) {
        self.should_stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("[timer] Timer thread panicked");
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_timer(
    generation: u64,
    tick_duration: Duration,
    should_stop: &AtomicBool,
    app_event_tx: Sender<AppEvent>,
) {
    tracing::debug!("[timer] Timer {} started", generation);
    // Deadlines are computed from the start time so ticks don't drift
    let start_time = Instant::now();
    let mut ticks = 1u32;
    loop {
        let deadline = start_time + tick_duration * ticks;
        loop {
            if should_stop.load(Ordering::Acquire) {
                tracing::debug!("[timer] Timer {} stopped", generation);
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(TIMER_POLL_INTERVAL));
        }
        if app_event_tx.send(AppEvent::Tick { generation }).is_err() {
            // Receiver has been dropped, exit the thread
            return;
        }
        ticks += 1;
    }
}
