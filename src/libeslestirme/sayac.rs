use log::{debug, warn};
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Elapsed {
    pub minutes: u32,
    pub seconds: u32,
}

impl Elapsed {
    pub fn tick(&mut self) {
        let seconds = self.seconds + 1;
        if seconds == 60 {
            self.minutes += 1;
            self.seconds = 0;
        } else {
            self.seconds = seconds;
        }
    }

    pub fn reset(&mut self) {
        *self = Elapsed::default();
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Repeating tick task. The thread stops as soon as the handle is stopped or
/// dropped, so ticks cannot leak past the owning screen.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    ticks: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(period: Duration) -> Ticker {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (tick_tx, ticks) = mpsc::channel();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    if tick_tx.send(()).is_err() {
                        break;
                    }
                }
                _ => break,
            }
        });
        debug!("[Timer] Ticker started with period {:?}.", period);
        Ticker {
            stop_tx: Some(stop_tx),
            ticks,
            handle: Some(handle),
        }
    }

    /// Whole ticks elapsed since the last poll.
    pub fn poll(&self) -> u32 {
        let mut count = 0;
        while self.ticks.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    pub fn stop(&mut self) {
        if self.stop_tx.take().is_none() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[Timer] Ticker thread panicked.");
            }
        }
        debug!("[Timer] Ticker stopped.");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
