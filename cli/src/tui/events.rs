use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Polls crossterm on a dedicated thread and forwards events to the async loop.
pub struct InputReader {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl InputReader {
    pub fn start() -> (Self, mpsc::UnboundedReceiver<InputEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            while thread_running.load(Ordering::SeqCst) {
                if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                    continue;
                }
                let forwarded = match event::read() {
                    // Only Press: Windows also reports Release and Repeat, which would double input.
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tracing::trace!("Key pressed: {:?}", key);
                        Some(InputEvent::Key(key))
                    }
                    Ok(Event::Key(key)) => {
                        tracing::trace!("Key event ignored: {:?}", key);
                        None
                    }
                    Ok(Event::Resize(w, h)) => Some(InputEvent::Resize(w, h)),
                    _ => None,
                };
                if let Some(ev) = forwarded {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });
        (
            Self {
                running,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
