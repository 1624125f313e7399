use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent};

pub enum Event {
    /// Time to advance the games and redraw.
    Frame,
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// Reads terminal input on a background thread and interleaves it with
/// frame ticks at a fixed rate.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(frame_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut next_frame = Instant::now() + frame_interval;
            loop {
                let timeout = next_frame.saturating_duration_since(Instant::now());
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(event::Event::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        _ => None,
                    };
                    if let Some(event) = forwarded {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }

                let now = Instant::now();
                if now >= next_frame {
                    next_frame += frame_interval;
                    // Fell far behind: skip the missed frames.
                    if next_frame < now {
                        next_frame = now + frame_interval;
                    }
                    if tx.send(Event::Frame).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}
