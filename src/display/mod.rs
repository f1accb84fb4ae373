pub mod render;
mod display_tests;

pub use render::render_text;

/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use serde::Serialize;
use std::io::{self, Write};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::DisplayMode;
use crate::shared::{BuildingSnapshot, PassengerId};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum DisplayEvent {
    Snapshot(BuildingSnapshot),
    Exited { passenger: PassengerId, floor: u8 },
}

/**
 * Read-only consumer of building state.
 *
 * Renders every event it receives until all senders are dropped.
 *
 * # Fields
 * - `mode`:        Plain text, one JSON object per line, or nothing.
 * - `out`:         Where the rendering goes.
 * - `event_rx`:    Receiver for snapshots and exit notices.
 */
pub struct DisplaySink<W: Write> {
    mode: DisplayMode,
    out: W,
    event_rx: cbc::Receiver<DisplayEvent>,
}

impl<W: Write> DisplaySink<W> {
    pub fn new(mode: DisplayMode, out: W, event_rx: cbc::Receiver<DisplayEvent>) -> DisplaySink<W> {
        DisplaySink {
            mode,
            out,
            event_rx,
        }
    }

    pub fn run(mut self) -> io::Result<W> {
        while let Ok(event) = self.event_rx.recv() {
            self.render(&event)?;
        }

        self.out.flush()?;
        Ok(self.out)
    }

    fn render(&mut self, event: &DisplayEvent) -> io::Result<()> {
        match self.mode {
            DisplayMode::Off => Ok(()),
            DisplayMode::Text => match event {
                DisplayEvent::Snapshot(snapshot) => write!(self.out, "{}", render_text(snapshot)),
                DisplayEvent::Exited { passenger, floor } => {
                    writeln!(self.out, "Passenger {} exited at floor {}", passenger, floor)
                }
            },
            DisplayMode::Json => {
                let line = serde_json::to_string(event)?;
                writeln!(self.out, "{}", line)
            }
        }
    }
}
