use crate::shared::{BuildingSnapshot, Rider};
use std::fmt::Write;

const CAR_COLUMN_WIDTH: usize = 40;
const SEPARATOR: &str = "---------------------------------------";

/// Renders the building top floor first, one line per floor.
///
/// The car is drawn on its floor as `[E: <direction>, P: <occupants>/<capacity> <riders>]`,
/// followed by the riders delivered to and waiting on that floor.
pub fn render_text(snapshot: &BuildingSnapshot) -> String {
    let mut out = String::new();

    for floor in (0..snapshot.waiting.len()).rev() {
        let car = if floor == snapshot.floor as usize {
            format!(
                "[E: {}, P: {}/{} {}]",
                snapshot.direction,
                snapshot.occupants,
                snapshot.capacity,
                join(&snapshot.onboard, ", ")
            )
        } else {
            String::new()
        };

        let mut line = format!("Floor {:>2}: {:<width$}", floor, car, width = CAR_COLUMN_WIDTH);
        if let Some(delivered) = snapshot.delivered.get(floor).filter(|riders| !riders.is_empty()) {
            let _ = write!(line, " delivered: {}", join(delivered, " "));
        }
        if let Some(waiting) = snapshot.waiting.get(floor).filter(|riders| !riders.is_empty()) {
            let _ = write!(line, " waiting: {}", join(waiting, " "));
        }

        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

fn join(riders: &[Rider], separator: &str) -> String {
    riders
        .iter()
        .map(Rider::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
