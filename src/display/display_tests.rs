/*
 * Unit tests for the display sink
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - test_render_text_layout
 *  - test_sink_text_mode
 *  - test_sink_json_mode
 *  - test_sink_off_mode
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod display_tests {
    use crate::config::DisplayMode;
    use crate::display::{render_text, DisplayEvent, DisplaySink};
    use crate::shared::{BuildingSnapshot, Direction, Rider};
    use crossbeam_channel::unbounded;

    fn sample_snapshot() -> BuildingSnapshot {
        BuildingSnapshot {
            tick: 3,
            floor: 2,
            direction: Direction::Up,
            occupants: 2,
            capacity: 3,
            onboard: vec![Rider { id: 4, destination: 3 }, Rider { id: 1, destination: 0 }],
            waiting: vec![vec![], vec![Rider { id: 7, destination: 3 }], vec![], vec![]],
            delivered: vec![vec![], vec![], vec![], vec![Rider { id: 2, destination: 3 }]],
        }
    }

    fn run_sink(mode: DisplayMode, events: Vec<DisplayEvent>) -> String {
        let (event_tx, event_rx) = unbounded::<DisplayEvent>();
        for event in events {
            event_tx.send(event).unwrap();
        }
        drop(event_tx);

        let out = DisplaySink::new(mode, Vec::new(), event_rx).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_text_layout() {
        // Arrange
        let snapshot = sample_snapshot();

        // Act
        let text = render_text(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        // Assert
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Floor  3:"));
        assert!(lines[0].ends_with("delivered: 2t3"));
        assert_eq!(lines[1], "Floor  2: [E: Up, P: 2/3 4t3, 1t0]");
        assert!(lines[2].starts_with("Floor  1:"));
        assert!(lines[2].ends_with("waiting: 7t3"));
        assert_eq!(lines[3], "Floor  0:");
        assert!(lines[4].starts_with("----"));
    }

    #[test]
    fn test_sink_text_mode() {
        // Arrange
        let events = vec![
            DisplayEvent::Snapshot(sample_snapshot()),
            DisplayEvent::Exited { passenger: 2, floor: 3 },
        ];

        // Act
        let out = run_sink(DisplayMode::Text, events);

        // Assert
        assert!(out.starts_with(&render_text(&sample_snapshot())));
        assert!(out.ends_with("Passenger 2 exited at floor 3\n"));
    }

    #[test]
    fn test_sink_json_mode() {
        // Arrange
        let events = vec![
            DisplayEvent::Snapshot(sample_snapshot()),
            DisplayEvent::Exited { passenger: 2, floor: 3 },
        ];

        // Act
        let out = run_sink(DisplayMode::Json, events);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        // Assert
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "snapshot");
        assert_eq!(lines[0]["floor"], 2);
        assert_eq!(lines[0]["direction"], "up");
        assert_eq!(lines[0]["onboard"][0]["id"], 4);
        assert_eq!(lines[1]["event"], "exited");
        assert_eq!(lines[1]["passenger"], 2);
    }

    #[test]
    fn test_sink_off_mode() {
        // Act
        let out = run_sink(DisplayMode::Off, vec![DisplayEvent::Snapshot(sample_snapshot())]);

        // Assert
        assert!(out.is_empty());
    }
}
