/*
 * Unit tests for the elevator driver
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - test_driver_publishes_every_tick
 *  - test_driver_terminate_shuts_car_down
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod driver_tests {
    use crate::building::Building;
    use crate::config::BuildingConfig;
    use crate::display::DisplayEvent;
    use crate::elevator::ElevatorDriver;
    use crossbeam_channel::{unbounded, RecvTimeoutError};
    use std::sync::Arc;
    use std::thread::Builder;
    use std::time::Duration;

    fn setup_building(total_levels: u8) -> (Arc<Building>, crossbeam_channel::Receiver<DisplayEvent>) {
        let (display_tx, display_rx) = unbounded::<DisplayEvent>();
        let config = BuildingConfig {
            total_levels,
            max_capacity: 2,
            move_duration: 5,
        };

        (Arc::new(Building::new(config).with_display(display_tx)), display_rx)
    }

    #[test]
    fn test_driver_publishes_every_tick() {
        // Purpose: The driver moves one floor per tick and reverses only at the ends

        // Arrange
        let (building, display_rx) = setup_building(4);
        let (terminate_tx, terminate_rx) = unbounded::<()>();
        let driver = ElevatorDriver::new(Arc::clone(&building), terminate_rx);
        let driver_thread = Builder::new()
            .name("elevator_driver".into())
            .spawn(move || driver.run())
            .unwrap();

        // Act
        let mut floors = Vec::new();
        let mut ticks = Vec::new();
        while floors.len() < 13 {
            match display_rx.recv_timeout(Duration::from_secs(3)) {
                Ok(DisplayEvent::Snapshot(snapshot)) => {
                    floors.push(snapshot.floor);
                    ticks.push(snapshot.tick);
                }
                Ok(other) => panic!("Unexpected display event: {:?}", other),
                Err(RecvTimeoutError::Timeout) => panic!("Timed out waiting for the driver"),
                Err(e) => panic!("Error receiving from display_rx: {:?}", e),
            }
        }

        // Assert
        assert_eq!(floors, vec![0, 1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0]);
        assert_eq!(ticks, (0..13).collect::<Vec<u64>>());

        // Cleanup
        terminate_tx.send(()).unwrap();
        driver_thread.join().unwrap();
    }

    #[test]
    fn test_driver_terminate_shuts_car_down() {
        // Arrange
        let (building, _display_rx) = setup_building(10);
        let (terminate_tx, terminate_rx) = unbounded::<()>();
        let driver = ElevatorDriver::new(Arc::clone(&building), terminate_rx);
        let driver_thread = Builder::new()
            .name("elevator_driver".into())
            .spawn(move || driver.run())
            .unwrap();

        // Act
        terminate_tx.send(()).unwrap();
        driver_thread.join().unwrap();

        // Assert
        assert!(!building.car().is_running());
        let tick = building.car().state().tick();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(building.car().state().tick(), tick);
    }
}
