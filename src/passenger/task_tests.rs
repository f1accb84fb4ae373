/*
 * Unit tests for the passenger task
 *
 * The unit tests follows the Arrange, Act, Assert pattern. The car is
 * stepped by hand so every test controls exactly where it is.
 *
 * Tests:
 *  - test_task_single_trip
 *  - test_task_waits_for_capacity_and_next_visit
 *  - test_task_duplicate_id_fails
 *  - test_task_shut_down_while_waiting
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod task_tests {
    use crate::building::Building;
    use crate::config::BuildingConfig;
    use crate::passenger::PassengerTask;
    use crate::shared::{Location, Passenger, PassengerId, Result, SimError, TripEvent, TripKind};
    use crossbeam_channel::{unbounded, Receiver};
    use std::sync::Arc;
    use std::thread::{sleep, Builder, JoinHandle};
    use std::time::{Duration, Instant};

    fn setup_building(total_levels: u8, max_capacity: usize) -> (Arc<Building>, Receiver<TripEvent>) {
        let (journal_tx, journal_rx) = unbounded::<TripEvent>();
        let config = BuildingConfig {
            total_levels,
            max_capacity,
            move_duration: 1000,
        };

        (Arc::new(Building::new(config).with_journal(journal_tx)), journal_rx)
    }

    fn spawn_task(building: &Arc<Building>, id: PassengerId, start: u8, destination: u8) -> JoinHandle<Result<PassengerId>> {
        let levels = building.config().total_levels;
        let task = PassengerTask::new(
            Passenger::new(id, start, destination, levels).unwrap(),
            Arc::clone(building),
        );

        Builder::new()
            .name(format!("passenger-{}", id))
            .spawn(move || task.run())
            .unwrap()
    }

    fn wait_for(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(3);
        while !condition() {
            assert!(Instant::now() < deadline, "Timed out waiting for condition");
            sleep(Duration::from_millis(1));
        }
    }

    fn step_to(building: &Building, floor: u8) {
        let state = building.car().advance();
        assert_eq!(state.floor(), floor, "car took an unexpected route");
    }

    #[test]
    fn test_task_single_trip() {
        // Arrange
        let (building, journal_rx) = setup_building(4, 1);
        let task = spawn_task(&building, 5, 0, 2);

        // Act
        wait_for(|| building.registries().location(5) == Some(Location::Onboard));
        step_to(&building, 1);
        step_to(&building, 2);
        let result = task.join().unwrap();

        // Assert
        assert_eq!(result.unwrap(), 5);
        assert_eq!(building.registries().location(5), Some(Location::Delivered(2)));
        assert_eq!(building.gate().holders(), 0);
        let journal: Vec<(TripKind, u8, u64)> = journal_rx
            .try_iter()
            .map(|event| (event.kind, event.floor, event.tick))
            .collect();
        assert_eq!(
            journal,
            vec![
                (TripKind::Registered, 0, 0),
                (TripKind::Boarded, 0, 0),
                (TripKind::Delivered, 2, 2),
            ]
        );
    }

    #[test]
    fn test_task_waits_for_capacity_and_next_visit() {
        // Purpose: With room for one, P1 at floor 1 cannot board while P0 rides,
        // and the slot P0 frees at floor 2 is useless until the car comes back.

        // Arrange
        let (building, journal_rx) = setup_building(4, 1);
        let p0 = spawn_task(&building, 0, 0, 2);
        let p1 = spawn_task(&building, 1, 1, 3);
        wait_for(|| building.registries().location(0) == Some(Location::Onboard));
        wait_for(|| building.registries().location(1) == Some(Location::Waiting(1)));

        // Act & Assert
        step_to(&building, 1);
        wait_for(|| building.gate().queued() == 1);
        assert_eq!(building.registries().location(1), Some(Location::Waiting(1)));

        step_to(&building, 2);
        assert_eq!(p0.join().unwrap().unwrap(), 0);
        assert_eq!(building.registries().location(0), Some(Location::Delivered(2)));

        step_to(&building, 3);
        step_to(&building, 2);
        assert_eq!(building.registries().location(1), Some(Location::Waiting(1)));
        step_to(&building, 1);
        wait_for(|| building.registries().location(1) == Some(Location::Onboard));

        step_to(&building, 0);
        step_to(&building, 1);
        step_to(&building, 2);
        step_to(&building, 3);
        assert_eq!(p1.join().unwrap().unwrap(), 1);

        let trips: Vec<(PassengerId, TripKind, u8, u64)> = journal_rx
            .try_iter()
            .filter(|event| event.kind != TripKind::Registered)
            .map(|event| (event.passenger, event.kind, event.floor, event.tick))
            .collect();
        assert_eq!(
            trips,
            vec![
                (0, TripKind::Boarded, 0, 0),
                (0, TripKind::Delivered, 2, 2),
                (1, TripKind::Boarded, 1, 5),
                (1, TripKind::Delivered, 3, 9),
            ]
        );
        building.registries().audit().unwrap();
        assert_eq!(building.gate().holders(), 0);
    }

    #[test]
    fn test_task_duplicate_id_fails() {
        // Arrange
        let (building, _journal_rx) = setup_building(4, 2);
        let first = spawn_task(&building, 3, 2, 0);
        wait_for(|| building.registries().location(3).is_some());

        // Act
        let second = spawn_task(&building, 3, 1, 0).join().unwrap();

        // Assert
        assert!(matches!(second, Err(SimError::DuplicatePassenger(3))));
        building.shut_down();
        assert!(matches!(first.join().unwrap(), Err(SimError::ShutDown(3))));
    }

    #[test]
    fn test_task_shut_down_while_waiting() {
        // Arrange
        let (building, _journal_rx) = setup_building(4, 1);
        let rider = spawn_task(&building, 0, 0, 3);
        wait_for(|| building.registries().location(0) == Some(Location::Onboard));
        let queued = spawn_task(&building, 1, 0, 2);
        wait_for(|| building.gate().queued() == 1);

        // Act
        building.shut_down();

        // Assert
        assert!(matches!(rider.join().unwrap(), Err(SimError::ShutDown(0))));
        assert!(matches!(queued.join().unwrap(), Err(SimError::ShutDown(1))));
        assert_eq!(building.gate().holders(), 0);
        building.registries().audit().unwrap();
    }
}
