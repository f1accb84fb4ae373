/* 3rd party libraries */
use log::info;
use std::path::Path;

/* Custom libraries */
use passenger::PassengerGenerator;
use simulation::Simulation;

/* Modules */
mod building;
mod config;
mod display;
mod elevator;
mod passenger;
mod shared;
mod simulation;

/* Main */
fn main() {
    let matches = config::cli().get_matches();
    init_logger(matches.is_present("verbose"));

    // Load the configuration, command line values win over the file
    let config_path = matches
        .value_of("config")
        .unwrap_or(config::DEFAULT_CONFIG_PATH);
    let overrides = unwrap_or_exit!(config::overrides_from_matches(&matches), "Invalid command line");
    let config = unwrap_or_exit!(
        config::load_config(Path::new(config_path)),
        "Failed to load configuration"
    ).with_overrides(&overrides);
    unwrap_or_exit!(config.validate(), "Invalid configuration");

    info!(
        "Building with {} floors, capacity {}, {} ms per floor, {} passengers",
        config.building.total_levels,
        config.building.max_capacity,
        config.building.move_duration,
        config.passengers.count
    );

    // Create the passengers
    let mut generator = PassengerGenerator::new(config.building.total_levels, config.passengers.seed);
    let passengers = unwrap_or_exit!(
        generator.generate(config.passengers.count),
        "Failed to create passengers"
    );

    // Run until everybody has arrived
    let simulation = Simulation::new(config.building.clone()).display(config.display.mode);
    let report = unwrap_or_exit!(simulation.run(passengers), "Simulation failed");

    info!(
        "Simulation finished: {} passengers delivered, {} trip events, {} ticks",
        report.snapshot.delivered_count(),
        report.journal.len(),
        report.ticks
    );
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "elevator_sim=debug,info"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}
