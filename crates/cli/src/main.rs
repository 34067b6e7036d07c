use chrono::{TimeZone, Utc};
use sb988_engine::{SimulationEngine, SyntheticPopulation};
use sb988_ports::SimulationConfig;

fn print_help() {
    eprintln!(
        r#"SB 988 Simulator - freelancer/client market under labor-classification rules

USAGE:
    sb988-sim [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --seed <N>          Override the random seed
    --full              Print the full results instead of the summary
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run calendar year 2024 with defaults
    sb988-sim

    # Run with config file and a fixed seed
    sb988-sim --config config.json --seed 42
"#
    );
}

/// Calendar year 2024 with every other option at its default
fn default_config() -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .ok_or("invalid default start date")?;
    let end = Utc
        .with_ymd_and_hms(2024, 12, 31, 0, 0, 0)
        .single()
        .ok_or("invalid default end date")?;
    Ok(SimulationConfig::new(start, end))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut full = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--seed" | "-s" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<u64>()) {
                    Some(Ok(value)) => seed = Some(value),
                    _ => {
                        eprintln!("Error: --seed requires a non-negative integer");
                        std::process::exit(1);
                    }
                }
            }
            "--full" => full = true,
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            default_config()?
        }
    };
    if seed.is_some() {
        config.random_seed = seed;
    }

    log::info!(
        "Population: {} freelancers, {} clients",
        config.initial_freelancers,
        config.initial_clients
    );

    let mut engine = SimulationEngine::new(config)?;
    engine.set_population_generator(SyntheticPopulation::new());
    let results = engine.run()?;

    if full {
        println!("{}", results.to_json_pretty()?);
    } else {
        let summary = serde_json::json!({
            "execution_summary": results.execution_summary,
            "final_snapshot": results.final_snapshot(),
            "scenario_results": results.scenario_results,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
