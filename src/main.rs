use std::io::Write;
use std::process;

use env_logger::Builder;
use log::info;

use fcfs_sim::config::SimulationConfig;
use fcfs_sim::report::SimulationReport;

const USAGE: &str = "
Usage: fcfs-sim [options]

Options:
    --config <path>    Load the simulation from a JSON configuration file.
    --json             Print the report as JSON instead of text.
    --help             Display this message.

Without a configuration file the six-task sample batch runs on 3 VMs.
Set RUST_LOG=info for progress, RUST_LOG=debug to trace every assignment.
";

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(err) = start() {
        eprintln!("Error: {err}.");
        process::exit(1);
    }
}

fn start() -> Result<(), Box<dyn std::error::Error>> {
    let arguments = arguments::parse(std::env::args()).map_err(|e| format!("{e:?}"))?;

    if arguments.get::<bool>("help").unwrap_or(false) {
        println!("{}", USAGE.trim());
        return Ok(());
    }

    let config = match config_path(&arguments) {
        Some(path) => {
            info!("Loading configuration from {path}");
            SimulationConfig::from_file(&path)?
        }
        None => SimulationConfig::default(),
    };

    let mut scheduler = config.build_scheduler()?;
    scheduler.simulate()?;
    let report = SimulationReport::from_scheduler(&scheduler)?;

    if arguments.get::<bool>("json").unwrap_or(false) {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text(scheduler.vms()));
    }
    Ok(())
}

/// `--config <path>`, or else the first bare argument.
fn config_path(arguments: &arguments::Arguments) -> Option<String> {
    arguments
        .get::<String>("config")
        .or_else(|| arguments.orphans.first().cloned())
}
