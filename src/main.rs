// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS DQC simulator
//!
//! Runs distributed quantum network simulations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! qubit-os-dqc simulate
//!
//! # Four nodes, slower channel, YAML report
//! qubit-os-dqc simulate --nodes 4 --latency 0.3 --format yaml
//!
//! # Show effective configuration
//! qubit-os-dqc config --config /path/to/dqc.yaml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_dqc::scheduler::SubcircuitDescriptor;
use qubit_os_dqc::{Config, Result, Simulation, VERSION};

/// QubitOS Distributed Quantum Computing simulator
#[derive(Parser)]
#[command(name = "qubit-os-dqc")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Distributed quantum network simulator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Run protocol traffic and a scheduling batch, then print the report
    Simulate {
        /// Number of nodes
        #[arg(long)]
        nodes: Option<usize>,

        /// Qubit slots per node
        #[arg(long)]
        qubits: Option<usize>,

        /// Classical communication latency
        #[arg(long)]
        latency: Option<f64>,

        /// Teleportations to run (plus half as many remote CNOTs)
        #[arg(long)]
        operations: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Qubits required by each scheduled subcircuit
        #[arg(long, value_delimiter = ',', default_value = "2,2")]
        subcircuits: Vec<usize>,

        /// Scheduling priority (lower runs sooner)
        #[arg(long)]
        priority: Option<u32>,

        /// Report format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, cli.json_logs || config.logging.format == "json");

    match cli.command {
        Commands::Simulate {
            nodes,
            qubits,
            latency,
            operations,
            seed,
            subcircuits,
            priority,
            format,
        } => {
            // CLI flags override file and environment
            if let Some(n) = nodes {
                config.network.num_nodes = n;
            }
            if let Some(q) = qubits {
                config.network.qubits_per_node = q;
            }
            if let Some(l) = latency {
                config.network.communication_latency = l;
            }
            if let Some(ops) = operations {
                config.simulation.num_operations = ops;
            }
            if let Some(s) = seed {
                config.simulation.random_seed = s;
            }
            let priority = priority.unwrap_or(config.scheduler.default_priority);
            let num_operations = config.simulation.num_operations;

            info!(
                version = VERSION,
                num_nodes = config.network.num_nodes,
                qubits_per_node = config.network.qubits_per_node,
                num_operations,
                "Starting simulation"
            );

            let mut simulation = Simulation::new(config)?;
            simulation.run_protocol_simulation(num_operations)?;

            let batch = subcircuits
                .iter()
                .enumerate()
                .map(|(id, &required)| SubcircuitDescriptor::new(id, required))
                .collect();
            simulation.run_scheduling_simulation(batch, priority)?;

            let report = simulation.analyze();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&report)?),
            }
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so reports stay clean.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
