//! glustervol-ctl: admin CLI for the volume driver.
//!
//! Wires configuration from flags/environment, initializes logging, and
//! runs one driver operation per invocation. The plugin socket transport
//! is intentionally not part of this binary.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glustervol::{DriverConfig, DriverResult, VolumeDriver};

#[derive(Parser)]
#[command(
    name = "glustervol-ctl",
    about = "Manage glusterfs-backed container volumes"
)]
struct Cli {
    /// Root directory for mountpoints and driver state.
    #[arg(long, default_value = "/mnt", env = "GLUSTERVOL_ROOT")]
    root: PathBuf,

    /// Default comma-separated gluster server list for new volumes.
    #[arg(long, default_value = "", env = "SERVERS")]
    servers: String,

    /// Default backing share name for new volumes.
    #[arg(long, default_value = "", env = "VOLNAME")]
    volname: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a volume.
    Create {
        name: String,
        /// Volume options as key=value; a bare key becomes a flag-style
        /// mount option.
        #[arg(short = 'o', long = "opt", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
    /// Drop a volume (must be unreferenced with an empty mountpoint).
    Remove { name: String },
    /// Attach a consumer and print the path handed back.
    Mount { name: String },
    /// Detach a consumer.
    Unmount { name: String },
    /// Print a volume's mountpoint.
    Path { name: String },
    /// Print one volume summary.
    Get { name: String },
    /// Print all volume summaries.
    List,
    /// Print the driver capability scope.
    Capabilities,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Ok((raw.to_string(), String::new())),
    }
}

fn run(cli: Cli) -> DriverResult<()> {
    let config = DriverConfig::from_root(&cli.root, cli.servers, cli.volname);
    let driver = VolumeDriver::open(config)?;

    match cli.command {
        Command::Create { name, options } => {
            let options: HashMap<String, String> = options.into_iter().collect();
            driver.create(&name, &options)
        }
        Command::Remove { name } => driver.remove(&name),
        Command::Mount { name } => {
            println!("{}", driver.mount(&name)?.display());
            Ok(())
        }
        Command::Unmount { name } => driver.unmount(&name),
        Command::Path { name } => {
            println!("{}", driver.path(&name)?.display());
            Ok(())
        }
        Command::Get { name } => {
            let info = driver.get(&name)?;
            println!("{}\t{}", info.name, info.mountpoint.display());
            Ok(())
        }
        Command::List => {
            for info in driver.list()? {
                println!("{}\t{}", info.name, info.mountpoint.display());
            }
            Ok(())
        }
        Command::Capabilities => {
            println!("{:?}", driver.capabilities().scope);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
