//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "patient-registry",
    version,
    about = "HTTP API for managing patient records stored in a JSON file",
    long_about = "patient-registry serves CRUD endpoints over a flat JSON file of patient\n\
        records and derives bmi and a weight verdict for every record it returns.\n\n\
        EXAMPLES:\n\
        \n  patient-registry                              Serve ./patients.json on 127.0.0.1:8000\n\
        \n  patient-registry --init -d data/p.json        Create an empty store first if missing\n\
        \n  patient-registry --bind 0.0.0.0:9000 -vv      Listen on all interfaces, debug logging"
)]
pub struct Config {
    /// Path of the JSON file holding the patient collection
    #[arg(short, long, env = "PATIENTS_FILE", default_value = "patients.json")]
    pub data_file: PathBuf,

    /// Address to listen on
    #[arg(short, long, env = "PATIENTS_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Create the data file with an empty collection if it does not exist
    #[arg(long)]
    pub init: bool,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Default log filter for the chosen verbosity. `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "patient_registry_server=debug,patient_registry_core=debug,info",
            2 => "debug",
            _ => "trace",
        }
    }
}
