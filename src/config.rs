// ⚙️ Runtime configuration - flags with environment fallbacks
//
// Seed clubs and admin credentials are static data, not configuration.

use crate::mutator::MutationLatency;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTAKE_URL: &str = "https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec";

#[derive(Debug, Clone, clap::Args)]
pub struct Config {
    #[arg(
        long,
        env = "CLUBS_INTAKE_URL",
        default_value = DEFAULT_INTAKE_URL,
        help = "Registration intake endpoint"
    )]
    pub intake_url: String,

    #[arg(
        long,
        env = "CLUBS_INTAKE_TIMEOUT_SECS",
        default_value_t = 15,
        help = "Give up on the intake endpoint after this many seconds"
    )]
    pub intake_timeout_secs: u64,

    #[arg(
        long,
        env = "CLUBS_CREATE_LATENCY_MS",
        default_value_t = 1500,
        help = "Simulated save latency for create/update"
    )]
    pub write_latency_ms: u64,

    #[arg(
        long,
        env = "CLUBS_DELETE_LATENCY_MS",
        default_value_t = 1000,
        help = "Simulated save latency for delete"
    )]
    pub delete_latency_ms: u64,

    #[arg(
        long,
        env = "CLUBS_BIND",
        default_value = "0.0.0.0:3000",
        help = "API server listen address"
    )]
    pub bind: String,

    #[arg(
        long,
        env = "CLUBS_ASSETS_DIR",
        default_value = "public",
        help = "Directory holding the college images"
    )]
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn intake_timeout(&self) -> Duration {
        Duration::from_secs(self.intake_timeout_secs)
    }

    pub fn latency(&self) -> MutationLatency {
        MutationLatency {
            write: Duration::from_millis(self.write_latency_ms),
            delete: Duration::from_millis(self.delete_latency_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            intake_url: DEFAULT_INTAKE_URL.to_string(),
            intake_timeout_secs: 15,
            write_latency_ms: 1500,
            delete_latency_ms: 1000,
            bind: "0.0.0.0:3000".to_string(),
            assets_dir: PathBuf::from("public"),
        }
    }
}
