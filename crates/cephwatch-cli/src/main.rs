//! cephwatch — Ceph cluster health reporter.
//!
//! Queries the cluster's monitors over SSH (trying each configured
//! host in order until one answers) and prints a health report: the
//! full `ceph status` payload, enriched with an unhealthy-OSD list
//! when the counters show degradation.
//!
//! # Usage
//!
//! ```text
//! cephwatch check --config cephwatch.toml
//! cephwatch check --pretty
//! cephwatch query "osd tree"
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cephwatch_health::HealthChecker;
use cephwatch_query::{MonQuery, QueryExecutor, SshTransport};
use cephwatch_types::{ClusterCounters, HealthReport, WatchConfig};

#[derive(Parser)]
#[command(name = "cephwatch", about = "Ceph cluster health reporter")]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true, default_value = "cephwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one health check and print the report.
    Check {
        /// Print a short human summary instead of JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Run a single raw monitor query and print the decoded payload.
    Query {
        /// Query name: "status" or "osd tree".
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = WatchConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    tracing::debug!(
        monitors = config.monitor.hosts.len(),
        timeout = %config.monitor.timeout,
        "config loaded"
    );

    match cli.command {
        Command::Check { pretty } => {
            let checker = HealthChecker::new(SshTransport::new());
            let report = checker.check(&config.monitor).await?;
            if pretty {
                print!("{}", summary(&report));
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Query { name } => {
            let query: MonQuery = name.parse()?;
            let executor = QueryExecutor::new(SshTransport::new());
            let payload = executor.execute(query, &config.monitor).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

/// Short human-readable rendering of a report.
fn summary(report: &HealthReport) -> String {
    let mut out = String::new();

    match ClusterCounters::from_status(&report.status) {
        Some(c) => {
            let _ = writeln!(
                out,
                "osds: {} total, {} up, {} in",
                c.total, c.up, c.in_cluster
            );
        }
        None => {
            let _ = writeln!(out, "osds: counters unavailable");
        }
    }

    match &report.details {
        None => {
            let _ = writeln!(out, "all osds up and in");
        }
        Some(details) if details.is_empty() => {
            let _ = writeln!(out, "degraded, but no unhealthy osds in the tree");
        }
        Some(details) => {
            for d in details {
                let _ = writeln!(out, "  {} is {} on {}", d.name, d.status, d.host);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use cephwatch_types::UnhealthyDevice;

    fn status(total: u64, up: u64, in_cluster: u64) -> serde_json::Value {
        json!({"osdmap": {"osdmap": {
            "num_osds": total, "num_up_osds": up, "num_in_osds": in_cluster
        }}})
    }

    #[test]
    fn summary_healthy() {
        let report = HealthReport {
            status: status(3, 3, 3),
            details: None,
        };
        let text = summary(&report);
        assert!(text.contains("3 total, 3 up, 3 in"));
        assert!(text.contains("all osds up and in"));
    }

    #[test]
    fn summary_lists_unhealthy_osds() {
        let report = HealthReport {
            status: status(3, 2, 3),
            details: Some(vec![UnhealthyDevice {
                name: "osd.5".to_string(),
                status: "down".to_string(),
                host: "osd-host-2".to_string(),
            }]),
        };
        let text = summary(&report);
        assert!(text.contains("osd.5 is down on osd-host-2"));
    }
}
