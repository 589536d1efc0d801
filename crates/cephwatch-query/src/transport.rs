//! Remote execution transport.
//!
//! `Transport` is the seam between the failover loop and the wire:
//! production uses `SshTransport`, tests script their own.

use std::future::Future;

use tokio::process::Command;
use tracing::debug;

use cephwatch_types::MonTarget;

use crate::error::AttemptError;

/// Runs one remote command on one target and returns its raw stdout.
pub trait Transport {
    fn run(
        &self,
        target: &MonTarget,
        command: &str,
    ) -> impl Future<Output = Result<Vec<u8>, AttemptError>> + Send;
}

/// Transport that shells out to the system `ssh` client.
///
/// The argv is assembled piecewise — there is no shell on the local
/// side, so the command string is handed to ssh as a single argument
/// and never interpolated into anything. User and host come from the
/// validated configuration, never from request input.
#[derive(Debug, Clone, Default)]
pub struct SshTransport {
    /// Extra ssh options beyond the defaults (mainly for tests and
    /// site-specific key setups), each passed as `-o <option>`.
    options: Vec<String>,
}

impl SshTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an `-o` option, e.g. `ConnectTimeout=5`.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }
}

impl Transport for SshTransport {
    async fn run(&self, target: &MonTarget, command: &str) -> Result<Vec<u8>, AttemptError> {
        let mut cmd = Command::new("ssh");
        cmd.arg("-o").arg("BatchMode=yes");
        for option in &self.options {
            cmd.arg("-o").arg(option);
        }
        cmd.arg(target.to_string()).arg(command);

        debug!(monitor = %target, command, "running remote query");

        let output = cmd
            .output()
            .await
            .map_err(|source| AttemptError::Unreachable {
                host: target.host.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AttemptError::RemoteFailure {
                host: target.host.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
