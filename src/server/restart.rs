use crate::config::RestartConfig;
use crate::error::{Error, Result};
use async_process::{Command, Stdio};
use async_trait::async_trait;
use futures::future;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Captured result of a finished restart command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Result of one restart attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestartOutcome {
    pub server: String,
    pub success: bool,
    /// Captured output, possibly empty.
    pub output: String,
    pub error: Option<String>,
}

impl RestartOutcome {
    fn from_result(server: &str, result: Result<CommandOutput>) -> Self {
        match result {
            Ok(output) if output.success() => Self {
                server: server.to_string(),
                success: true,
                output: output.combined(),
                error: None,
            },
            Ok(output) => Self {
                server: server.to_string(),
                success: false,
                error: Some(match output.exit_code {
                    Some(code) => format!("restart command exited with status {}", code),
                    None => "restart command was terminated by a signal".to_string(),
                }),
                output: output.combined(),
            },
            Err(e) => Self {
                server: server.to_string(),
                success: false,
                output: String::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Launches the restart action for one server.
#[async_trait]
pub trait RestartInvoker: Send + Sync {
    async fn restart(&self, name: &str) -> Result<CommandOutput>;
}

/// Restarts a server by running an external command, LinuxGSM style
/// (`./csgoserver restart`).
///
/// `{name}` in the program or its arguments is replaced by the server name.
#[derive(Debug, Clone)]
pub struct ScriptRestarter {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ScriptRestarter {
    pub fn new(config: &RestartConfig) -> Self {
        Self {
            program: config.command.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }
}

#[async_trait]
impl RestartInvoker for ScriptRestarter {
    async fn restart(&self, name: &str) -> Result<CommandOutput> {
        let program = self.program.replace("{name}", name);
        let mut command = Command::new(&program);
        command.args(self.args.iter().map(|arg| arg.replace("{name}", name)));

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(server = %name, program = %program, "Running restart command");
        let output = command
            .output()
            .await
            .map_err(|e| Error::Process(format!("Failed to run '{}': {}", program, e)))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Restarts a set of servers concurrently.
///
/// Every restart runs to completion; a failure is recorded in its
/// [`RestartOutcome`] and never cancels the others. There is no retry.
pub struct RestartDispatcher {
    invoker: Arc<dyn RestartInvoker>,
}

impl RestartDispatcher {
    pub fn new(invoker: Arc<dyn RestartInvoker>) -> Self {
        Self { invoker }
    }

    /// Returns one outcome per name, in input order.
    #[tracing::instrument(skip(self, names), fields(count = names.len()))]
    pub async fn dispatch(&self, names: &[String]) -> Vec<RestartOutcome> {
        let restarts = names.iter().map(|name| async move {
            tracing::info!(server = %name, "Restarting server");
            let outcome = RestartOutcome::from_result(name, self.invoker.restart(name).await);

            if outcome.success {
                tracing::info!(server = %name, "Restart finished");
            } else {
                tracing::error!(
                    server = %name,
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "Restart failed"
                );
            }
            outcome
        });

        future::join_all(restarts).await
    }
}
