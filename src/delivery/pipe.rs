use crate::delivery::wire::write_overlay;
use crate::delivery::{Endpoint, EndpointFactory};
use crate::settings::ViewerSettings;
use crate::skyline::Segment;
use anyhow::{anyhow, Context, Result};
use std::io::BufWriter;
use std::process::{Child, ChildStdin, Command, Stdio};

/// A viewer subprocess fed through its standard input.
pub struct PipeEndpoint {
    child: Child,
    stdin: BufWriter<ChildStdin>,
}

impl Endpoint for PipeEndpoint {
    fn send(&mut self, overlay: &[Segment]) -> Result<()> {
        write_overlay(&mut self.stdin, overlay).context("write overlay to viewer process")
    }

    /// Reaps the process so a closed viewer does not linger as a zombie.
    fn discard(mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(%status, pid = self.child.id(), "viewer process exited");
            }
            Ok(None) => {
                tracing::warn!(pid = self.child.id(), "killing unresponsive viewer process");
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
            Err(err) => tracing::warn!(?err, "unable to query viewer process"),
        }
    }
}

/// Spawns the configured viewer command with a piped stdin.
#[derive(Debug, Clone)]
pub struct SubprocessFactory {
    program: String,
    args: Vec<String>,
}

impl SubprocessFactory {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &ViewerSettings) -> Self {
        Self::new(
            settings.viewer_command.clone(),
            settings.viewer_args.clone(),
        )
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl EndpointFactory for SubprocessFactory {
    type Endpoint = PipeEndpoint;

    fn create(&mut self) -> Result<PipeEndpoint> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn viewer process {}", self.program))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("viewer process {} has no stdin", self.program))?;
        tracing::info!(pid = child.id(), program = %self.program, "viewer process started");
        Ok(PipeEndpoint {
            child,
            stdin: BufWriter::new(stdin),
        })
    }
}
