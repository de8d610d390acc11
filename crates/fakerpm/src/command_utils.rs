use std::{
    os::unix::process::ExitStatusExt,
    process::{Command, ExitStatus, Stdio},
};

use anyhow::Context;
use log::debug;

/// What a child left behind.
///
/// The streams are empty unless they were captured.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Output {
    pub(crate) code: i32,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) trait RunWith {
    fn run_with_captured_output(self) -> anyhow::Result<Output>;
    fn run_with_inherited_output(self) -> anyhow::Result<Output>;
}

fn spawn(mut cmd: Command) -> anyhow::Result<std::process::Child> {
    match cmd.spawn() {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let program = cmd.get_program().to_string_lossy().to_string();
            Err(e).context(format!(
                "{program} not found, perhaps it must be installed."
            ))
        }
        Err(e) => Err(e.into()),
    }
}

// Shells report death by signal like this, so we do too.
fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => unreachable!("a process that has exited has a code or a signal"),
    }
}

impl RunWith for Command {
    fn run_with_captured_output(mut self) -> anyhow::Result<Output> {
        self.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Spawning child {self:#?}...");
        let child = spawn(self)?;
        debug!("Waiting for child...");
        let output = child.wait_with_output()?;
        Ok(Output {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_with_inherited_output(mut self) -> anyhow::Result<Output> {
        self.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        debug!("Spawning child {self:#?}...");
        let mut child = spawn(self)?;
        debug!("Waiting for child...");
        let status = child.wait()?;
        Ok(Output {
            code: exit_code(status),
            ..Output::default()
        })
    }
}
