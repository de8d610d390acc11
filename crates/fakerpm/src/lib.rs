#![forbid(unsafe_code)]
//! Library for creating fake RPMs.
//!
//! The packages contain no files; only their metadata and dependency edges are controllable.
//! They are intended for exercising dependency resolution.
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context;
use command_utils::{Output, RunWith};
use log::{debug, info, warn};

use crate::files::spec_file::SpecFile;

mod command_utils;

mod files;

pub const DEFAULT_GROUP: &str = "Development/Build Tools";
pub const DEFAULT_SUMMARY: &str = "This is a fake RPM that does nothing!";
pub const DEFAULT_DESCRIPTION: &str = DEFAULT_SUMMARY;
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_RELEASE: &str = "1.el5";

/// Everything that can be customized about a fake RPM.
///
/// Values are written to the spec file verbatim; nothing is escaped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageAttributes {
    pub name: String,
    pub group: String,
    pub summary: String,
    pub description: String,
    pub version: String,
    pub release: String,
    /// Value of `BuildArch`, omitted from the spec file if `None`.
    pub architecture: Option<String>,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub build_requires: Vec<String>,
}

impl PackageAttributes {
    /// Create attributes with the given name and defaults for everything else.
    ///
    /// The name should not be empty but this is not checked.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: DEFAULT_GROUP.to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            architecture: None,
            provides: Vec::new(),
            requires: Vec::new(),
            build_requires: Vec::new(),
        }
    }
}

/// Render the contents of a spec file describing a package with the given attributes.
pub fn render(attributes: &PackageAttributes) -> String {
    SpecFile::new(attributes).to_string()
}

/// Runs `rpmbuild`, or something that behaves like it, on a spec file.
#[derive(Clone, Debug)]
pub struct RpmBuilder {
    program: OsString,
    rpm_dir: PathBuf,
    show_output: bool,
}

impl Default for RpmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RpmBuilder {
    pub fn new() -> Self {
        Self {
            program: OsString::from("rpmbuild"),
            rpm_dir: PathBuf::from("."),
            show_output: false,
        }
    }

    /// Use another program than `rpmbuild`.
    pub fn program(&mut self, program: impl AsRef<OsStr>) -> &mut Self {
        self.program = program.as_ref().to_os_string();
        self
    }

    /// Set the directory that built packages are written to.
    pub fn rpm_dir(&mut self, rpm_dir: impl AsRef<Path>) -> &mut Self {
        self.rpm_dir = rpm_dir.as_ref().to_path_buf();
        self
    }

    /// Let the output of the program go to the terminal instead of capturing it.
    pub fn show_output(&mut self, show_output: bool) -> &mut Self {
        self.show_output = show_output;
        self
    }

    /// Build the package described by `spec` and return the exit code of the program.
    ///
    /// A nonzero exit code is not considered an error; it is returned as is for the caller to
    /// relay.
    pub fn build(&self, spec: &str) -> anyhow::Result<i32> {
        let mut spec_file = tempfile::Builder::new()
            .prefix("fakerpm-")
            .suffix(".spec")
            .tempfile()
            .context("creating temporary spec file")?;
        spec_file
            .write_all(spec.as_bytes())
            .context("writing temporary spec file")?;
        spec_file.flush()?;
        debug!("Wrote spec file to {:?}", spec_file.path());

        // `spec_file` must outlive the child; the file is deleted when it is dropped.
        let command = self.command(spec_file.path());
        info!("Building with {:?}", self.program);
        let Output {
            code,
            stdout,
            stderr,
        } = if self.show_output {
            command.run_with_inherited_output()?
        } else {
            command.run_with_captured_output()?
        };

        for line in stdout.lines().filter(|l| !l.is_empty()) {
            debug!("Child said {line:?}.");
        }
        if code == 0 {
            for line in stderr.lines().filter(|l| !l.is_empty()) {
                debug!("Child complained {line:?}.");
            }
        } else {
            for line in stderr.lines().filter(|l| !l.is_empty()) {
                warn!("{line}");
            }
        }
        debug!("{:?} exited with {code}", self.program);
        Ok(code)
    }

    fn command(&self, spec_file: &Path) -> Command {
        let mut rpm_dir = OsString::from("_rpmdir ");
        rpm_dir.push(&self.rpm_dir);

        let mut cmd = Command::new(&self.program);
        cmd.arg("--define")
            .arg(rpm_dir)
            .args([
                "--define",
                "_rpmfilename %{NAME}-%{VERSION}-%{RELEASE}.%{ARCH}.rpm",
            ])
            .arg("-ba")
            .arg(spec_file);
        cmd
    }
}
