//! A command-line utility for creating "fake" RPMs for the purposes of testing RPM dependencies.
use std::{
    env,
    fs::File,
    path::PathBuf,
    process::{self, ExitCode},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use fakerpm::{render, PackageAttributes, RpmBuilder};
use log::{debug, info};

/// Create "fake" RPMs for the purposes of testing RPM dependencies.
///
/// A spec file is generated from the attributes below and built with `rpmbuild`.
/// The resulting packages contain no files; only their metadata and dependencies matter.
#[derive(Clone, Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct Cli {
    /// Don't actually build anything
    #[arg(long, help_heading = "Build Options")]
    dont_build: bool,
    /// Program to build the spec file with
    #[arg(
        long,
        env = "FAKERPM_RPMBUILD",
        default_value = "rpmbuild",
        value_name = "PROGRAM",
        help_heading = "Build Options"
    )]
    rpmbuild: PathBuf,
    /// Directory to write the built RPM to
    #[arg(
        long,
        env = "FAKERPM_RPM_DIR",
        default_value = ".",
        value_name = "DIR",
        help_heading = "Build Options"
    )]
    rpm_dir: PathBuf,

    /// Show `rpmbuild` output
    #[arg(long, help_heading = "Output Options")]
    build_output: bool,
    /// Print the generated spec file
    #[arg(long, help_heading = "Output Options")]
    print_specfile: bool,

    #[command(flatten)]
    attributes: Attributes,
}

/// Options that end up in the spec file.
///
/// Empty values are treated as if they were not given.
#[derive(Clone, Debug, clap::Args)]
#[command(next_help_heading = "RPM Attributes")]
struct Attributes {
    /// Set the RPM name
    #[arg(short, long)]
    name: Option<String>,
    /// Set the RPM group
    #[arg(short, long)]
    group: Option<String>,
    /// Set the RPM summary
    #[arg(short = 'S', long)]
    summary: Option<String>,
    /// Set the RPM description
    #[arg(short, long)]
    description: Option<String>,
    /// Set the RPM version
    #[arg(short = 'v', long = "version")]
    pkg_version: Option<String>,
    /// Set the RPM release
    #[arg(short, long)]
    release: Option<String>,
    /// Set the RPM BuildArch
    #[arg(short, long)]
    arch: Option<String>,
    /// Add a CAPABILITY to the fake RPM (can specify multiple times)
    #[arg(short, long, value_name = "CAPABILITY")]
    provides: Vec<String>,
    /// Require a CAPABILITY (can specify multiple times)
    #[arg(short = 'R', long, value_name = "CAPABILITY")]
    requires: Vec<String>,
    /// Require a build-time dependency (can specify multiple times)
    #[arg(short, long, value_name = "CAPABILITY")]
    build_requires: Vec<String>,
}

fn given(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Attributes {
    /// Return the attributes, or `None` if no name was given.
    fn resolve(self) -> Option<PackageAttributes> {
        let Self {
            name,
            group,
            summary,
            description,
            pkg_version,
            release,
            arch,
            provides,
            requires,
            build_requires,
        } = self;

        let mut attributes = PackageAttributes::new(given(name)?);
        if let Some(v) = given(group) {
            attributes.group = v;
        }
        if let Some(v) = given(summary) {
            attributes.summary = v;
        }
        if let Some(v) = given(description) {
            attributes.description = v;
        }
        if let Some(v) = given(pkg_version) {
            attributes.version = v;
        }
        if let Some(v) = given(release) {
            attributes.release = v;
        }
        attributes.architecture = given(arch);
        attributes.provides = provides;
        attributes.requires = requires;
        attributes.build_requires = build_requires;
        Some(attributes)
    }
}

impl Cli {
    fn exec(self, attributes: PackageAttributes) -> anyhow::Result<i32> {
        let Self {
            dont_build,
            rpmbuild,
            rpm_dir,
            build_output,
            print_specfile,
            ..
        } = self;

        debug!("Rendering spec file for {attributes:?}");
        let spec = render(&attributes);

        if print_specfile {
            println!("{spec}");
        }

        if dont_build {
            info!("Not building {}", attributes.name);
            return Ok(0);
        }

        RpmBuilder::new()
            .program(rpmbuild)
            .rpm_dir(rpm_dir)
            .show_output(build_output)
            .build(&spec)
    }
}

/// Log to a file unique to this run, unless `RUST_LOG` asks for something else.
///
/// Logging is never a reason to fail; if the file cannot be created we log to stderr instead.
fn init_logger() -> Option<PathBuf> {
    if env::var_os("RUST_LOG").is_some() {
        env_logger::init();
        return None;
    }
    let dir = dirs::runtime_dir().unwrap_or(env::temp_dir());
    let path = dir.join(format!("fakerpm-{}.log", process::id()));
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not create log file {path:?}: {e}");
            env_logger::init();
            return None;
        }
    };
    let target = env_logger::Target::Pipe(Box::new(file));
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    builder.target(target).filter_level(log::LevelFilter::Debug);
    builder.init();
    Some(path)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Checked by hand rather than by clap so that an empty name is rejected too.
    let Some(attributes) = cli.attributes.clone().resolve() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "RPM requires a name (-n/--name)",
            )
            .exit()
    };

    let log_file = init_logger();
    debug!("Logging initialized");

    match cli.exec(attributes) {
        Ok(code) => Ok(ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))),
        Err(e) => {
            if let Some(log_file) = log_file {
                Err(e.context(format!("A detailed log has been saved to {log_file:?}")))
            } else {
                Err(e)
            }
        }
    }
}
