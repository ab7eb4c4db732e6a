//! Build selection over host OS and target triple.
//!
//! [`BuildProcedure::select`] is the dispatch table: every `(HostOs,
//! TargetTriple)` pair lands on exactly one variant. [`BuildPlan`] expands
//! the chosen procedure into the concrete commands to run.

use crate::command::{CommandExecutor, ToolCommand, run_checked};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::platform::HostOs;
use crate::report::Reporter;
use crate::target::{CrossToolchain, TargetTriple};
use std::fmt;

/// Package providing `musl-gcc` on Debian-family runners.
const MUSL_PACKAGE: &str = "musl-tools";

/// The platform-specific way a release build is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProcedure {
    /// Linux host linking for a foreign architecture.
    LinuxCross(CrossToolchain),
    /// Linux host building any other target.
    LinuxNative {
        /// Whether musl tooling must be installed first.
        musl: bool,
    },
    /// macOS host; no installs.
    MacOs,
    /// Windows host; no installs, native `cargo.exe` invocation.
    Windows,
}

impl BuildProcedure {
    /// Select the procedure for `os` building `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crowbook_packager::plan::BuildProcedure;
    /// use crowbook_packager::platform::HostOs;
    /// use crowbook_packager::target::TargetTriple;
    ///
    /// let target = TargetTriple::try_from("x86_64-unknown-linux-musl")?;
    /// assert_eq!(
    ///     BuildProcedure::select(HostOs::Linux, &target),
    ///     BuildProcedure::LinuxNative { musl: true }
    /// );
    /// # Ok::<(), crowbook_packager::error::PackagerError>(())
    /// ```
    #[must_use]
    pub fn select(os: HostOs, target: &TargetTriple) -> Self {
        match os {
            HostOs::Linux => target.cross_toolchain().map_or_else(
                || Self::LinuxNative {
                    musl: target.is_musl(),
                },
                Self::LinuxCross,
            ),
            HostOs::MacOs => Self::MacOs,
            HostOs::Windows => Self::Windows,
        }
    }

    /// System packages to install before building.
    #[must_use]
    pub fn packages(self) -> Vec<&'static str> {
        match self {
            Self::LinuxCross(cross) => vec![cross.package()],
            Self::LinuxNative { musl: true } => vec![MUSL_PACKAGE],
            Self::LinuxNative { musl: false } | Self::MacOs | Self::Windows => Vec::new(),
        }
    }

    /// Environment binding pointing cargo at the cross linker.
    #[must_use]
    pub fn linker_binding(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::LinuxCross(cross) => Some((cross.linker_env(), cross.linker())),
            Self::LinuxNative { .. } | Self::MacOs | Self::Windows => None,
        }
    }

    /// Expand this procedure into the commands for `config`.
    ///
    /// Install commands are omitted when `config.skip_deps` is set or the
    /// procedure needs no packages.
    #[must_use]
    pub fn plan(self, config: &BuildConfig) -> BuildPlan {
        let packages = self.packages();
        let install = if config.skip_deps || packages.is_empty() {
            Vec::new()
        } else {
            install_commands(&packages)
        };

        let mut build = release_build_command(config, self.build_program());
        if let Some((key, value)) = self.linker_binding() {
            build = build.env(key, value);
        }

        BuildPlan {
            procedure: self,
            install,
            build,
        }
    }

    /// The build tool executable name.
    #[must_use]
    pub const fn build_program(self) -> &'static str {
        match self {
            Self::Windows => "cargo.exe",
            Self::LinuxCross(_) | Self::LinuxNative { .. } | Self::MacOs => "cargo",
        }
    }
}

impl fmt::Display for BuildProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinuxCross(cross) => write!(f, "linux cross build via {}", cross.linker()),
            Self::LinuxNative { musl: true } => f.write_str("linux native build (musl)"),
            Self::LinuxNative { musl: false } => f.write_str("linux native build"),
            Self::MacOs => f.write_str("macos native build"),
            Self::Windows => f.write_str("windows native build"),
        }
    }
}

/// Concrete commands for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// The selected procedure.
    pub procedure: BuildProcedure,
    /// Package-manager commands, run in order before the build.
    pub install: Vec<ToolCommand>,
    /// The release build itself.
    pub build: ToolCommand,
}

impl BuildPlan {
    /// Expand the procedure selected for `config` into commands.
    #[must_use]
    pub fn new(config: &BuildConfig) -> Self {
        BuildProcedure::select(config.os, &config.target).plan(config)
    }

    /// Run the install commands, then the build.
    ///
    /// # Errors
    ///
    /// Returns the first command failure; later commands are not run.
    pub fn execute(
        &self,
        executor: &dyn CommandExecutor,
        reporter: &mut Reporter<'_>,
    ) -> Result<()> {
        for command in &self.install {
            reporter.progress(format_args!("Installing build dependencies: {command}"));
            run_checked(executor, command)?;
        }
        reporter.progress(format_args!("Building ({}): {}", self.procedure, self.build));
        run_checked(executor, &self.build)?;
        Ok(())
    }
}

fn install_commands(packages: &[&str]) -> Vec<ToolCommand> {
    vec![
        ToolCommand::new("sudo").args(["apt-get", "update"]),
        ToolCommand::new("sudo")
            .args(["apt-get", "install", "-y"])
            .args(packages.iter().copied()),
    ]
}

/// `cargo build --release --all --target <target> [-v…] [flags…]`.
///
/// Flags are appended token by token, so an empty flag string adds nothing.
#[must_use]
pub fn release_build_command(config: &BuildConfig, program: &str) -> ToolCommand {
    ToolCommand::new(program)
        .args(["build", "--release", "--all", "--target", config.target.as_str()])
        .args(std::iter::repeat_n("-v", usize::from(config.verbosity)))
        .args(config.flags.tokens().iter().cloned())
        .current_dir(config.workspace.clone())
}
