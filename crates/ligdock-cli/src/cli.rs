use clap::{Args, Parser, ValueEnum};
use ligdock::engine::config::{FailurePolicy, ResumeMarker};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "ligdock - Dock every ligand in a workspace against one receptor with HDOCK, then extract the top-ranked models per ligand. Re-running resumes where the last run stopped.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options controlling a batch run. Unset options fall back to the config file, then to
/// built-in defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    // --- Workspace Layout ---
    /// Workspace root. Defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Receptor structure file, relative to the workspace root [default: receptor.pdb].
    #[arg(short, long, value_name = "PATH")]
    pub receptor: Option<PathBuf>,

    /// Binding-site file, relative to the workspace root [default: site.txt].
    #[arg(short, long, value_name = "PATH")]
    pub site: Option<PathBuf>,

    /// Directory holding the ligand files [default: Ligands].
    #[arg(long, value_name = "DIR")]
    pub ligands: Option<PathBuf>,

    /// Root of the per-ligand results tree [default: Results].
    #[arg(long, value_name = "DIR")]
    pub results: Option<PathBuf>,

    /// File extension identifying ligand files [default: pdb].
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    // --- External Tools ---
    /// Docking executable, by name on PATH or by path [default: hdock].
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub docking_exe: Option<String>,

    /// Model extraction executable, by name on PATH or by path [default: createpl].
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub extract_exe: Option<String>,

    /// Number of top-ranked models to extract per ligand [default: 10].
    #[arg(short, long, value_name = "INT")]
    pub num_models: Option<usize>,

    // --- Run Behaviour ---
    /// What to do when an external tool exits with an error [default: abort].
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_tool_failure: Option<FailurePolicyArg>,

    /// Which file marks a ligand as already processed [default: docking-output].
    #[arg(long, value_enum, value_name = "MARKER")]
    pub resume_marker: Option<ResumeMarkerArg>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate the workspace and print what would run, without invoking any tool.
    #[arg(long)]
    pub dry_run: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S run.num-models=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicyArg {
    /// Stop the batch at the first failing tool.
    Abort,
    /// Record the ligand as failed and carry on.
    Continue,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::Abort => FailurePolicy::Abort,
            FailurePolicyArg::Continue => FailurePolicy::Continue,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeMarkerArg {
    /// The relocated docking output marks a ligand as done.
    DockingOutput,
    /// A sentinel written after every step succeeded marks a ligand as done.
    Sentinel,
}

impl From<ResumeMarkerArg> for ResumeMarker {
    fn from(arg: ResumeMarkerArg) -> Self {
        match arg {
            ResumeMarkerArg::DockingOutput => ResumeMarker::DockingOutput,
            ResumeMarkerArg::Sentinel => ResumeMarker::Sentinel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_a_valid_invocation() {
        let cli = Cli::try_parse_from(["ligdock"]).unwrap();

        assert!(cli.run.workspace.is_none());
        assert!(!cli.run.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_layout_and_policy_flags() {
        let cli = Cli::try_parse_from([
            "ligdock",
            "-w",
            "/data/screen",
            "-r",
            "R.pdb",
            "-s",
            "S.txt",
            "--on-tool-failure",
            "continue",
            "--resume-marker",
            "sentinel",
            "-n",
            "5",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.run.workspace, Some(PathBuf::from("/data/screen")));
        assert_eq!(cli.run.receptor, Some(PathBuf::from("R.pdb")));
        assert_eq!(cli.run.site, Some(PathBuf::from("S.txt")));
        assert_eq!(cli.run.on_tool_failure, Some(FailurePolicyArg::Continue));
        assert_eq!(cli.run.resume_marker, Some(ResumeMarkerArg::Sentinel));
        assert_eq!(cli.run.num_models, Some(5));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ligdock", "-q", "-v"]).is_err());
    }

    #[test]
    fn value_enums_convert_to_core_types() {
        assert_eq!(
            FailurePolicy::from(FailurePolicyArg::Continue),
            FailurePolicy::Continue
        );
        assert_eq!(
            ResumeMarker::from(ResumeMarkerArg::DockingOutput),
            ResumeMarker::DockingOutput
        );
    }
}
