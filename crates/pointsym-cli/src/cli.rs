use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "pointsym - molecular point-group symmetry analysis: character tables, the 3N Cartesian representation and IR/Raman selection rules.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the vibrational modes of one molecule.
    Analyze(AnalyzeArgs),
    /// Print the character table of a supported point group.
    Table(TableArgs),
    /// List the built-in molecules and their point groups.
    List,
    /// Analyze every built-in molecule and print a summary.
    Survey(SurveyArgs),
    /// Play a symmetry operation and print the per-frame transformation matrices.
    Animate(AnimateArgs),
}

/// Where the molecule comes from: the built-in library or a geometry file.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MoleculeSource {
    /// Name, alias or formula of a built-in molecule (e.g. 'water', 'CO2').
    #[arg(short, long, value_name = "NAME")]
    pub molecule: Option<String>,

    /// Path to a molecule file (.xyz or .toml).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Toml,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: MoleculeSource,

    /// Point group to use instead of the curated assignment (e.g. 'C2v', 'Dinfh').
    #[arg(short, long, value_name = "ID")]
    pub point_group: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the geometry tolerance (Angstroms).
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Point-group identifier (e.g. 'C3v', 'd6h', 'Cinfv').
    #[arg(required = true, value_name = "ID")]
    pub point_group: String,
}

/// Arguments for the `survey` subcommand.
#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `animate` subcommand.
#[derive(Args, Debug)]
pub struct AnimateArgs {
    #[command(flatten)]
    pub source: MoleculeSource,

    /// Operation class to play (e.g. 'C3', 'sigma_v(xz)', 'S4').
    #[arg(short, long, required = true, value_name = "LABEL")]
    pub operation: String,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the frame rate (frames per second).
    #[arg(long, value_name = "FLOAT")]
    pub fps: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_accepts_library_molecule() {
        let cli = Cli::try_parse_from(["pointsym", "-vv", "analyze", "-m", "water", "--format", "toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.source.molecule.as_deref(), Some("water"));
        assert_eq!(args.format, OutputFormat::Toml);
    }

    #[test]
    fn molecule_and_input_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["pointsym", "analyze", "-m", "water", "-i", "w.xyz"]);
        assert!(result.is_err());
        assert!(Cli::try_parse_from(["pointsym", "analyze"]).is_err());
    }

    #[test]
    fn animate_requires_an_operation() {
        assert!(Cli::try_parse_from(["pointsym", "animate", "-m", "ammonia"]).is_err());
        let cli = Cli::try_parse_from([
            "pointsym", "animate", "-m", "ammonia", "-o", "C3", "--fps", "10",
        ])
        .unwrap();
        let Commands::Animate(args) = cli.command else {
            panic!("expected animate");
        };
        assert_eq!(args.fps, Some(10.0));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pointsym", "-q", "-v", "list"]).is_err());
    }
}
