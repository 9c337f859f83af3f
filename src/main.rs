use clap::{Parser, Subcommand};
use imgstamp::cli::{StampCommand, run_cli_with_config};
use imgstamp::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Rename images after their modification time.
#[derive(Debug, Parser)]
#[command(name = "imgstamp", version, about)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory whose images are renamed (not recursive)
    #[arg(required = true)]
    directory: Option<PathBuf>,

    /// Configuration file (defaults to .imgstamprc.toml, then ~/.config/imgstamp/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rename images to IMG_yyyyMMdd_HHmmss.<ext>
    Rename {
        /// Directory to process (not recursive)
        directory: PathBuf,
    },
    /// Report entries that break the media naming convention
    Scan {
        /// Directory to check (not recursive)
        directory: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Resolves the bare `imgstamp <directory>` form to a rename.
    fn into_command(self) -> (StampCommand, PathBuf, Option<PathBuf>) {
        let (command, directory) = match self.command {
            Some(Commands::Rename { directory }) => (StampCommand::Rename, directory),
            Some(Commands::Scan { directory, json }) => (StampCommand::Scan { json }, directory),
            None => match self.directory {
                Some(directory) => (StampCommand::Rename, directory),
                None => unreachable!("clap requires a directory when no subcommand is given"),
            },
        };
        (command, directory, self.config)
    }
}

fn main() -> ExitCode {
    let (command, directory, config) = Cli::parse().into_command();

    match run_cli_with_config(command, &directory, config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> (StampCommand, PathBuf, Option<PathBuf>) {
        Cli::try_parse_from(args).unwrap().into_command()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Cli::try_parse_from(["imgstamp"]).is_err());
    }

    #[test]
    fn test_bare_directory_means_rename() {
        assert_eq!(
            parse(&["imgstamp", "photos"]),
            (StampCommand::Rename, PathBuf::from("photos"), None)
        );
    }

    #[test]
    fn test_rename_subcommand_with_config() {
        assert_eq!(
            parse(&["imgstamp", "rename", "photos", "--config", "stamp.toml"]),
            (
                StampCommand::Rename,
                PathBuf::from("photos"),
                Some(PathBuf::from("stamp.toml"))
            )
        );
    }

    #[test]
    fn test_scan_subcommand_with_json() {
        assert_eq!(
            parse(&["imgstamp", "scan", "photos", "--json"]),
            (StampCommand::Scan { json: true }, PathBuf::from("photos"), None)
        );
    }
}
