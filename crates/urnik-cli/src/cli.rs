//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// School timetables from eAsistent.
///
/// Fetches the public weekly timetable of a school, one of its classes or one
/// of its classrooms and prints it as a listing or as JSON.
#[derive(Debug, Parser)]
#[command(name = "urnik", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the school-wide timetable.
    School {
        #[command(flatten)]
        args: TimetableArgs,
    },

    /// Show the timetable of one class.
    Class {
        /// Class slug as it appears in the timetable URL.
        slug: String,

        #[command(flatten)]
        args: TimetableArgs,
    },

    /// Show the timetable of one classroom.
    Classroom {
        /// Classroom slug as it appears in the timetable URL.
        slug: String,

        #[command(flatten)]
        args: TimetableArgs,
    },

    /// Print the query identifiers embedded in a timetable page.
    Resolve {
        /// Page URL or path, e.g. `abc123/razredi/4402`.
        path: String,
    },
}

/// Options shared by the timetable commands.
#[derive(Debug, Args)]
pub struct TimetableArgs {
    /// School slug or URL (overrides the configured school).
    #[arg(short, long)]
    pub school: Option<String>,

    /// School week number; 0 is the current week.
    #[arg(short, long, default_value_t = 0)]
    pub week: u32,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_command_parses() {
        let cli = Cli::parse_from(["urnik", "-v", "class", "4402", "--week", "19", "--json"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Class { slug, args }) => {
                assert_eq!(slug, "4402");
                assert_eq!(args.week, 19);
                assert!(args.json);
                assert!(args.school.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_week_defaults_to_current() {
        let cli = Cli::parse_from(["urnik", "school", "--school", "abc123"]);
        match cli.command {
            Some(Commands::School { args }) => {
                assert_eq!(args.week, 0);
                assert_eq!(args.school.as_deref(), Some("abc123"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
