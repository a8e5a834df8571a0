use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use sprig::view::parse_date;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Styled, human readable output
    #[default]
    Text,
    /// The structured command result as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sprig", bin_name = "sprig", version)]
#[command(about = "Keep track of when your plants were last watered", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the data file, photos and config
    #[arg(long, global = true, env = "SPRIG_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Credential for the image optimization service
    #[arg(long, global = true, env = "SPRIG_OPTIMIZER_KEY", hide_env_values = true)]
    pub optimizer_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List plants and how long ago each was watered
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Register a new plant
    #[command(alias = "new", display_order = 2)]
    Add {
        /// Name words (joined with spaces, defaults to "Plant <id>")
        #[arg(trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Record a watering
    #[command(alias = "w", display_order = 3)]
    Water {
        /// Id of the plant
        id: String,

        /// Date of the watering (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date_arg)]
        on: Option<NaiveDate>,
    },

    /// Show a single plant
    #[command(alias = "status", display_order = 4)]
    Show {
        /// Id of the plant
        id: String,
    },

    /// Rename a plant
    #[command(display_order = 10)]
    Rename {
        /// Id of the plant
        id: String,

        /// New name words (joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Attach a photo to a plant (png, jpg, jpeg or gif)
    #[command(alias = "photo", display_order = 11)]
    Image {
        /// Id of the plant
        id: String,

        /// Image file to upload
        file: PathBuf,
    },

    /// Remove a plant and its photo
    #[command(alias = "delete", display_order = 12)]
    Rm {
        /// Id of the plant
        id: String,
    },

    /// Printable labels linking to each plant's page
    #[command(display_order = 20)]
    Labels {
        /// Base URL for the links (overrides config)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (base-url, bind, port, label-columns, label-rows)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Show where sprig keeps its files
    #[command(display_order = 31)]
    Paths,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("{raw:?} is not a date in YYYY-MM-DD form"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["sprig"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output, OutputMode::Text);
    }

    #[test]
    fn add_joins_name_words() {
        let cli = Cli::try_parse_from(["sprig", "add", "Boston", "Fern"]).unwrap();
        match cli.command {
            Some(Commands::Add { name }) => assert_eq!(name, ["Boston", "Fern"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn water_accepts_iso_date() {
        let cli = Cli::try_parse_from(["sprig", "water", "3", "--on", "2024-06-10"]).unwrap();
        match cli.command {
            Some(Commands::Water { id, on }) => {
                assert_eq!(id, "3");
                assert_eq!(on, NaiveDate::from_ymd_opt(2024, 6, 10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn water_rejects_bad_date() {
        assert!(Cli::try_parse_from(["sprig", "water", "3", "--on", "10/06/2024"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sprig", "list", "--output", "json", "--no-color"]).unwrap();
        assert_eq!(cli.output, OutputMode::Json);
        assert!(cli.no_color);
    }

    #[test]
    fn rename_requires_a_name() {
        assert!(Cli::try_parse_from(["sprig", "rename", "1"]).is_err());
    }
}
