use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use log::{debug, warn};

use crate::configs::catalog::Catalog;
use crate::configs::settings::Settings;
use crate::error::Result;

pub mod list;
pub mod util;

pub const BIN_NAME: &str = "utils-toolkit";

#[derive(Parser, Debug)]
#[command(name = "utils-toolkit")]
#[command(about = "Browse the utilities shipped with utils_toolkit")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Read the catalog from a YAML file instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show this help message
    Help {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },
    /// List all available utilities
    List {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },
    /// Show information about a specific utility
    Util(util::UtilArgs),
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Cli {
    /// Parse like the original tool: anything clap rejects becomes an
    /// unknown command instead of a usage error. `-h`/`-V` still print and exit.
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match Cli::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => {
                debug!("treating rejected arguments as unknown command: {}", err);
                let words = args
                    .iter()
                    .skip(1)
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect();
                Cli {
                    catalog: None,
                    command: Some(Commands::Unknown(words)),
                }
            }
        }
    }

    pub fn execute(&self) -> Result<()> {
        let settings = if self.needs_settings() {
            Settings::load()?
        } else {
            Settings::default()
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run(&settings, &mut out)
    }

    /// Only `list` and `util` read settings or the catalog.
    fn needs_settings(&self) -> bool {
        matches!(self.command, Some(Commands::List { .. }) | Some(Commands::Util(_)))
    }

    fn catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::from_file(path),
            None => Catalog::embedded(),
        }
    }

    pub fn run(&self, settings: &Settings, out: &mut dyn Write) -> Result<()> {
        debug!("running {:?}", self.command);

        match &self.command {
            None => print_help(out),
            Some(Commands::Help { rest }) => {
                if !rest.is_empty() {
                    warn!("ignoring extra arguments to help: {:?}", rest);
                }
                print_help(out)
            }
            Some(Commands::List { .. }) => list::print_catalog(&self.catalog()?, settings, out),
            Some(Commands::Util(args)) => args.handle(&self.catalog()?, settings, out),
            Some(Commands::Unknown(words)) => {
                let command = words.first().map(String::as_str).unwrap_or_default();
                writeln!(out, "Unknown command: {}", command)?;
                writeln!(out, "Run \"{} help\" for a list of available commands.", BIN_NAME)?;
                Ok(())
            }
        }
    }
}

pub fn print_help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Utils Toolkit CLI")?;
    writeln!(out, "Available commands:")?;
    writeln!(out, "  help              - Show this help message")?;
    writeln!(out, "  util <utilName>   - Show information about a specific utility")?;
    writeln!(out, "  list              - List all available utilities")?;
    Ok(())
}

/// Bold heading when colors are on, plain text otherwise.
pub(crate) fn heading(text: &str, settings: &Settings) -> String {
    if settings.use_color() {
        console::style(text).bold().force_styling(true).to_string()
    } else {
        text.to_string()
    }
}
