//! Command-line argument definitions for the siglint CLI.
//!
//! [`Args`] holds the global flags (configuration file, log level) and the
//! [`Command`] to run.

use clap::{Parser, Subcommand, ValueEnum};

/// Static validator for signal-processing DSL source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the function-signature catalog from a directory of libraries
    BuildCatalog {
        /// Directory containing library sources (*.lib)
        library_dir: String,

        /// Path of the catalog artifact to write
        #[arg(short, long, default_value = "catalog.json")]
        output: String,
    },

    /// Build the error-pattern catalog, optionally scanning compiler sources
    BuildErrorCatalog {
        /// Directory containing compiler sources to scan for error strings
        compiler_source_dir: Option<String>,

        /// Path of the error catalog artifact to write
        #[arg(short, long, default_value = "errors.json")]
        output: String,
    },

    /// Validate a DSL source file
    Validate {
        /// Path to the source file
        input: String,

        /// Catalog artifact (overrides the configured path)
        #[arg(long)]
        catalog: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Translate compiler error output into actionable guidance
    Translate {
        /// File containing compiler output; reads stdin when omitted
        input: Option<String>,
    },

    /// Show a library function, or list the functions of a library prefix
    Lookup {
        /// `prefix.name` or a bare `prefix`
        name: String,

        /// Catalog artifact (overrides the configured path)
        #[arg(long)]
        catalog: Option<String>,
    },
}

/// Report format for `validate`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Diagnostics rendered with source snippets
    Text,
    /// Plain-text report for code-generation callers
    Llm,
    /// The validation result as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let args = Args::parse_from(["siglint", "validate", "synth.dsp", "--format", "llm"]);
        assert_eq!(args.log_level, "warn");
        match args.command {
            Command::Validate {
                input,
                catalog,
                format,
            } => {
                assert_eq!(input, "synth.dsp");
                assert_eq!(catalog, None);
                assert_eq!(format, Format::Llm);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["siglint", "translate", "--log-level", "debug", "-c", "x.toml"]);
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.config.as_deref(), Some("x.toml"));
        assert!(matches!(args.command, Command::Translate { input: None }));
    }
}
