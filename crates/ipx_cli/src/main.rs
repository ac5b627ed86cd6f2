//! ipx CLI, the command-line interface for the ipx component toolchain.
//!
//! Provides `ipx validate` for checking component descriptors, `ipx generate`
//! for building an interconnect from a JSON configuration, and `ipx decode`
//! for printing the address decode table a configuration produces.

#![warn(missing_docs)]

mod decode;
mod generate;
mod pipeline;
mod validate;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ipx, a toolchain for component descriptors and generated interconnects.
#[derive(Parser, Debug)]
#[command(name = "ipx", version, about = "IP-XACT component toolchain")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print progress notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `ipx.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate component descriptors.
    Validate(ValidateArgs),
    /// Generate an interconnect component and wire it into its design.
    Generate(GenerateArgs),
    /// Print the address decode table of an interconnect configuration.
    Decode(DecodeArgs),
}

/// Arguments for the `ipx validate` subcommand.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Descriptor files to check. Defaults to every document in the library.
    pub files: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Exit with failure when any warning is reported.
    #[arg(long)]
    pub warnings_as_errors: bool,
}

/// Arguments for the `ipx generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Interconnect configuration JSON file.
    pub interconnect: String,

    /// Directory receiving the RTL file (overrides `generate.output_dir`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format used to select the skeleton plugin.
    #[arg(long)]
    pub output_format: Option<String>,

    /// Save the documents but skip RTL emission.
    #[arg(long)]
    pub no_rtl: bool,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `ipx decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Interconnect configuration JSON file.
    pub interconnect: String,

    /// Output format for the table.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print progress notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Validate(ref args) => validate::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Decode(ref args) => decode::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_validate_default() {
        let cli = Cli::parse_from(["ipx", "validate"]);
        match cli.command {
            Command::Validate(ref args) => {
                assert!(args.files.is_empty());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.warnings_as_errors);
            }
            _ => panic!("expected Validate command"),
        }
    }

    #[test]
    fn parse_validate_files_and_json() {
        let cli = Cli::parse_from([
            "ipx",
            "validate",
            "uart.json",
            "spi.json",
            "--format",
            "json",
            "--warnings-as-errors",
        ]);
        match cli.command {
            Command::Validate(ref args) => {
                assert_eq!(args.files, vec!["uart.json", "spi.json"]);
                assert_eq!(args.format, ReportFormat::Json);
                assert!(args.warnings_as_errors);
            }
            _ => panic!("expected Validate command"),
        }
    }

    #[test]
    fn parse_generate() {
        let cli = Cli::parse_from([
            "ipx",
            "generate",
            "xbar.json",
            "--output",
            "out",
            "--output-format",
            "verilog",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.interconnect, "xbar.json");
                assert_eq!(args.output.as_deref(), Some("out"));
                assert_eq!(args.output_format.as_deref(), Some("verilog"));
                assert!(!args.no_rtl);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_requires_config_file() {
        assert!(Cli::try_parse_from(["ipx", "generate"]).is_err());
    }

    #[test]
    fn parse_decode() {
        let cli = Cli::parse_from(["ipx", "decode", "xbar.json", "-f", "json"]);
        match cli.command {
            Command::Decode(ref args) => {
                assert_eq!(args.interconnect, "xbar.json");
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Decode command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["ipx", "--quiet", "--color", "never", "validate"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["ipx", "--config", "/path/to/ipx.toml", "decode", "x.json"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/ipx.toml"));
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["ipx", "lint"]).is_err());
    }
}
