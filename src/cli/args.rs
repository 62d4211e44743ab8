//! CLI argument definitions using clap derive

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::document::Format;
use crate::transform::NameStyle;

#[derive(Parser, Debug)]
#[command(name = "dfo")]
#[command(author, version, about = "Data Format Obfuscator")]
#[command(
    long_about = "Transforms data into a visually similar but structurally different format.\n\n\
                  Field names are replaced with generated look-alikes and dates are rewritten in \
                  other layouts, so the output keeps the shape of the input without exposing it."
)]
#[command(after_help = "Transform directives (-t):\n  \
    json_to_xml        rename fields, reformat dates, write XML\n  \
    xml_to_json        rename fields, reformat dates, write JSON\n  \
    date_obfuscation   only reformat dates\n  \
    field_obfuscation  only rename fields\n  \
    full               rename fields, reformat dates and numbers\n  \
    json | xml | yaml  rename fields and reformat dates, write that format\n\n\
    Without -t the output format follows the -o extension.")]
pub struct Cli {
    /// Path to the input file ('-' for stdin)
    #[arg(short = 'i', long = "input", value_name = "PATH", required_unless_present = "completions")]
    pub input: Option<PathBuf>,

    /// Path to the output file ('-' for stdout)
    #[arg(short = 'o', long = "output", value_name = "PATH", required_unless_present = "completions")]
    pub output: Option<PathBuf>,

    /// Transform directive (see below)
    #[arg(short = 't', long = "type", value_name = "DIRECTIVE")]
    pub transform: Option<String>,

    /// Input format (default: from the file extension, or sniffed)
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: Option<Format>,

    /// Seed for reproducible output
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Field name generation style
    #[arg(long, value_enum, value_name = "STYLE")]
    pub names: Option<NameStyle>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Config file (merged over ~/.config/dfo/config.yaml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,
}
