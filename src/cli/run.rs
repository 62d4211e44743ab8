//! The obfuscation command - turns parsed arguments into a [`Job`]

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::core::{Config, Job, ObfuscateError, Summary, TransformDirective};
use crate::document::loader::is_stdio;

pub fn run(cli: Cli) -> Result<()> {
    let job = build_job(&cli)?;
    let summary = job.run()?;

    if !cli.global.quiet {
        let line = summary_line(&summary);
        // Keep stdout clean when the document itself goes there
        if is_stdio(&summary.output) {
            eprintln!("{} {}", style("✓").green(), line);
        } else {
            println!("{} {}", style("✓").green(), line);
        }
    }
    Ok(())
}

/// Merge config layers and flags into a job
pub fn build_job(cli: &Cli) -> Result<Job, ObfuscateError> {
    let input = required_path(&cli.input, "-i/--input")?;
    let output = required_path(&cli.output, "-o/--output")?;

    let directive = match &cli.transform {
        Some(value) => value.parse::<TransformDirective>()?,
        None => TransformDirective::default(),
    };

    let mut config = Config::load(cli.global.config.as_deref())?;
    // 5. CLI flags
    config.merge(Config {
        seed: cli.seed,
        name_style: cli.names,
        ..Default::default()
    });

    Ok(Job {
        input,
        output,
        input_format: cli.from,
        directive,
        settings: config.settings()?,
    })
}

fn required_path(value: &Option<PathBuf>, flag: &str) -> Result<PathBuf, ObfuscateError> {
    value.clone().ok_or_else(|| ObfuscateError::Argument {
        message: format!("Missing required argument {}", flag),
        help: Some("Run with --help for usage".into()),
    })
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn summary_line(summary: &Summary) -> String {
    let mut parts = Vec::new();
    if summary.stats.fields_renamed > 0 {
        parts.push(format!("{} renamed", plural(summary.stats.fields_renamed, "field")));
    }
    if summary.stats.dates_reformatted > 0 {
        parts.push(format!("{} reformatted", plural(summary.stats.dates_reformatted, "date")));
    }
    if summary.stats.numbers_reformatted > 0 {
        parts.push(format!(
            "{} reformatted",
            plural(summary.stats.numbers_reformatted, "number")
        ));
    }
    let details = if parts.is_empty() {
        "nothing to obfuscate".to_string()
    } else {
        parts.join(", ")
    };

    let target = if is_stdio(&summary.output) {
        "stdout".to_string()
    } else {
        summary.output.display().to_string()
    };

    format!(
        "Wrote {} to {} ({}; {} input, seed {})",
        summary.output_format,
        style(target).cyan(),
        details,
        summary.input_format,
        summary.seed
    )
}
