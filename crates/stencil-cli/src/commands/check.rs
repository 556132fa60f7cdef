//! `stencil check`: lint an archetype without answers.

use stencil_core::application::{CheckReport, Severity};

use crate::{
    cli::CheckArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: CheckArgs, output: OutputManager) -> CliResult<()> {
    let report = super::generate_service().check(&args.archetype)?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        print_report(&report, &output)?;
    }

    let count = if args.strict {
        report.issues.len()
    } else {
        report.errors().count()
    };
    if count > 0 {
        return Err(CliError::CheckFailed {
            archetype: report.archetype,
            count,
        });
    }
    Ok(())
}

fn print_report(report: &CheckReport, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Checking '{}'", report.archetype))?;
    for issue in &report.issues {
        let line = if issue.path.is_empty() {
            issue.message.clone()
        } else {
            format!("{}: {}", issue.path, issue.message)
        };
        match issue.severity {
            Severity::Error => output.error(&line)?,
            Severity::Warning => output.warning(&line)?,
        }
    }

    if report.is_clean() {
        output.success(&format!(
            "'{}' looks good ({} prompts, {} templates)",
            report.archetype, report.prompts, report.nodes
        ))?;
    }
    Ok(())
}
