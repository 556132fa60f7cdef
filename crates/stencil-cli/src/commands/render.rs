//! Implementation of the `stencil render` command.

use tracing::{info, instrument};

use crate::{
    answers,
    cli::RenderArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `stencil render` command.
///
/// 1. Assemble the answer stack
/// 2. Plan (`--dry-run`), or resolve every answer and then write
/// 3. Report what was (or would be) written
///
/// The spinner only starts once the context is resolved, because the
/// interactive layer prompts on the same terminal.
#[instrument(skip_all, fields(archetype = %args.archetype.display(), destination = %args.destination.display()))]
pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let answers = answers::build(&args.answers, &config)?;
    let service = super::generate_service();

    if args.dry_run {
        let report = service.plan(&args.archetype, &answers, &args.destination)?;
        if output.is_json() {
            output.json(&report)?;
            return Ok(());
        }

        output.info(&format!(
            "Dry run: would create {} files and {} directories in {}",
            report.files,
            report.directories,
            report.destination.display(),
        ))?;
        for entry in &report.entries {
            output.print(&format!("  {entry}"))?;
        }
        return Ok(());
    }

    let archetype = service.load(&args.archetype)?;
    let context = service.resolve(&archetype, &answers)?;

    let spinner = output.spinner(&format!("Rendering '{}'...", archetype.name()));
    let result = service.generate_with_context(&archetype, &context, &args.destination);
    spinner.finish_and_clear();
    let report = result?;

    info!(files = report.files, "Render completed");

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!(
        "Rendered '{}' into {} ({} files, {} directories, {} bytes)",
        report.archetype,
        report.destination.display(),
        report.files,
        report.directories,
        report.bytes,
    ))?;

    Ok(())
}
