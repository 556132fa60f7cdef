//! `stencil context`: resolve the answers and print every context entry.

use crate::{
    answers,
    cli::ContextArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ContextArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let answers = answers::build(&args.answers, &config)?;
    let context = super::generate_service().context(&args.archetype, &answers)?;

    if output.is_json() {
        output.json(&context)?;
        return Ok(());
    }

    let width = context.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in context.iter() {
        output.print(&format!("{key:<width$} = {value}"))?;
    }
    Ok(())
}
