use anyhow::{Context, Result};
use retemplate_core::{
    rename_operation, Config, ConsoleSink, LocalFs, LogFileSink, OutputFormatter, TeeSink,
};
use std::path::Path;

use crate::cli::TargetArgs;

pub fn handle_rename(
    root: &Path,
    target: TargetArgs,
    dry_run: bool,
    config: &Config,
    use_color: bool,
) -> Result<()> {
    let mut sink = TeeSink::new().with(ConsoleSink::new(use_color));
    // A preview leaves the project byte-identical, log file included.
    if let Some(log_file) = config.defaults.log_file.as_ref().filter(|_| !dry_run) {
        let log_path = root.join(log_file);
        let log_sink = LogFileSink::open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        sink = sink.with(log_sink);
    }

    let outcome = rename_operation(
        &LocalFs,
        root,
        target.project_name,
        target.package_name,
        dry_run,
        config,
        &mut sink,
    )?;

    println!();
    print!("{}", outcome.format_summary());
    Ok(())
}
