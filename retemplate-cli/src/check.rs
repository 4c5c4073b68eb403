use anyhow::Result;
use retemplate_core::{check_operation, OutputFormatter};

use crate::cli::TargetArgs;

pub fn handle_check(target: TargetArgs) -> Result<()> {
    let result = check_operation(target.project_name, target.package_name)?;
    print!("{}", result.format_summary());
    Ok(())
}
