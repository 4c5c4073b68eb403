use crate::error::ValidationError;
use crate::output::CheckResult;
use crate::request::RenameRequest;

/// Check operation - validate parameters and report what a rename would derive
pub fn check_operation(
    project_name: Option<String>,
    package_name: Option<String>,
) -> Result<CheckResult, ValidationError> {
    let request = RenameRequest::from_parameters(project_name, package_name, true)?;
    Ok(CheckResult {
        project_name: request.target_identifier().to_string(),
        module_name: request.module_name(),
        package_name: request.target_namespace().to_string(),
        package_path: request.namespace_path().to_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_check_derives_names() {
        let result =
            check_operation(Some("Kmp_Lib".to_string()), Some("io.acme.kmp".to_string())).unwrap();
        assert_eq!(result.module_name, "kmp_lib");
        assert_eq!(
            result.package_path,
            PathBuf::from("io").join("acme").join("kmp")
        );
    }

    #[test]
    fn test_check_rejects_bad_namespace() {
        let err = check_operation(Some("Lib".to_string()), Some("9lives".to_string())).unwrap_err();
        assert_eq!(err.parameter(), "packageName");
    }
}
