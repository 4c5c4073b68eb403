use crate::error::ValidationError;
use crate::namespace::NamespacePath;
use regex::Regex;
use std::sync::LazyLock;

pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9_]+$";
pub const NAMESPACE_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.]+$";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"));
static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAMESPACE_PATTERN).expect("namespace pattern is valid"));

/// A validated rename request.
///
/// Fields are private so a `RenameRequest` can only exist once both values
/// have passed their patterns. The module name is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    target_identifier: String,
    target_namespace: String,
    dry_run: bool,
}

impl RenameRequest {
    /// Build a request from values that are known to be present.
    pub fn new(
        target_identifier: impl Into<String>,
        target_namespace: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self, ValidationError> {
        Self::from_parameters(
            Some(target_identifier.into()),
            Some(target_namespace.into()),
            dry_run,
        )
    }

    /// Build a request from optional invocation parameters.
    ///
    /// The identifier is checked first, so a run with both values missing
    /// reports the project name.
    pub fn from_parameters(
        target_identifier: Option<String>,
        target_namespace: Option<String>,
        dry_run: bool,
    ) -> Result<Self, ValidationError> {
        let target_identifier = target_identifier
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingParameter {
                parameter: "projectName",
                flag: "project-name",
                example: "MyLibrary",
            })?;
        validate_identifier(&target_identifier)?;

        let target_namespace = target_namespace
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingParameter {
                parameter: "packageName",
                flag: "package-name",
                example: "org.example.mylibrary",
            })?;
        validate_namespace(&target_namespace)?;

        Ok(Self {
            target_identifier,
            target_namespace,
            dry_run,
        })
    }

    pub fn target_identifier(&self) -> &str {
        &self.target_identifier
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Lowercased identifier used as the module directory name.
    pub fn module_name(&self) -> String {
        module_name_for(&self.target_identifier)
    }

    pub fn namespace_path(&self) -> NamespacePath {
        NamespacePath::parse(&self.target_namespace)
    }
}

/// Identifiers are ASCII-only once validated, so ASCII lowercasing is exact.
pub fn module_name_for(identifier: &str) -> String {
    identifier.to_ascii_lowercase()
}

pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if IDENTIFIER_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            value: value.to_string(),
            pattern: IDENTIFIER_PATTERN,
        })
    }
}

pub fn validate_namespace(value: &str) -> Result<(), ValidationError> {
    if NAMESPACE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNamespace {
            value: value.to_string(),
            pattern: NAMESPACE_PATTERN,
        })
    }
}
