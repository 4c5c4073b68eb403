use crate::config::Placeholders;
use crate::request::RenameRequest;

/// A literal pattern and what it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubstitution {
    pub pattern: String,
    pub replacement: String,
}

impl TokenSubstitution {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Result of running the table over one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub text: String,
    /// Occurrences replaced, summed over every entry.
    pub replacements: usize,
}

/// Ordered substitutions applied to every candidate file.
///
/// Order is part of the contract: generic tokens first, then the qualified
/// `package`/`import` forms so statements end up naming the target namespace
/// even when the generic namespace token was embedded in a longer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<TokenSubstitution>,
}

impl SubstitutionTable {
    pub fn new(placeholders: &Placeholders, request: &RenameRequest) -> Self {
        let identifier = request.target_identifier();
        let namespace = request.target_namespace();
        Self {
            entries: vec![
                TokenSubstitution::new(&placeholders.config_object, identifier),
                TokenSubstitution::new(&placeholders.namespace, namespace),
                TokenSubstitution::new(&placeholders.project, identifier),
                TokenSubstitution::new(&placeholders.module, request.module_name()),
                TokenSubstitution::new(
                    format!("package {}", placeholders.namespace),
                    format!("package {namespace}"),
                ),
                TokenSubstitution::new(
                    format!("import {}", placeholders.namespace),
                    format!("import {namespace}"),
                ),
            ],
        }
    }

    pub fn from_entries(entries: Vec<TokenSubstitution>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TokenSubstitution] {
        &self.entries
    }

    pub fn apply(&self, text: &str) -> Substituted {
        let mut current = text.to_string();
        let mut replacements = 0;
        for entry in &self.entries {
            // An empty pattern would match between every character.
            if entry.pattern.is_empty() {
                continue;
            }
            let count = current.matches(entry.pattern.as_str()).count();
            if count > 0 {
                replacements += count;
                current = current.replace(entry.pattern.as_str(), &entry.replacement);
            }
        }
        Substituted {
            text: current,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SubstitutionTable {
        let request = RenameRequest::new("MyLibrary", "org.example.mylib", false).unwrap();
        SubstitutionTable::new(&Placeholders::default(), &request)
    }

    #[test]
    fn test_table_order() {
        let tbl = table();
        let patterns: Vec<&str> = tbl
            .entries()
            .iter()
            .map(|entry| entry.pattern.as_str())
            .collect();
        assert_eq!(
            patterns,
            vec![
                "MyProject",
                "com.tweener.changehere",
                "Kmplate_Library",
                "changehere",
                "package com.tweener.changehere",
                "import com.tweener.changehere",
            ]
        );
        assert_eq!(table().entries()[3].replacement, "mylibrary");
    }

    #[test]
    fn test_package_and_import_statements() {
        let source = "package com.tweener.changehere.sample\n\nimport com.tweener.changehere.sample.ui.theme.MyProjectTheme\n";
        let result = table().apply(source);
        assert_eq!(
            result.text,
            "package org.example.mylib.sample\n\nimport org.example.mylib.sample.ui.theme.MyLibraryTheme\n"
        );
        assert_eq!(result.replacements, 3);
    }

    #[test]
    fn test_configuration_object() {
        let source = "object ProjectConfiguration {\n    object MyProject {\n        const val packageName = \"com.tweener.changehere\"\n";
        let result = table().apply(source);
        assert!(result.text.contains("object MyLibrary {"));
        assert!(result.text.contains("\"org.example.mylib\""));
    }

    #[test]
    fn test_module_and_project_tokens() {
        let source = "rootProject.name = \"Kmplate_Library\"\ninclude(\":changehere\")\n";
        let result = table().apply(source);
        assert_eq!(
            result.text,
            "rootProject.name = \"MyLibrary\"\ninclude(\":mylibrary\")\n"
        );
    }

    #[test]
    fn test_no_placeholders_is_untouched() {
        let source = "package org.example.mylib\n";
        let result = table().apply(source);
        assert_eq!(result.text, source);
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        let table = SubstitutionTable::from_entries(vec![
            TokenSubstitution::new("", "x"),
            TokenSubstitution::new("a", "b"),
        ]);
        assert_eq!(table.apply("aa").text, "bb");
    }
}
