use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".retemplate";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub placeholders: Placeholders,

    #[serde(default)]
    pub rewrite: RewriteRules,

    #[serde(default)]
    pub remap: RemapConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,

    /// Append a timestamped transcript to this file (relative to the project root)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// The literal tokens the template ships with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Placeholders {
    /// Top-level module directory and module token
    #[serde(default = "default_module")]
    pub module: String,

    /// Dotted package used by sources and the package directory hierarchy
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Root project name
    #[serde(default = "default_project")]
    pub project: String,

    /// Identifier of the project configuration object
    #[serde(default = "default_config_object")]
    pub config_object: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            module: default_module(),
            namespace: default_namespace(),
            project: default_project(),
            config_object: default_config_object(),
        }
    }
}

/// Which files the content rewriter looks at.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RewriteRules {
    /// Source file extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Configuration and workflow file names rewritten wherever they live
    #[serde(default = "default_allow_list")]
    pub allow_list: Vec<String>,

    /// Path suffix of the library build script
    #[serde(default = "default_build_script")]
    pub build_script: PathBuf,

    /// Build-output directory names that are never entered
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Directory (relative to the root) holding the tool's own sources
    #[serde(default = "default_tooling_root")]
    pub tooling_root: PathBuf,

    /// File names under `tooling_root` that must never be rewritten
    #[serde(default = "default_self_files")]
    pub self_files: Vec<String>,

    /// Skip candidates whose content looks binary
    #[serde(default = "default_true")]
    pub detect_binary: bool,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            allow_list: default_allow_list(),
            build_script: default_build_script(),
            skip_dirs: default_skip_dirs(),
            tooling_root: default_tooling_root(),
            self_files: default_self_files(),
            detect_binary: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemapConfig {
    /// Sub-trees scanned for the package hierarchy; the module directory is always added
    #[serde(default = "default_remap_roots")]
    pub roots: Vec<String>,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            roots: default_remap_roots(),
        }
    }
}

fn default_module() -> String {
    "changehere".to_string()
}

fn default_namespace() -> String {
    "com.tweener.changehere".to_string()
}

fn default_project() -> String {
    "Kmplate_Library".to_string()
}

fn default_config_object() -> String {
    "MyProject".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["kt".to_string()]
}

fn default_allow_list() -> Vec<String> {
    ["buildRelease.yml", "notify.yml", "settings.gradle.kts", "ProjectConfiguration.kt"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_build_script() -> PathBuf {
    PathBuf::from("build.gradle.kts")
}

fn default_skip_dirs() -> Vec<String> {
    vec!["build".to_string()]
}

fn default_tooling_root() -> PathBuf {
    PathBuf::from("buildSrc")
}

fn default_self_files() -> Vec<String> {
    [
        "RenameProjectTask.kt",
        "RenameDirectories.kt",
        "ReplaceWordsInFiles.kt",
        "DeleteExistingModuleDirectory.kt",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_remap_roots() -> Vec<String> {
    vec!["sample".to_string()]
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from `<root>/.retemplate/config.toml` if it exists
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        // Return default config if no config file exists
        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
