#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cleaner;
pub mod config;
pub mod error;
pub mod events;
pub mod fs;
pub mod journal;
pub mod namespace;
pub mod operations;
pub mod output;
pub mod remap;
pub mod request;
pub mod rewrite;
pub mod substitution;

pub use cleaner::clean_stale_target;
pub use config::{Config, DefaultsConfig, Placeholders, RemapConfig, RewriteRules};
pub use error::ValidationError;
pub use events::{ConsoleSink, EventSink, Level, LogFileSink, MemorySink, TeeSink};
pub use fs::{EntryKind, FileSystem, FsEntry, LocalFs, MemoryFs, Walk, WalkError};
pub use journal::{Action, ActionJournal, Outcome, StepReport};
pub use namespace::{NamespacePath, PathSegmentPattern};
pub use operations::{check_operation, rename_operation, run_rename};
pub use output::{CheckResult, OutputFormatter, RenameOutcome, VersionResult};
pub use remap::{remap_hierarchy, RemapOptions};
pub use request::{module_name_for, validate_identifier, validate_namespace, RenameRequest};
pub use rewrite::{collect_candidates, is_candidate, render_diff, rewrite_contents};
pub use substitution::{Substituted, SubstitutionTable, TokenSubstitution};
