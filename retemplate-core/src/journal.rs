use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The filesystem was changed (or the change was attempted).
    Executed,
    /// Dry run: the change was only planned.
    Simulated,
}

/// One human-readable journal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub description: String,
    pub outcome: Outcome,
    pub error: Option<String>,
}

impl Action {
    pub fn new(description: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            description: description.into(),
            outcome,
            error: None,
        }
    }

    pub fn executed(description: impl Into<String>) -> Self {
        Self::new(description, Outcome::Executed)
    }

    pub fn simulated(description: impl Into<String>) -> Self {
        Self::new(description, Outcome::Simulated)
    }

    /// An executed action that failed with `reason`.
    pub fn failed(description: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            description: description.into(),
            outcome: Outcome::Executed,
            error: Some(reason.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_simulated(&self) -> bool {
        self.outcome == Outcome::Simulated
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if let Some(reason) = &self.error {
            write!(f, " (error: {reason})")?;
        }
        if self.is_simulated() {
            write!(f, " (dry run)")?;
        }
        Ok(())
    }
}

/// What a single step did. Each step builds its own report and hands it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub directory_actions: Vec<Action>,
    pub file_actions: Vec<Action>,
}

impl StepReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&mut self, action: Action) {
        self.directory_actions.push(action);
    }

    pub fn file(&mut self, action: Action) {
        self.file_actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.directory_actions.is_empty() && self.file_actions.is_empty()
    }
}

/// All actions of one invocation, in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionJournal {
    pub directory_actions: Vec<Action>,
    pub file_actions: Vec<Action>,
}

impl ActionJournal {
    pub fn from_reports(reports: impl IntoIterator<Item = StepReport>) -> Self {
        let mut journal = Self::default();
        for report in reports {
            journal.merge(report);
        }
        journal
    }

    pub fn merge(&mut self, report: StepReport) {
        self.directory_actions.extend(report.directory_actions);
        self.file_actions.extend(report.file_actions);
    }

    pub fn error_count(&self) -> usize {
        self.directory_actions
            .iter()
            .chain(&self.file_actions)
            .filter(|action| action.is_error())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.directory_actions.is_empty() && self.file_actions.is_empty()
    }
}
