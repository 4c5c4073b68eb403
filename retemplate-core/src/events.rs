//! Progress reporting for the engine steps.
//!
//! Steps never print directly; they emit events into an [`EventSink`] handed
//! to them by the caller.

use nu_ansi_term::{Color, Style};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Start of a step.
    Section,
    Info,
    Warn,
    Error,
    /// Dry-run rendering of would-be content.
    Preview,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Self::Section => "SECTION",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Preview => "PREVIEW",
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, level: Level, message: &str);

    fn section(&mut self, message: &str) {
        self.emit(Level::Section, message);
    }

    fn info(&mut self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.emit(Level::Error, message);
    }

    fn preview(&mut self, message: &str) {
        self.emit(Level::Preview, message);
    }
}

/// Prints the transcript to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    use_color: bool,
}

impl ConsoleSink {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn render(&self, level: Level, message: &str) -> String {
        if level == Level::Preview && self.use_color {
            return colorize_diff(message);
        }
        let (text, style) = match level {
            Level::Section => (format!("\n--- {message} ---"), Style::new().bold()),
            Level::Info | Level::Preview => (message.to_string(), Style::new()),
            Level::Warn => (format!("Warning: {message}"), Color::Yellow.normal()),
            Level::Error => (format!("Error: {message}"), Color::Red.normal()),
        };
        if self.use_color {
            style.paint(text).to_string()
        } else {
            text
        }
    }
}

fn colorize_diff(diff: &str) -> String {
    diff.lines()
        .map(|line| {
            if line.starts_with("---") || line.starts_with("+++") {
                Color::White.bold().paint(line).to_string()
            } else if line.starts_with("@@") {
                Color::Blue.paint(line).to_string()
            } else if line.starts_with('-') {
                Color::Red.paint(line).to_string()
            } else if line.starts_with('+') {
                Color::Green.paint(line).to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, level: Level, message: &str) {
        println!("{}", self.render(level, message));
    }
}

/// Appends timestamped lines to a log file.
#[derive(Debug)]
pub struct LogFileSink {
    file: File,
}

impl LogFileSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl EventSink for LogFileSink {
    fn emit(&mut self, level: Level, message: &str) {
        // Logging must never interrupt a run.
        let _ = writeln!(
            self.file,
            "[{}] {} {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.label(),
            message
        );
        let _ = self.file.flush();
    }
}

/// Collects events, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub events: Vec<(Level, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(event_level, _)| *event_level == level)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|(_, message)| message.contains(needle))
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, level: Level, message: &str) {
        self.events.push((level, message.to_string()));
    }
}

/// Forwards every event to each inner sink.
#[derive(Default)]
pub struct TeeSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl TeeSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for TeeSink {
    fn emit(&mut self, level: Level, message: &str) {
        for sink in &mut self.sinks {
            sink.emit(level, message);
        }
    }
}
