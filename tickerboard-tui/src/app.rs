//! Application state: single-owner, main-thread only.
//!
//! The dashboard cycle runs synchronously on this thread whenever the input
//! changes; `dirty` marks that a cycle is due before the next frame.

use std::collections::VecDeque;

use chrono::NaiveDateTime;

use tickerboard_core::data::HistoryProvider;
use tickerboard_core::{CycleReport, Dashboard, DashboardInput, ReshapeOutcome};

const ERROR_HISTORY_CAP: usize = 50;

/// Which control receives adjust keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Days,
    RangeMin,
    RangeMax,
    Companies,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Days, Focus::RangeMin, Focus::RangeMax, Focus::Companies];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Cycle,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Fetch => "NET",
            ErrorCategory::Cycle => "ERR",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub dirty: bool,
    pub focus: Focus,
    pub input: DashboardInput,
    pub company_cursor: usize,
    pub dashboard: Dashboard<Box<dyn HistoryProvider>>,
    pub report: Option<CycleReport>,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(dashboard: Dashboard<Box<dyn HistoryProvider>>) -> Self {
        let input = dashboard.config().default_input();
        Self {
            running: true,
            dirty: true,
            focus: Focus::Days,
            input,
            company_cursor: 0,
            dashboard,
            report: None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Company names offered for selection: the fetched table's rows.
    pub fn company_options(&self) -> Vec<String> {
        self.report
            .as_ref()
            .map(|r| r.table().names().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Replace the input (after widget clamping) and schedule a cycle if it changed.
    pub fn update_input(&mut self, input: DashboardInput) {
        let input = self.dashboard.config().clamp_input(input);
        if input != self.input {
            self.input = input;
            self.dirty = true;
        }
    }

    /// Run one dashboard cycle for the current input.
    ///
    /// This is the outermost boundary of a cycle: failures become a status
    /// message and an error record, never a crash.
    pub fn refresh(&mut self) {
        self.dirty = false;
        match self.dashboard.run_cycle(&self.input) {
            Ok(report) => {
                if !report.from_cache() {
                    for warning in report.warnings() {
                        self.record_error(
                            ErrorCategory::Fetch,
                            warning.to_string(),
                            format!("{} days", self.input.days),
                        );
                    }
                }
                self.report = Some(report);
                let options = self.company_options().len();
                if options == 0 {
                    self.company_cursor = 0;
                } else if self.company_cursor >= options {
                    self.company_cursor = options - 1;
                }
                self.set_cycle_status();
            }
            Err(err) => {
                log::error!("dashboard cycle failed: {err}");
                self.report = None;
                self.push_error(ErrorCategory::Cycle, err.user_message(), "dashboard cycle".into());
            }
        }
    }

    fn set_cycle_status(&mut self) {
        let Some(report) = &self.report else {
            return;
        };

        let failed: Vec<&str> = report.warnings().iter().map(|w| w.name.as_str()).collect();
        let failed_note = if failed.is_empty() {
            String::new()
        } else {
            format!(" | could not retrieve: {}", failed.join(", "))
        };

        let (msg, level) = match &report.outcome {
            ReshapeOutcome::Empty(reason) => (format!("{reason}{failed_note}"), StatusLevel::Warning),
            ReshapeOutcome::Chart(spec) => {
                let msg = format!(
                    "{} companies, {} points over {} days{}{}",
                    spec.view.len(),
                    spec.records.len(),
                    self.input.days,
                    if report.from_cache() { " (cached)" } else { "" },
                    failed_note
                );
                let level = if failed.is_empty() {
                    StatusLevel::Info
                } else {
                    StatusLevel::Warning
                };
                (msg, level)
            }
        };

        self.status_message = Some((msg, level));
    }

    fn record_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
    }

    /// Push an error to the history and show it in the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        self.record_error(category, message.clone(), context);
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
