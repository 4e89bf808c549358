//! Ordered, abortable step pipelines.
//!
//! A pipeline composes independent gate and transform steps ahead of a
//! terminal action. Steps run strictly in registration order over a shared
//! context; the first step to abort stops the run, skips the terminal
//! action, and logs a warning. An abort is a normal control-flow outcome,
//! not an error.

use chrono::{DateTime, Utc};
use log::warn;
use serde_json::Value;
use uuid::Uuid;

/// Result of a single pipeline step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// Run the next step, or the terminal action after the last step.
    Continue,
    /// Stop the run. The reason is logged, never raised as an error.
    Abort(String),
}

/// How a pipeline run ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// Every step continued and the terminal action ran exactly once.
    Completed,
    /// A step aborted; later steps and the terminal action were skipped.
    Aborted {
        step: &'static str,
        reason: String,
    },
}

/// Record of one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub id: Uuid,
    pub pipeline: &'static str,
    /// Name of the notification that triggered the run.
    pub trigger: String,
    /// Payload of the triggering notification.
    pub data: Value,
    pub started_at: DateTime<Utc>,
    pub outcome: RunOutcome,
}

impl PipelineRun {
    #[must_use]
    pub fn completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

type Step<C> = Box<dyn Fn(&mut C) -> StepOutcome>;

/// An ordered list of named steps over a context `C`.
pub struct Pipeline<C> {
    name: &'static str,
    steps: Vec<(&'static str, Step<C>)>,
}

impl<C> Pipeline<C> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Append a step. Steps run in the order they were added.
    #[must_use]
    pub fn step(
        mut self,
        name: &'static str,
        step: impl Fn(&mut C) -> StepOutcome + 'static,
    ) -> Self {
        self.steps.push((name, Box::new(step)));
        self
    }

    /// Run the steps in order against `ctx`. The terminal action runs
    /// exactly once, and only if every step continues.
    pub fn run(
        &self,
        trigger: &str,
        data: Value,
        ctx: &mut C,
        terminal: impl FnOnce(&mut C),
    ) -> PipelineRun {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        for (step_name, step) in &self.steps {
            if let StepOutcome::Abort(reason) = step(ctx) {
                warn!(
                    "{} aborted at '{step_name}' on {trigger}: {reason}",
                    self.name
                );
                return PipelineRun {
                    id,
                    pipeline: self.name,
                    trigger: trigger.to_string(),
                    data,
                    started_at,
                    outcome: RunOutcome::Aborted {
                        step: *step_name,
                        reason,
                    },
                };
            }
        }
        terminal(ctx);
        PipelineRun {
            id,
            pipeline: self.name,
            trigger: trigger.to_string(),
            data,
            started_at,
            outcome: RunOutcome::Completed,
        }
    }
}
