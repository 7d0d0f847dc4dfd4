//! Automation walkthroughs: a fixed checklist stepped one task at a time.
//!
//! No real work happens; a run only flips task status so a client can animate
//! the checklist. The timer that drives [`SimulationRun::advance`] lives in the
//! transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub title: &'static str,
    pub tasks: &'static [&'static str],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "email-campaign",
        title: "Automated lifecycle email campaign",
        tasks: &[
            "Segment audience by lifecycle stage",
            "Generate personalized copy",
            "Schedule sends per time zone",
            "Track opens and clicks",
            "Summarize campaign results",
        ],
    },
    Scenario {
        name: "user-onboarding",
        title: "Onboarding workflow for new sign-ups",
        tasks: &[
            "Create workspace",
            "Send welcome email",
            "Assign onboarding checklist",
            "Nudge inactive users after 48 hours",
        ],
    },
    Scenario {
        name: "weekly-report",
        title: "Weekly product metrics digest",
        tasks: &[
            "Pull product analytics",
            "Aggregate KPIs",
            "Build retention and funnel charts",
            "Send stakeholder digest",
        ],
    },
    Scenario {
        name: "bug-triage",
        title: "Incoming bug triage",
        tasks: &[
            "Collect new reports",
            "Deduplicate against known issues",
            "Label severity",
            "Route to owning team",
            "Notify reporters",
        ],
    },
];

pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskProgress {
    pub name: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub id: Uuid,
    pub scenario: String,
    pub title: String,
    pub tasks: Vec<TaskProgress>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SimulationRun {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario: scenario.name.to_string(),
            title: scenario.title.to_string(),
            tasks: scenario
                .tasks
                .iter()
                .map(|name| TaskProgress {
                    name: name.to_string(),
                    status: TaskStatus::Pending,
                })
                .collect(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Finishes the running task and starts the next pending one.
    ///
    /// Returns `false` once every task is done.
    pub fn advance(&mut self) -> bool {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.status == TaskStatus::Running) {
            task.status = TaskStatus::Done;
        }

        match self.tasks.iter_mut().find(|t| t.status == TaskStatus::Pending) {
            Some(task) => {
                task.status = TaskStatus::Running;
                true
            }
            None => {
                if self.finished_at.is_none() {
                    self.finished_at = Some(Utc::now());
                }
                false
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.status == TaskStatus::Done)
    }

    pub fn current_task(&self) -> Option<&TaskProgress> {
        self.tasks.iter().find(|t| t.status == TaskStatus::Running)
    }

    /// Percentage of tasks done.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 100.0;
        }
        let done = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        done as f64 / self.tasks.len() as f64 * 100.0
    }
}
