//! Drives simulation runs on tokio timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::simulation::{Scenario, SimulationRun};

/// Runs kept before finished ones are dropped, oldest first.
pub const MAX_RETAINED_RUNS: usize = 64;

#[derive(Clone)]
pub struct SimulationRegistry {
    runs: Arc<RwLock<HashMap<Uuid, SimulationRun>>>,
    step: Duration,
    limit: usize,
}

impl SimulationRegistry {
    pub fn new(step: Duration) -> Self {
        Self::with_limit(step, MAX_RETAINED_RUNS)
    }

    pub fn with_limit(step: Duration, limit: usize) -> Self {
        Self {
            runs: Arc::new(RwLock::new(HashMap::new())),
            step,
            limit,
        }
    }

    /// Starts a run with its first task already running and returns that
    /// snapshot; the remaining tasks advance one per step in the background.
    pub async fn start(&self, scenario: &Scenario) -> SimulationRun {
        let mut run = SimulationRun::new(scenario);
        run.advance();
        let snapshot = run.clone();

        let mut runs = self.runs.write().await;
        prune_finished(&mut runs, self.limit);
        runs.insert(run.id, run);
        drop(runs);
        tracing::info!(run_id = %snapshot.id, scenario = scenario.name, "Started simulation");

        tokio::spawn(self.clone().drive(snapshot.id));
        snapshot
    }

    pub async fn get(&self, id: Uuid) -> Option<SimulationRun> {
        self.runs.read().await.get(&id).cloned()
    }

    pub async fn list(&self) -> Vec<SimulationRun> {
        let mut runs: Vec<SimulationRun> = self.runs.read().await.values().cloned().collect();
        runs.sort_by_key(|r| r.started_at);
        runs
    }

    async fn drive(self, id: Uuid) {
        loop {
            tokio::time::sleep(self.step).await;

            let mut runs = self.runs.write().await;
            let Some(run) = runs.get_mut(&id) else {
                return;
            };
            if !run.advance() {
                tracing::info!(run_id = %id, "Simulation finished");
                return;
            }
            if let Some(task) = run.current_task() {
                tracing::debug!(run_id = %id, task = %task.name, "Simulation step");
            }
        }
    }
}

/// Drops finished runs, oldest first, so one more run fits under `limit`.
/// Runs still in progress are never dropped.
fn prune_finished(runs: &mut HashMap<Uuid, SimulationRun>, limit: usize) {
    let excess = (runs.len() + 1).saturating_sub(limit);
    if excess == 0 {
        return;
    }

    let mut finished: Vec<&SimulationRun> =
        runs.values().filter(|r| r.finished_at.is_some()).collect();
    finished.sort_by_key(|r| r.started_at);
    let stale: Vec<Uuid> = finished.iter().take(excess).map(|r| r.id).collect();

    for id in stale {
        runs.remove(&id);
    }
    tracing::debug!(retained = runs.len(), "Pruned finished simulations");
}
