//! Task dispatcher
//!
//! Registry of named cluster tasks, each carrying an explicit registration
//! record (cron expression, execution mode, timeout). For every registered
//! task the dispatcher runs one sequential loop per cluster: compute the
//! next fire time, sleep, run the task under its timeout, record the
//! outcome. The sequential per-cluster loop is what guarantees the
//! single-writer contract the tasks rely on; different clusters run
//! concurrently.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::metrics;
use crate::model::{PhysicalCluster, SyncOutcome};
use crate::tasks::ClusterTask;

/// How a task is distributed across fleet nodes.
///
/// In a single-process deployment both modes behave identically; the
/// distinction matters to multi-node schedulers. Broadcast tasks must be
/// re-entrant across nodes for *different* clusters, which every task here
/// satisfies by holding no cross-call state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Fire on every fleet node
    Broadcast,
    /// Fire on any one fleet node
    Any,
}

impl ExecutionMode {
    fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Broadcast => "broadcast",
            ExecutionMode::Any => "any",
        }
    }
}

/// Registration record for one scheduled task
#[derive(Clone, Debug)]
pub struct TaskSpec {
    /// Unique task name, used in logs and metrics
    pub name: String,

    /// Cron expression (7-field: sec min hour dom month dow year)
    pub cron: String,

    /// Fleet distribution policy
    pub execution_mode: ExecutionMode,

    /// Hard wall-clock budget per cluster invocation
    pub timeout: Duration,
}

/// Status of one dispatched invocation, after timeout and error policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    PartialFailure,
    Failed,
    TimedOut,
}

impl RunStatus {
    fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Succeeded => "success",
            RunStatus::PartialFailure => "partial_failure",
            RunStatus::Failed => "error",
            RunStatus::TimedOut => "timeout",
        }
    }
}

struct Registration {
    spec: TaskSpec,
    schedule: Schedule,
    task: Arc<dyn ClusterTask>,
}

/// Runs registered tasks against the configured fleet
pub struct Dispatcher {
    clusters: Vec<PhysicalCluster>,
    registrations: Vec<Registration>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(clusters: Vec<PhysicalCluster>, shutdown: CancellationToken) -> Self {
        Self {
            clusters,
            registrations: Vec::new(),
            shutdown,
        }
    }

    /// Register a task under its spec. Fails on duplicate names, invalid
    /// cron expressions and zero timeouts.
    pub fn register(&mut self, spec: TaskSpec, task: Arc<dyn ClusterTask>) -> Result<()> {
        if self
            .registrations
            .iter()
            .any(|r| r.spec.name == spec.name)
        {
            return Err(Error::config(format!(
                "Task '{}' is already registered",
                spec.name
            )));
        }

        if spec.timeout.is_zero() {
            return Err(Error::config(format!(
                "Task '{}' must have a non-zero timeout",
                spec.name
            )));
        }

        let schedule = Schedule::from_str(&spec.cron).map_err(|e| {
            Error::config(format!(
                "Task '{}' has invalid cron expression '{}': {}",
                spec.name, spec.cron, e
            ))
        })?;

        info!(
            task = %spec.name,
            cron = %spec.cron,
            mode = spec.execution_mode.as_str(),
            timeout_secs = spec.timeout.as_secs(),
            "Registered task"
        );

        self.registrations.push(Registration {
            spec,
            schedule,
            task,
        });
        Ok(())
    }

    /// Run every registered task on its cadence until shutdown is
    /// requested. Resolves once all per-cluster loops have stopped.
    pub async fn run(self) {
        let mut loops = JoinSet::new();

        for registration in self.registrations {
            let spec = registration.spec;
            let schedule = registration.schedule;
            let task = registration.task;

            for cluster in &self.clusters {
                let spec = spec.clone();
                let schedule = schedule.clone();
                let task = Arc::clone(&task);
                let cluster = cluster.clone();
                let shutdown = self.shutdown.clone();

                loops.spawn(async move {
                    cluster_loop(spec, schedule, task, cluster, shutdown).await;
                });
            }
        }

        while loops.join_next().await.is_some() {}
        info!("Dispatcher stopped");
    }
}

/// Sequential trigger loop for one (task, cluster) pair.
///
/// A new tick cannot start before the previous invocation (including its
/// timeout) resolves, which serializes same-cluster runs.
async fn cluster_loop(
    spec: TaskSpec,
    schedule: Schedule,
    task: Arc<dyn ClusterTask>,
    cluster: PhysicalCluster,
    shutdown: CancellationToken,
) {
    loop {
        let now = Utc::now();
        let Some(next) = schedule.after(&now).next() else {
            warn!(task = %spec.name, cluster = cluster.id, "Schedule exhausted, stopping loop");
            return;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(task = %spec.name, cluster = cluster.id, "Shutdown requested, stopping loop");
                return;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        invoke(&spec, task.as_ref(), &cluster, next.timestamp_millis()).await;
    }
}

/// Run one invocation under the task's timeout and record its outcome.
pub async fn invoke(
    spec: &TaskSpec,
    task: &dyn ClusterTask,
    cluster: &PhysicalCluster,
    trigger_time_ms: i64,
) -> RunStatus {
    let timer = metrics::TASK_RUN_DURATION
        .with_label_values(&[&spec.name])
        .start_timer();

    let status = match tokio::time::timeout(spec.timeout, task.run(cluster, trigger_time_ms)).await
    {
        Ok(Ok(SyncOutcome::AllSucceeded)) => RunStatus::Succeeded,
        Ok(Ok(SyncOutcome::PartialFailure)) => {
            warn!(
                task = %spec.name,
                cluster = cluster.id,
                "Task run completed with partial failure"
            );
            RunStatus::PartialFailure
        }
        Ok(Err(e)) => {
            error!(
                task = %spec.name,
                cluster = cluster.id,
                error = %e,
                "Task run failed"
            );
            RunStatus::Failed
        }
        Err(_) => {
            let e = Error::TaskTimeout {
                task: spec.name.clone(),
                cluster_id: cluster.id,
                timeout_secs: spec.timeout.as_secs(),
            };
            error!(task = %spec.name, cluster = cluster.id, error = %e, "Task run timed out");
            RunStatus::TimedOut
        }
    };

    timer.observe_duration();
    metrics::TASK_RUNS_TOTAL
        .with_label_values(&[&spec.name, status.as_str()])
        .inc();

    status
}
