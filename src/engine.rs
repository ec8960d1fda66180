// src/engine.rs

//! Task orchestration.
//!
//! Every task runs its entire pipeline as an independent concurrent unit;
//! the orchestrator only fans out and joins. Tasks do not communicate or
//! order themselves relative to each other, and a failing task never
//! cancels its siblings.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::actions::run_pipeline;
use crate::config::model::TaskConfig;
use crate::context::BuildContext;

/// Launch one unit of work per task and block until every task finishes.
pub async fn run_tasks(ctx: Arc<BuildContext>, tasks: &BTreeMap<String, TaskConfig>) {
    let mut set = JoinSet::new();

    for (name, task) in tasks {
        let ctx = Arc::clone(&ctx);
        let name = name.clone();
        let task = task.clone();
        debug!(task = %name, "launching task");
        set.spawn(async move {
            run_pipeline(ctx, &name, &task).await;
        });
    }

    while let Some(joined) = set.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "task worker panicked");
        }
    }
}
