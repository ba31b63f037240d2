use crate::board::TimerCommand;
use crate::gesture::TimerToken;
use crate::models::RowKey;
use crate::state::{AppState, Workspace};
use std::time::Instant;
use tokio::time::sleep;
use tracing::debug;

/// Carries out timer commands on the tokio runtime. Each row has at most one
/// pending timer task.
pub fn schedule(state: &AppState, workspace: &mut Workspace, commands: Vec<TimerCommand>) {
    for command in commands {
        match command {
            TimerCommand::Arm { row, token, after } => {
                let task_state = state.clone();
                let task_row = row.clone();
                let handle = tokio::spawn(async move {
                    sleep(after).await;
                    deliver(task_state, task_row, token).await;
                });
                if let Some((leftover, previous)) = workspace.pending_timers.insert(row, (token, handle)) {
                    debug!(?leftover, "aborting leftover timer");
                    previous.abort();
                }
            }
            TimerCommand::Cancel { row, token } => match workspace.pending_timers.remove(&row) {
                Some((armed, handle)) if armed == token => handle.abort(),
                Some(other) => {
                    workspace.pending_timers.insert(row, other);
                }
                None => {}
            },
        }
    }
}

async fn deliver(state: AppState, row: RowKey, token: TimerToken) {
    let mut guard = state.workspace.lock().await;
    let workspace = &mut *guard;

    if matches!(workspace.pending_timers.get(&row), Some((armed, _)) if *armed == token) {
        workspace.pending_timers.remove(&row);
    }

    let dispatch = workspace
        .gestures
        .timer_elapsed(&row, token, &mut workspace.ledger, Instant::now());
    schedule(&state, workspace, dispatch.timers);
}
