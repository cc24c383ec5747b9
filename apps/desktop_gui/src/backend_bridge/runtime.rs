//! Runtime bridge between UI command queue and backend event intake.

use std::{future::Future, sync::Arc, thread};

use client_core::{ClientError, DeleteOutcome, MutationOutcome, UserStore};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio_util::sync::CancellationToken;

use crate::backend_bridge::commands::{BackendCommand, ModalSession};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::state::MutationOrigin;

/// Spawns the backend worker thread. It runs until every command sender is dropped.
pub fn launch(
    store: Arc<dyn UserStore>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                emit(
                    &ui_tx,
                    UiEvent::Error(UiError::startup(format!(
                        "failed to build backend runtime: {err}"
                    ))),
                );
                return;
            }
        };

        emit(&ui_tx, UiEvent::Info("Backend worker ready".to_string()));
        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend: received command");
                tokio::spawn(handle_command(store.clone(), ui_tx.clone(), cmd));
            }
            tracing::info!("backend: command queue closed; worker exiting");
        });
    })
}

async fn handle_command(store: Arc<dyn UserStore>, ui_tx: Sender<UiEvent>, cmd: BackendCommand) {
    match cmd {
        BackendCommand::FetchUsers { generation, cancel } => {
            let Some(result) = until_cancelled(&cancel, store.list_users()).await else {
                tracing::debug!(generation, "backend: fetch_users abandoned");
                return;
            };
            match result {
                Ok(users) => {
                    tracing::info!(generation, count = users.len(), "backend: fetch_users");
                    deliver(&ui_tx, UiEvent::UsersLoaded { generation, users }).await;
                }
                Err(err) => {
                    tracing::error!(generation, "backend: fetch_users failed: {err}");
                    let error = UiError::from_client(UiErrorContext::LoadUsers, &err);
                    deliver(&ui_tx, UiEvent::Error(error)).await;
                }
            }
        }
        BackendCommand::CreateUser { session, fields } => {
            tracing::info!(session = session.id(), "backend: create_user");
            submit(&ui_tx, "create_user", &session, store.create_user(&fields)).await;
        }
        BackendCommand::UpdateUser {
            session,
            id,
            fields,
        } => {
            tracing::info!(session = session.id(), user_id = id.0, "backend: update_user");
            submit(
                &ui_tx,
                "update_user",
                &session,
                store.update_user(id, &fields),
            )
            .await;
        }
        BackendCommand::DeleteUser { id, cancel } => {
            tracing::info!(user_id = id.0, "backend: delete_user");
            let Some(result) = until_cancelled(&cancel, store.delete_user(id)).await else {
                tracing::debug!(user_id = id.0, "backend: delete_user abandoned");
                return;
            };
            match result {
                Ok(DeleteOutcome::Deleted) => {
                    deliver(&ui_tx, UiEvent::MutationApplied(MutationOrigin::Delete)).await;
                }
                Ok(DeleteOutcome::Failed { status, message }) => {
                    tracing::error!(
                        user_id = id.0,
                        status,
                        message = message.as_deref().unwrap_or_default(),
                        "Failed to delete"
                    );
                }
                Err(err) => {
                    tracing::error!(user_id = id.0, "backend: delete_user failed: {err}");
                    let error = UiError::from_client(UiErrorContext::DeleteUser, &err);
                    deliver(&ui_tx, UiEvent::Notice(error.to_string())).await;
                }
            }
        }
    }
}

async fn submit<F>(
    ui_tx: &Sender<UiEvent>,
    command: &'static str,
    session: &ModalSession,
    request: F,
) where
    F: Future<Output = Result<MutationOutcome, ClientError>>,
{
    let Some(result) = until_cancelled(session.token(), request).await else {
        tracing::debug!(session = session.id(), command, "backend: form closed; request abandoned");
        return;
    };

    let event = match result {
        Ok(MutationOutcome::Applied) => {
            UiEvent::MutationApplied(MutationOrigin::Form {
                session: session.id(),
            })
        }
        Ok(MutationOutcome::Rejected { status, message }) => {
            tracing::warn!(session = session.id(), command, status, "backend: {message}");
            UiEvent::MutationRejected {
                session: session.id(),
                message,
            }
        }
        Err(err) => {
            tracing::error!(session = session.id(), command, "backend: request failed: {err}");
            UiEvent::SubmissionFailed {
                session: session.id(),
                error: UiError::from_client(UiErrorContext::SubmitUser, &err),
            }
        }
    };
    deliver(ui_tx, event).await;
}

async fn until_cancelled<F: Future>(cancel: &CancellationToken, request: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = request => Some(output),
    }
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(TrySendError::Full(event)) = ui_tx.try_send(event) {
        tracing::warn!(?event, "backend->ui event queue is full; dropping event");
    }
}

/// Request outcomes wait for room in the UI queue instead of being dropped:
/// the UI releases forms and re-fetches only when it sees them.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let ui_tx = ui_tx.clone();
    let sent = tokio::task::spawn_blocking(move || ui_tx.send(event)).await;
    match sent {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::debug!(event = ?err.into_inner(), "ui gone; dropping event"),
        Err(err) => tracing::error!("backend->ui delivery task failed: {err}"),
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
