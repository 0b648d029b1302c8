//! Audit-log task queue
//!
//! Audit appends are fire-and-forget for the page: they are pushed onto a
//! queue drained by a single worker task, and rendering never waits on them.
//! Each enqueue hands back an [`AuditTicket`] so callers (and tests) can still
//! observe completion. Failures are logged and never retried.

use shared::{AuditLogEntry, CurrentUser, InventoryViewModel};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Destination of audit records
pub trait AuditSink: Send + Sync + 'static {
    fn append(&self, entry: &AuditLogEntry) -> impl Future<Output = AppResult<()>> + Send;
}

/// Result of one queued append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Sent,
    Failed(String),
}

/// Totals reported when the queue shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub sent: usize,
    pub failed: usize,
}

struct AuditJob {
    id: Uuid,
    entry: AuditLogEntry,
    reply: oneshot::Sender<AuditOutcome>,
}

/// Handle on one queued append; dropping it does not cancel the append
#[derive(Debug)]
pub struct AuditTicket {
    pub id: Uuid,
    rx: oneshot::Receiver<AuditOutcome>,
}

impl AuditTicket {
    pub async fn wait(self) -> AppResult<AuditOutcome> {
        self.rx.await.map_err(|_| AppError::QueueClosed)
    }
}

/// Single-worker queue of audit appends
pub struct AuditQueue {
    tx: mpsc::UnboundedSender<AuditJob>,
    worker: JoinHandle<AuditSummary>,
}

impl AuditQueue {
    /// Start the worker on the current tokio runtime
    pub fn spawn<S: AuditSink>(sink: Arc<S>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AuditJob>();

        let worker = tokio::spawn(async move {
            let mut summary = AuditSummary::default();
            while let Some(job) = rx.recv().await {
                let outcome = match sink.append(&job.entry).await {
                    Ok(()) => {
                        summary.sent += 1;
                        tracing::debug!("Audit {} sent for {}", job.id, job.entry.material_code);
                        AuditOutcome::Sent
                    }
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!("Audit {} failed for {}: {}", job.id, job.entry.material_code, e);
                        AuditOutcome::Failed(e.to_string())
                    }
                };
                // The ticket may already be gone; that is fine
                let _ = job.reply.send(outcome);
            }
            summary
        });

        Self { tx, worker }
    }

    pub fn enqueue(&self, entry: AuditLogEntry) -> AppResult<AuditTicket> {
        let id = Uuid::new_v4();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AuditJob { id, entry, reply })
            .map_err(|_| AppError::QueueClosed)?;
        Ok(AuditTicket { id, rx })
    }

    /// Stop accepting work, finish everything queued, and report totals
    pub async fn shutdown(self) -> AppResult<AuditSummary> {
        drop(self.tx);
        self.worker.await.map_err(|e| {
            tracing::error!("Audit worker ended abnormally: {}", e);
            AppError::QueueClosed
        })
    }
}

/// Queue one low-stock audit per `Low Stock` row across every month
pub fn enqueue_low_stock_audits(
    view: &InventoryViewModel,
    user: Option<&CurrentUser>,
    queue: &AuditQueue,
) -> AppResult<Vec<AuditTicket>> {
    let user_id = user.and_then(|u| u.user_id);
    view.low_stock_rows()
        .map(|row| queue.enqueue(AuditLogEntry::low_stock(user_id, row)))
        .collect()
}
