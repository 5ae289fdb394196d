use crate::core::access::AccessCodeGate;
use crate::domain::model::{ExportSnapshot, ReconcilePolicy, Theme};
use crate::domain::ports::{KeyValueStore, SnapshotSource};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tokio::sync::watch;

pub const VISITED_KEY: &str = "visited_sites";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    Loaded,
    Toggled,
    Reconciled,
}

/// Published to subscribers whenever the visited set changes, so the
/// presentation layer knows to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub revision: u64,
    pub reason: ChangeReason,
}

/// Issued by [`VisitedStateStore::begin_reconcile`]. Only the most recently
/// issued ticket may apply a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReconcileTicket(u64);

/// Set of visited site names, persisted to local storage and optionally
/// overridden by a remote snapshot.
pub struct VisitedStateStore<S: KeyValueStore> {
    storage: S,
    visited: BTreeSet<String>,
    theme: Theme,
    policy: ReconcilePolicy,
    latest_ticket: u64,
    revision: u64,
    changes: watch::Sender<StateChange>,
}

impl<S: KeyValueStore> VisitedStateStore<S> {
    pub fn new(storage: S, policy: ReconcilePolicy) -> Self {
        let (changes, _) = watch::channel(StateChange {
            revision: 0,
            reason: ChangeReason::Loaded,
        });

        Self {
            storage,
            visited: BTreeSet::new(),
            theme: Theme::default(),
            policy,
            latest_ticket: 0,
            revision: 0,
            changes,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn subscribe(&self) -> watch::Receiver<StateChange> {
        self.changes.subscribe()
    }

    pub fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Read the persisted set and theme. Missing or unreadable data gives an empty set.
    pub async fn load(&mut self) -> Result<()> {
        self.visited = match self.storage.get(VISITED_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(names) => names.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable visited-site data: {}", e);
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };

        self.theme = self
            .storage
            .get(THEME_KEY)
            .await?
            .map(|raw| Theme::from_stored(&raw))
            .unwrap_or_default();

        tracing::debug!("Loaded {} visited sites from local storage", self.visited.len());
        self.notify(ChangeReason::Loaded);
        Ok(())
    }

    /// `load`, then reconcile against the remote snapshot when a saved
    /// access code is still valid. Remote failures keep the local set.
    pub async fn load_and_reconcile<R>(&mut self, gate: &mut AccessCodeGate, source: &R) -> Result<()>
    where
        R: SnapshotSource + ?Sized,
    {
        self.load().await?;

        if gate.restore(&self.storage).await? {
            self.reconcile(gate, source).await;
        }

        Ok(())
    }

    /// Flip membership for `name` and persist the full set. Returns the new membership.
    /// A failed write leaves the set as it was and notifies nobody.
    pub async fn toggle(&mut self, name: &str) -> Result<bool> {
        let now_visited = if self.visited.remove(name) {
            false
        } else {
            self.visited.insert(name.to_string());
            true
        };

        if let Err(e) = self.persist().await {
            if now_visited {
                self.visited.remove(name);
            } else {
                self.visited.insert(name.to_string());
            }
            return Err(e);
        }

        self.notify(ChangeReason::Toggled);

        tracing::debug!("Toggled '{}' -> visited={}", name, now_visited);
        Ok(now_visited)
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.storage.set(THEME_KEY, theme.as_str()).await
    }

    pub fn begin_reconcile(&mut self) -> ReconcileTicket {
        self.latest_ticket += 1;
        ReconcileTicket(self.latest_ticket)
    }

    /// Apply a fetched snapshot according to the policy. A ticket that has
    /// been superseded by a later `begin_reconcile` is ignored.
    /// The snapshot is not written to local storage.
    pub fn apply_snapshot(&mut self, ticket: ReconcileTicket, remote: Vec<String>) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "Discarding stale snapshot (ticket {} < {})",
                ticket.0,
                self.latest_ticket
            );
            return false;
        }

        match self.policy {
            ReconcilePolicy::Replace => self.visited = remote.into_iter().collect(),
            ReconcilePolicy::Merge => self.visited.extend(remote),
        }

        self.notify(ChangeReason::Reconciled);
        true
    }

    /// Fetch the snapshot for the gate's locator and apply it. Failures are
    /// logged and leave the current set as it was.
    pub async fn reconcile<R>(&mut self, gate: &mut AccessCodeGate, source: &R) -> bool
    where
        R: SnapshotSource + ?Sized,
    {
        let Some(locator) = gate.locator().map(str::to_string) else {
            return false;
        };

        let ticket = self.begin_reconcile();
        match source.fetch_visited(&locator).await {
            Ok(remote) => {
                tracing::info!("Loaded {} visited sites from remote snapshot", remote.len());
                gate.hold_snapshot(remote.clone());
                self.apply_snapshot(ticket, remote)
            }
            Err(e) => {
                tracing::error!("Remote snapshot unavailable, keeping local data: {}", e);
                false
            }
        }
    }

    pub fn export_snapshot(&self) -> ExportSnapshot {
        self.export_snapshot_at(Utc::now())
    }

    pub fn export_snapshot_at(&self, at: DateTime<Utc>) -> ExportSnapshot {
        ExportSnapshot::new(&self.visited, self.theme, at)
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.visited)?;
        self.storage.set(VISITED_KEY, &json).await
    }

    fn notify(&mut self, reason: ChangeReason) {
        self.revision += 1;
        self.changes.send_replace(StateChange {
            revision: self.revision,
            reason,
        });
    }
}
