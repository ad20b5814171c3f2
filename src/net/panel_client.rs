//! Ordered dispatch of pushed frames into the panel reducer.
//!
//! The transport owns the socket; this module owns what happens after a frame
//! arrives. `Panel` is the synchronous core: it holds the state and the
//! subscription it is attached to, and drops frames that belong to no live
//! subscription. `spawn_panel` runs a `Panel` on a task fed by one bounded
//! queue, so frames are reduced strictly in arrival order, and publishes each
//! committed state on a `watch` channel for the view layer.
//!
//! LIFECYCLE
//! =========
//! 1. Host attaches the panel to a subscription id
//! 2. Transport forwards frames → classify → reduce → publish
//! 3. Target object changes → unload: state resets, panel detaches, and the
//!    subscription id is retired
//! 4. Frames still in flight for the old subscription are dropped, even after
//!    a later wildcard attach

#[cfg(test)]
#[path = "panel_client_test.rs"]
mod panel_client_test;

use std::collections::HashSet;

use futures_util::{Stream, StreamExt};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PanelConfig;
use crate::net::classify::classify;
use crate::net::types::Frame;
use crate::state::properties::{Action, PanelState, reduce};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("panel task is closed")]
    Closed,
}

// =============================================================================
// PANEL
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Attachment {
    Detached,
    /// Attached; `None` accepts frames from any subscription until the first
    /// id arrives, then only that id.
    Attached(Option<String>),
}

/// Panel state plus the subscription feeding it.
#[derive(Clone, Debug)]
pub struct Panel {
    state: PanelState,
    attachment: Attachment,
    /// Id a wildcard attachment locked onto.
    pinned: Option<String>,
    /// Ids of unloaded subscriptions; their late frames are never applied.
    retired: HashSet<String>,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    /// A freshly mounted, detached panel.
    #[must_use]
    pub fn new() -> Self {
        Self { state: PanelState::initial(), attachment: Attachment::Detached, pinned: None, retired: HashSet::new() }
    }

    #[must_use]
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment != Attachment::Detached
    }

    /// Subscription id the panel listens to: the requested one, or the id a
    /// wildcard attachment pinned.
    #[must_use]
    pub fn subscription_id(&self) -> Option<&str> {
        match &self.attachment {
            Attachment::Attached(Some(id)) => Some(id),
            Attachment::Attached(None) => self.pinned.as_deref(),
            Attachment::Detached => None,
        }
    }

    /// Start accepting frames for `subscription_id` (any id when `None`).
    ///
    /// Switching from one subscription to another unloads first so the two
    /// streams never mix. Naming an id explicitly revives it if an earlier
    /// unload retired it.
    pub fn attach(&mut self, subscription_id: Option<String>) {
        if let Attachment::Attached(current) = &self.attachment {
            if current != &subscription_id {
                self.unload();
            }
        }
        if let Some(id) = &subscription_id {
            self.retired.remove(id);
        }
        info!(subscription_id = ?subscription_id, "panel attached");
        self.attachment = Attachment::Attached(subscription_id);
    }

    /// Reset the panel and stop accepting frames until the next attach. The
    /// subscription it was listening to is retired.
    pub fn unload(&mut self) {
        if let Some(id) = self.subscription_id().map(str::to_owned) {
            debug!(subscription_id = %id, "retiring subscription");
            self.retired.insert(id);
        }
        self.attachment = Attachment::Detached;
        self.pinned = None;
        self.dispatch(Action::HandleUnload);
        info!("panel unloaded");
    }

    /// Apply an action directly, bypassing frame filtering.
    pub fn dispatch(&mut self, action: Action) {
        let prev = std::mem::take(&mut self.state);
        self.state = reduce(prev, action);
    }

    /// Classify and apply one frame. Returns whether an action was applied.
    pub fn apply(&mut self, frame: &Frame) -> bool {
        if !frame.kind.is_inbound() {
            debug!(kind = frame.kind.as_str(), id = ?frame.id, "ignoring client-sent frame");
            return false;
        }
        if !self.accepts(frame) {
            debug!(kind = frame.kind.as_str(), id = ?frame.id, "dropping frame for inactive subscription");
            return false;
        }
        self.pin(frame);
        let Some(action) = classify(frame) else {
            return false;
        };
        if frame.kind.is_terminal() {
            debug!(kind = frame.kind.as_str(), id = ?frame.id, "terminal frame received");
        }
        self.dispatch(action);
        true
    }

    fn accepts(&self, frame: &Frame) -> bool {
        if frame.id.as_ref().is_some_and(|id| self.retired.contains(id)) {
            return false;
        }
        match (&self.attachment, &frame.id) {
            (Attachment::Detached, _) => false,
            (Attachment::Attached(Some(expected)), Some(actual)) => expected == actual,
            (Attachment::Attached(None), Some(actual)) => self.pinned.as_ref().is_none_or(|pinned| pinned == actual),
            (Attachment::Attached(_), None) => true,
        }
    }

    fn pin(&mut self, frame: &Frame) {
        if self.attachment != Attachment::Attached(None) || self.pinned.is_some() {
            return;
        }
        if let Some(id) = &frame.id {
            debug!(subscription_id = %id, "wildcard attachment pinned");
            self.pinned = Some(id.clone());
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

enum Command {
    Attach(Option<String>),
    Frame(Frame),
    Text(String),
    Unload,
    Sync(oneshot::Sender<PanelState>),
}

/// Handle to a panel running on its own task.
///
/// Dropping the client closes the queue and ends the task; `shutdown` also
/// waits for the queue to drain.
pub struct PanelClient {
    tx: mpsc::Sender<Command>,
    state: watch::Receiver<PanelState>,
    task: JoinHandle<()>,
}

/// Spawn the panel task. The panel starts attached when the config names a
/// subscription id, detached otherwise.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
#[must_use]
pub fn spawn_panel(config: &PanelConfig) -> PanelClient {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let (state_tx, state_rx) = watch::channel(PanelState::initial());

    let mut panel = Panel::new();
    if let Some(id) = &config.subscription_id {
        panel.attach(Some(id.clone()));
    }

    let task = tokio::spawn(run_panel(panel, rx, state_tx));
    PanelClient { tx, state: state_rx, task }
}

async fn run_panel(mut panel: Panel, mut rx: mpsc::Receiver<Command>, state_tx: watch::Sender<PanelState>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Attach(subscription_id) => panel.attach(subscription_id),
            Command::Frame(frame) => {
                panel.apply(&frame);
            }
            Command::Text(text) => match frames::decode_frame(&text) {
                Ok(frame) => {
                    panel.apply(&frame);
                }
                Err(e) => warn!(error = %e, "dropping undecodable frame"),
            },
            Command::Unload => panel.unload(),
            Command::Sync(reply) => {
                let _ = reply.send(panel.state().clone());
                continue;
            }
        }
        publish(&state_tx, panel.state());
    }
    debug!("panel queue closed");
}

fn publish(state_tx: &watch::Sender<PanelState>, next: &PanelState) {
    state_tx.send_if_modified(|current| {
        if *current == *next {
            false
        } else {
            *current = next.clone();
            true
        }
    });
}

impl PanelClient {
    async fn send(&self, command: Command) -> Result<(), ClientError> {
        self.tx.send(command).await.map_err(|_| ClientError::Closed)
    }

    /// Attach to a known subscription id (any id when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn attach(&self, subscription_id: Option<String>) -> Result<(), ClientError> {
        self.send(Command::Attach(subscription_id)).await
    }

    /// Attach to a freshly generated subscription id and return it, so the
    /// transport can start its operation under that id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn attach_new(&self) -> Result<String, ClientError> {
        let id = Uuid::new_v4().to_string();
        self.attach(Some(id.clone())).await?;
        Ok(id)
    }

    /// Queue a decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn push_frame(&self, frame: Frame) -> Result<(), ClientError> {
        self.send(Command::Frame(frame)).await
    }

    /// Queue raw frame text; decoding happens in queue order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn push_text(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.send(Command::Text(text.into())).await
    }

    /// Forward every frame text of a stream, in order. Returns the count forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task stops mid-stream.
    pub async fn forward<S>(&self, stream: S) -> Result<usize, ClientError>
    where
        S: Stream<Item = String>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut count = 0;
        while let Some(text) = stream.next().await {
            self.push_text(text).await?;
            count += 1;
        }
        Ok(count)
    }

    /// Reset the panel and detach it from its subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn unload(&self) -> Result<(), ClientError> {
        self.send(Command::Unload).await
    }

    /// State after every command queued so far has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the panel task has stopped.
    pub async fn current(&self) -> Result<PanelState, ClientError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Sync(reply_tx)).await?;
        reply_rx.await.map_err(|_| ClientError::Closed)
    }

    /// Last published state, without waiting for queued frames.
    #[must_use]
    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Receiver the view layer re-renders from.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }

    /// Close the queue, let queued frames drain, and wait for the task.
    pub async fn shutdown(self) {
        let Self { tx, task, .. } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "panel task ended abnormally");
        }
    }
}
