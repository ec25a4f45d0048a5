//! Single-writer mailbox over the desktop reducer.
//!
//! Any number of [`DesktopMailbox`] clones, on any thread, enqueue actions. One
//! [`DesktopActor`] drains them in arrival order and is the only code that ever replaces the
//! state, so concurrent producers can never interleave a transition.

use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use thiserror::Error;

use crate::model::DesktopState;
use crate::reducer::{reduce_desktop, DesktopAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxError {
    #[error("desktop actor has stopped")]
    Closed,
}

enum Envelope {
    Action(DesktopAction),
    Subscribe(UnboundedSender<Arc<DesktopState>>),
}

/// Creates a connected mailbox and actor seeded with `initial`.
pub fn mailbox(initial: DesktopState) -> (DesktopMailbox, DesktopActor) {
    let (tx, rx) = mpsc::unbounded();
    (
        DesktopMailbox { tx },
        DesktopActor {
            state: Arc::new(initial),
            inbox: rx,
            subscribers: Vec::new(),
        },
    )
}

#[derive(Clone)]
/// Cloneable sending half.
pub struct DesktopMailbox {
    tx: UnboundedSender<Envelope>,
}

impl DesktopMailbox {
    /// Enqueues an action.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] once the actor has been dropped or the mailbox closed.
    pub fn send(&self, action: DesktopAction) -> Result<(), MailboxError> {
        self.tx
            .unbounded_send(Envelope::Action(action))
            .map_err(|_| MailboxError::Closed)
    }

    /// Subscribes to state changes. The stream yields the state current at the moment the
    /// subscription is processed, then every changed state, and ends when the actor stops.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] once the actor has been dropped or the mailbox closed.
    pub fn subscribe(&self) -> Result<UnboundedReceiver<Arc<DesktopState>>, MailboxError> {
        let (tx, rx) = mpsc::unbounded();
        self.tx
            .unbounded_send(Envelope::Subscribe(tx))
            .map_err(|_| MailboxError::Closed)?;
        Ok(rx)
    }

    /// Stops accepting actions for every clone. The actor finishes the queued ones and returns.
    pub fn close(&self) {
        self.tx.close_channel();
    }
}

/// Receiving half that owns the state.
pub struct DesktopActor {
    state: Arc<DesktopState>,
    inbox: UnboundedReceiver<Envelope>,
    subscribers: Vec<UnboundedSender<Arc<DesktopState>>>,
}

impl DesktopActor {
    pub fn state(&self) -> &Arc<DesktopState> {
        &self.state
    }

    /// Applies queued actions until every mailbox is dropped or closed, then returns the final
    /// state.
    pub async fn run(mut self) -> Arc<DesktopState> {
        while let Some(envelope) = self.inbox.next().await {
            self.handle(envelope);
        }
        tracing::debug!("desktop mailbox drained");
        self.state
    }

    fn handle(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::Action(action) => {
                let next = reduce_desktop(&self.state, action);
                if Arc::ptr_eq(&next, &self.state) {
                    return;
                }
                self.state = next;
                let state = &self.state;
                self.subscribers
                    .retain(|subscriber| subscriber.unbounded_send(Arc::clone(state)).is_ok());
            }
            Envelope::Subscribe(subscriber) => {
                if subscriber.unbounded_send(Arc::clone(&self.state)).is_ok() {
                    self.subscribers.push(subscriber);
                }
            }
        }
    }
}

impl std::fmt::Debug for DesktopMailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopMailbox")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl std::fmt::Debug for DesktopActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopActor")
            .field("windows", &self.state.windows.len())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppKind, WindowChrome};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::model::{FocusTarget, OpenWindowRequest, WindowId, WindowRect};

    fn notepad() -> DesktopAction {
        DesktopAction::OpenWindow(OpenWindowRequest {
            app_kind: AppKind::Notepad,
            title: "Untitled - Notepad".to_string(),
            icon: "notepad".to_string(),
            geometry: WindowRect::new(10, 10, 300, 200),
            resizable: true,
            allows_multiple_instances: true,
            chrome: WindowChrome::default(),
            maximized: false,
            inject: Value::Null,
        })
    }

    #[test]
    fn actions_apply_in_arrival_order() {
        let (mailbox, actor) = mailbox(DesktopState::default());
        mailbox.send(notepad()).unwrap();
        mailbox.send(notepad()).unwrap();
        mailbox
            .send(DesktopAction::CloseWindow {
                window_id: WindowId(1),
            })
            .unwrap();
        drop(mailbox);

        let state = block_on(actor.run());
        assert_eq!(state.windows.len(), 1);
        assert_eq!(state.windows[0].id, WindowId(2));
        assert_eq!(state.focus_target, FocusTarget::Window);
    }

    #[test]
    fn subscribers_see_only_changed_states() {
        let (mailbox, actor) = mailbox(DesktopState::default());
        let updates = mailbox.subscribe().unwrap();
        mailbox.send(notepad()).unwrap();
        mailbox.send(DesktopAction::EndSelect).unwrap();
        mailbox.send(DesktopAction::FocusDesktop).unwrap();
        mailbox.close();

        block_on(actor.run());
        let seen: Vec<Arc<DesktopState>> = block_on(updates.collect());
        let focus: Vec<FocusTarget> = seen.iter().map(|s| s.focus_target).collect();
        assert_eq!(
            focus,
            vec![
                FocusTarget::Desktop,
                FocusTarget::Window,
                FocusTarget::Desktop
            ]
        );
    }

    #[test]
    fn producers_on_other_threads_share_one_writer() {
        let (mailbox, actor) = mailbox(DesktopState::default());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let mailbox = mailbox.clone();
                scope.spawn(move || {
                    for _ in 0..5 {
                        mailbox.send(notepad()).unwrap();
                    }
                });
            }
        });
        drop(mailbox);

        let state = block_on(actor.run());
        assert_eq!(state.windows.len(), 20);
        assert_eq!(state.next_window_id, 21);
        assert_eq!(state.next_z_index, 21);
    }

    #[test]
    fn sending_after_actor_stopped_fails() {
        let (mailbox, actor) = mailbox(DesktopState::default());
        drop(actor);
        assert_eq!(mailbox.send(notepad()), Err(MailboxError::Closed));
        assert!(mailbox.subscribe().is_err());
    }
}
