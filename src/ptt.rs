//! Push-to-talk key-state controller
//!
//! Two states, Idle and Active. A press flips the shared capture flag on
//! and queues a session start; a release flips the flag off before queueing
//! the stop, so the audio callback stops forwarding chunks the moment the
//! key comes up rather than when the worker closes the stream. Repeated
//! presses and repeated releases are ignored.

use crate::pipeline::SessionCommand;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Controller owning the Idle/Active push-to-talk state machine.
///
/// Runs on the key listener thread; the only work it does per transition is
/// an atomic store and a channel send, so key events are never delayed by
/// audio or network activity.
pub struct PttController {
    active: bool,
    capturing: Arc<AtomicBool>,
    commands: Sender<SessionCommand>,
}

impl PttController {
    pub fn new(capturing: Arc<AtomicBool>, commands: Sender<SessionCommand>) -> Self {
        Self {
            active: false,
            capturing,
            commands,
        }
    }

    /// Handle the designated key going down.
    pub fn press(&mut self) {
        if self.active {
            tracing::debug!("Ignoring repeated press while active");
            return;
        }
        self.active = true;
        self.capturing.store(true, Ordering::SeqCst);
        if self.commands.send(SessionCommand::Start).is_err() {
            tracing::error!("Session worker is gone; cannot start capture");
        }
    }

    /// Handle the designated key coming back up.
    pub fn release(&mut self) {
        if !self.active {
            tracing::debug!("Ignoring release while idle");
            return;
        }
        self.active = false;
        // The flag goes false here, synchronously, before the stop command
        // is queued: chunks delivered from now on belong to no session.
        self.capturing.store(false, Ordering::SeqCst);
        if self.commands.send(SessionCommand::Stop).is_err() {
            tracing::error!("Session worker is gone; cannot stop capture");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
