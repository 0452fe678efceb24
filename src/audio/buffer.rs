//! Chunk queue between the audio callback and the session worker
//!
//! The audio callback runs on cpal's real-time thread, so the push side must
//! never block or take a lock. An unbounded channel gives exactly that: the
//! callback only ever sends, and the session worker drains the receiving
//! half once, after the stream has been stopped.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// One block of samples as delivered by a single audio-callback invocation.
pub type Chunk = Vec<f32>;

/// An unbounded FIFO of captured audio chunks.
///
/// Single producer (the audio callback) and single consumer (the session
/// worker). Chunks come back from `drain_all` in exactly the order they were
/// pushed; nothing is dropped between push and drain.
pub struct FrameBuffer {
    tx: Sender<Chunk>,
    rx: Receiver<Chunk>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Append a chunk to the tail. Never blocks; safe to call from the
    /// audio callback.
    pub fn push(&self, chunk: Chunk) {
        // send() only fails when the receiving half is gone, and we own it.
        let _ = self.tx.send(chunk);
    }

    /// Remove and return every queued chunk in arrival order, leaving the
    /// buffer empty. An empty buffer yields an empty Vec, not an error.
    pub fn drain_all(&self) -> Vec<Chunk> {
        self.rx.try_iter().collect()
    }

    /// Number of chunks currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
