use crossbeam::queue::SegQueue;
use std::sync::Arc;

/// Events emitted by the machine for the UI side: playhead movement and
/// pattern-wide changes. Single-cell toggles are echoed by the UI itself and
/// need no event.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The playhead moved to this step (one event per dispatched step).
    StepAdvanced(usize),
    PlaybackStarted,
    PlaybackStopped,
    /// The whole grid was replaced (clear, preset load, config load).
    PatternReplaced,
}

/// Lock-free event queue for machine -> UI communication.
pub struct EngineEventQueue {
    queue: Arc<SegQueue<EngineEvent>>,
}

impl EngineEventQueue {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }

    /// Get a handle for sending events (for the machine side)
    pub fn sender(&self) -> EngineEventSender {
        EngineEventSender {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Get a handle for receiving events (for the UI side)
    pub fn receiver(&self) -> EngineEventReceiver {
        EngineEventReceiver {
            queue: Arc::clone(&self.queue),
        }
    }
}

/// Sender handle for the machine side
#[derive(Clone)]
pub struct EngineEventSender {
    queue: Arc<SegQueue<EngineEvent>>,
}

impl EngineEventSender {
    /// Send an event to the UI side (non-blocking)
    pub fn send(&self, event: EngineEvent) {
        self.queue.push(event);
    }
}

/// Receiver handle for the UI side
pub struct EngineEventReceiver {
    queue: Arc<SegQueue<EngineEvent>>,
}

impl EngineEventReceiver {
    /// Process all pending events. This should be called once per render
    /// frame.
    pub fn process_events<F>(&self, mut emit_event: F)
    where
        F: FnMut(EngineEvent),
    {
        while let Some(event) = self.queue.pop() {
            emit_event(event);
        }
    }
}

impl Default for EngineEventQueue {
    fn default() -> Self {
        Self::new()
    }
}
