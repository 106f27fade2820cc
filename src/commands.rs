use crossbeam::queue::SegQueue;
use std::sync::Arc;

/// Edits and transport actions sent from the UI side to the machine.
#[derive(Debug, Clone)]
pub enum Command {
    SetBpm(f64),
    SelectKit(String),
    ToggleStep { instrument: String, step: usize },
    ClearPattern,
    LoadPreset(String),
    /// Replace the whole grid from a JSON map of `id -> [bool; N]`.
    SetPattern(serde_json::Value),
    Start,
    Stop,
}

/// Lock-free command queue for UI -> machine communication.
/// Uses a multiple-producer, single-consumer queue from crossbeam.
pub struct CommandQueue {
    queue: Arc<SegQueue<Command>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }

    /// Get a handle for sending commands (for the UI side)
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Get a handle for receiving commands (for the machine side)
    pub fn receiver(&self) -> CommandReceiver {
        CommandReceiver {
            queue: Arc::clone(&self.queue),
        }
    }
}

/// Sender handle for the UI side
#[derive(Clone)]
pub struct CommandSender {
    queue: Arc<SegQueue<Command>>,
}

impl CommandSender {
    /// Send a command to the machine (non-blocking)
    pub fn send(&self, command: Command) {
        self.queue.push(command);
    }
}

/// Receiver handle for the machine side
pub struct CommandReceiver {
    queue: Arc<SegQueue<Command>>,
}

impl CommandReceiver {
    /// Process all pending commands, applying them to the machine.
    /// This should be called once at the start of each frame.
    pub fn process_commands<F>(&self, mut apply_command: F)
    where
        F: FnMut(Command),
    {
        // Process up to 64 commands per frame so a burst of queued edits
        // cannot starve the scheduler tick.
        for _ in 0..64 {
            if let Some(command) = self.queue.pop() {
                apply_command(command);
            } else {
                break;
            }
        }
    }

    /// Check if there are pending commands
    pub fn has_commands(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_drain_in_order() {
        let queue = CommandQueue::new();
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.send(Command::SetBpm(140.0));
        sender.send(Command::Start);
        assert!(receiver.has_commands());

        let mut seen = Vec::new();
        receiver.process_commands(|command| seen.push(command));
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], Command::SetBpm(bpm) if bpm == 140.0));
        assert!(matches!(seen[1], Command::Start));
        assert!(!receiver.has_commands());
    }

    #[test]
    fn test_drain_is_bounded_per_frame() {
        let queue = CommandQueue::new();
        let sender = queue.sender();
        let receiver = queue.receiver();

        for step in 0..100 {
            sender.send(Command::ToggleStep {
                instrument: "kick".to_string(),
                step: step % 16,
            });
        }

        let mut count = 0;
        receiver.process_commands(|_| count += 1);
        assert_eq!(count, 64);
        assert!(receiver.has_commands());
    }
}
