//! Playback controller: owns the grid, tempo, kit selection, and scheduler,
//! and wires them to the host's frame loop and command/event queues.

use crate::commands::Command;
use crate::errors::GridError;
use crate::events::{EngineEvent, EngineEventSender};
use crate::instruments::{CatalogResolver, SoundResolver};
use crate::notation;
use crate::pattern::Pattern;
use crate::presets;
use crate::sequencing::{Clock, FrameScheduler, LookaheadScheduler, SoundSink, TickHandle};
use crate::tempo::Tempo;

/// Default kit selection before the user picks one.
pub const DEFAULT_KIT: &str = "RolandTR808";

pub struct DrumMachine {
    pattern: Pattern,
    tempo: Tempo,
    kit: String,
    scheduler: LookaheadScheduler,
    resolver: Box<dyn SoundResolver>,
    events: EngineEventSender,
    pending_tick: Option<TickHandle>,
}

impl DrumMachine {
    pub fn new(events: EngineEventSender) -> Self {
        Self::with_resolver(events, Box::new(CatalogResolver))
    }

    pub fn with_resolver(events: EngineEventSender, resolver: Box<dyn SoundResolver>) -> Self {
        Self {
            pattern: Pattern::default(),
            tempo: Tempo::default(),
            kit: DEFAULT_KIT.to_string(),
            scheduler: LookaheadScheduler::new(),
            resolver,
            events,
            pending_tick: None,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }

    pub fn kit(&self) -> &str {
        &self.kit
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn cursor(&self) -> usize {
        self.scheduler.cursor()
    }

    /// Compile the current grid for the external editor/engine.
    pub fn export(&self) -> String {
        notation::compile(&self.pattern, &self.kit, self.tempo.bpm())
    }

    /// Apply one queued command. Errors are synchronous and leave the machine
    /// unchanged.
    pub fn apply(
        &mut self,
        command: Command,
        clock: &dyn Clock,
        frames: &mut dyn FrameScheduler,
    ) -> Result<(), GridError> {
        match command {
            Command::SetBpm(bpm) => {
                // Takes effect on the next computed step length; committed
                // deadlines keep their timestamps.
                self.tempo.set_bpm(bpm);
                Ok(())
            }
            Command::SelectKit(kit) => {
                self.kit = kit;
                Ok(())
            }
            Command::ToggleStep { instrument, step } => {
                self.pattern = self.pattern.toggle(&instrument, step)?;
                Ok(())
            }
            Command::ClearPattern => {
                self.pattern = self.pattern.clear();
                self.events.send(EngineEvent::PatternReplaced);
                Ok(())
            }
            Command::LoadPreset(id) => {
                self.pattern = presets::load(&id)?;
                self.events.send(EngineEvent::PatternReplaced);
                Ok(())
            }
            Command::SetPattern(config) => {
                self.pattern = Pattern::from_config(&config, self.pattern.step_count())?;
                self.events.send(EngineEvent::PatternReplaced);
                Ok(())
            }
            Command::Start => {
                self.start(clock, frames);
                Ok(())
            }
            Command::Stop => {
                self.stop(frames);
                Ok(())
            }
        }
    }

    pub fn start(&mut self, clock: &dyn Clock, frames: &mut dyn FrameScheduler) {
        if self.scheduler.is_playing() {
            return;
        }
        self.scheduler.start(clock.now());
        self.pending_tick = Some(frames.request_tick());
        self.events.send(EngineEvent::PlaybackStarted);
    }

    /// Cancellation is synchronous: the pending frame is cancelled here, and
    /// a frame that slips through anyway is ignored by `on_frame`.
    pub fn stop(&mut self, frames: &mut dyn FrameScheduler) {
        if !self.scheduler.is_playing() {
            return;
        }
        self.scheduler.stop();
        if let Some(handle) = self.pending_tick.take() {
            frames.cancel_tick(handle);
        }
        self.events.send(EngineEvent::PlaybackStopped);
    }

    /// One granted frame: run the scheduler tick, report playhead movement,
    /// and request the next frame.
    pub fn on_frame(
        &mut self,
        clock: &dyn Clock,
        frames: &mut dyn FrameScheduler,
        sink: &mut dyn SoundSink,
    ) {
        if !self.scheduler.is_playing() {
            // Stale frame delivered after stop.
            self.pending_tick = None;
            return;
        }

        let step_count = self.pattern.step_count();
        let first = self.scheduler.cursor();
        let advanced = self.scheduler.tick(
            clock.now(),
            &self.pattern,
            &self.tempo,
            &self.kit,
            self.resolver.as_ref(),
            sink,
        );
        for offset in 0..advanced {
            self.events
                .send(EngineEvent::StepAdvanced((first + offset) % step_count));
        }

        self.pending_tick = Some(frames.request_tick());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EngineEventQueue;
    use crate::sequencing::ManualClock;
    use serde_json::json;

    /// Frame scheduler that just counts requests and records cancellations.
    struct FakeFrames {
        next_handle: TickHandle,
        cancelled: Vec<TickHandle>,
    }

    impl FakeFrames {
        fn new() -> Self {
            Self {
                next_handle: 0,
                cancelled: Vec::new(),
            }
        }
    }

    impl FrameScheduler for FakeFrames {
        fn request_tick(&mut self) -> TickHandle {
            self.next_handle += 1;
            self.next_handle
        }

        fn cancel_tick(&mut self, handle: TickHandle) {
            self.cancelled.push(handle);
        }
    }

    struct RecordingSink {
        calls: Vec<(String, f64)>,
    }

    impl SoundSink for RecordingSink {
        fn dispatch(&mut self, sound_key: &str, when_seconds: f64) -> Result<(), GridError> {
            self.calls.push((sound_key.to_string(), when_seconds));
            Ok(())
        }
    }

    fn machine_with_queue() -> (DrumMachine, EngineEventQueue) {
        let queue = EngineEventQueue::new();
        let machine = DrumMachine::new(queue.sender());
        (machine, queue)
    }

    fn drain(queue: &EngineEventQueue) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        queue.receiver().process_events(|event| events.push(event));
        events
    }

    #[test]
    fn test_start_requests_a_frame_and_stop_cancels_it() {
        let (mut machine, queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();

        machine.start(&clock, &mut frames);
        assert!(machine.is_playing());
        assert_eq!(frames.next_handle, 1);

        machine.stop(&mut frames);
        assert!(!machine.is_playing());
        assert_eq!(frames.cancelled, vec![1]);
        assert_eq!(
            drain(&queue),
            vec![EngineEvent::PlaybackStarted, EngineEvent::PlaybackStopped]
        );
    }

    #[test]
    fn test_stale_frame_after_stop_is_ignored() {
        let (mut machine, queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();
        let mut sink = RecordingSink { calls: Vec::new() };

        machine
            .apply(Command::ToggleStep { instrument: "kick".to_string(), step: 0 }, &clock, &mut frames)
            .unwrap();
        machine.start(&clock, &mut frames);
        machine.stop(&mut frames);
        drain(&queue);

        clock.set(10.0);
        machine.on_frame(&clock, &mut frames, &mut sink);
        assert!(sink.calls.is_empty());
        assert!(drain(&queue).is_empty());
        // The stale frame must not re-arm the loop.
        assert_eq!(frames.next_handle, 1);
    }

    #[test]
    fn test_on_frame_dispatches_and_reports_playhead() {
        let (mut machine, queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();
        let mut sink = RecordingSink { calls: Vec::new() };

        for step in 0..16 {
            machine
                .apply(
                    Command::ToggleStep { instrument: "kick".to_string(), step },
                    &clock,
                    &mut frames,
                )
                .unwrap();
        }
        machine.start(&clock, &mut frames);
        drain(&queue);

        clock.set(0.26);
        machine.on_frame(&clock, &mut frames, &mut sink);

        assert_eq!(sink.calls.len(), 3);
        assert_eq!(
            drain(&queue),
            vec![
                EngineEvent::StepAdvanced(0),
                EngineEvent::StepAdvanced(1),
                EngineEvent::StepAdvanced(2),
            ]
        );
        // The loop re-armed itself.
        assert_eq!(frames.next_handle, 2);
    }

    #[test]
    fn test_failed_command_leaves_machine_unchanged() {
        let (mut machine, _queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();
        let before = machine.pattern().clone();

        let err = machine
            .apply(
                Command::ToggleStep { instrument: "kick".to_string(), step: 99 },
                &clock,
                &mut frames,
            )
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidIndex { .. }));
        assert_eq!(machine.pattern(), &before);

        let err = machine
            .apply(Command::LoadPreset("polka".to_string()), &clock, &mut frames)
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownPreset(_)));
        assert_eq!(machine.pattern(), &before);
    }

    #[test]
    fn test_preset_and_config_commands_replace_the_grid() {
        let (mut machine, queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();

        machine
            .apply(Command::LoadPreset("house".to_string()), &clock, &mut frames)
            .unwrap();
        assert_eq!(machine.pattern(), &presets::load("house").unwrap());

        machine
            .apply(Command::ClearPattern, &clock, &mut frames)
            .unwrap();
        assert!(machine.pattern().is_silent());

        let config = json!({ "snare": [
            false, false, false, false, true, false, false, false,
            false, false, false, false, true, false, false, false
        ]});
        machine
            .apply(Command::SetPattern(config), &clock, &mut frames)
            .unwrap();
        assert_eq!(machine.pattern().cell("snare", 4), Some(true));

        assert_eq!(
            drain(&queue),
            vec![
                EngineEvent::PatternReplaced,
                EngineEvent::PatternReplaced,
                EngineEvent::PatternReplaced,
            ]
        );
    }

    #[test]
    fn test_export_uses_current_kit_and_bpm() {
        let (mut machine, _queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();

        machine
            .apply(Command::SetBpm(140.0), &clock, &mut frames)
            .unwrap();
        machine
            .apply(Command::SelectKit("RolandTR909".to_string()), &clock, &mut frames)
            .unwrap();
        machine
            .apply(
                Command::ToggleStep { instrument: "kick".to_string(), step: 0 },
                &clock,
                &mut frames,
            )
            .unwrap();

        let program = machine.export();
        assert!(program.contains("setcps(140/60/4)  // 140 BPM"));
        assert!(program.contains(".bank(\"RolandTR909\")"));
    }

    #[test]
    fn test_bpm_change_mid_playback_keeps_cursor() {
        let (mut machine, queue) = machine_with_queue();
        let clock = ManualClock::new(0.0);
        let mut frames = FakeFrames::new();
        let mut sink = RecordingSink { calls: Vec::new() };

        machine.start(&clock, &mut frames);
        drain(&queue);
        clock.set(0.26);
        machine.on_frame(&clock, &mut frames, &mut sink);
        let cursor = machine.cursor();

        machine
            .apply(Command::SetBpm(180.0), &clock, &mut frames)
            .unwrap();
        assert_eq!(machine.cursor(), cursor);
        assert!(machine.is_playing());
    }
}
