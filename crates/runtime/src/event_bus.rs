use crate::frame::Frame;

/// What happened. `name()` is the stable dotted form used in logs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    GridRegenerated,
    GraticuleBuilt,
    TextureSwapped,
    TextureFailed,
    TextureStale,
    Shutdown,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::GridRegenerated => "grid.regenerated",
            EventKind::GraticuleBuilt => "graticule.built",
            EventKind::TextureSwapped => "texture.swapped",
            EventKind::TextureFailed => "texture.failed",
            EventKind::TextureStale => "texture.stale",
            EventKind::Shutdown => "session.shutdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Append-only record of session activity, drained by the host.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(frame = frame.index, kind = kind.name(), %message, "event");
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};
    use crate::frame::Frame;
    use foundation::time::Time;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::new(2, Time(0.1));
        bus.emit(f, EventKind::GridRegenerated, "step=3");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
        assert_eq!(bus.count(EventKind::GridRegenerated), 1);
        assert_eq!(bus.count(EventKind::TextureSwapped), 0);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::first(), EventKind::Shutdown, "bye");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind.name(), "session.shutdown");
        assert!(bus.events().is_empty());
    }
}
