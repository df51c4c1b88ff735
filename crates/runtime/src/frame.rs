use foundation::time::Time;

/// One display refresh.
///
/// The browser drives frames from `requestAnimationFrame` timestamps; tests
/// and tools step them by hand. Only the index matters for ordering, so replays
/// stay deterministic regardless of wall-clock jitter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            time: Time::ZERO,
        }
    }

    pub fn new(index: u64, time: Time) -> Self {
        Self { index, time }
    }

    /// Next frame at `time`. Time never runs backwards; an older timestamp
    /// keeps the previous one.
    pub fn advance(self, time: Time) -> Self {
        let time = if time.seconds() >= self.time.seconds() {
            time
        } else {
            self.time
        };
        Self {
            index: self.index + 1,
            time,
        }
    }

    /// Converts a `requestAnimationFrame` timestamp (milliseconds).
    pub fn advance_ms(self, timestamp_ms: f64) -> Self {
        self.advance(Time(timestamp_ms / 1000.0))
    }
}
