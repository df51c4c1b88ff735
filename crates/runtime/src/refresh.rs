use tracing::debug;

use crate::frame::Frame;

/// Defers one piece of work to the next display refresh.
///
/// Holds at most one pending job. While a job is pending further requests are
/// refused, which is what keeps a double click on "render" from queueing two
/// regenerations. A job requested during frame `n` becomes due at frame `n + 1`
/// at the earliest, so the host gets to paint a busy indicator first.
#[derive(Debug)]
pub struct RefreshGate<T> {
    pending: Option<T>,
    requested_after: Option<u64>,
    last_frame: Option<u64>,
}

impl<T> Default for RefreshGate<T> {
    fn default() -> Self {
        Self {
            pending: None,
            requested_after: None,
            last_frame: None,
        }
    }
}

impl<T> RefreshGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and drops `job`) if something is already pending.
    pub fn request(&mut self, job: T) -> bool {
        if self.pending.is_some() {
            debug!("refresh already pending; request ignored");
            return false;
        }
        self.pending = Some(job);
        self.requested_after = self.last_frame;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Hands out the pending job if `frame` is later than the frame it was
    /// requested in.
    pub fn take_due(&mut self, frame: Frame) -> Option<T> {
        let due = match self.requested_after {
            Some(after) => frame.index > after,
            None => true,
        };
        self.last_frame = Some(frame.index);
        if !due {
            return None;
        }
        self.requested_after = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::RefreshGate;
    use crate::frame::Frame;
    use foundation::time::Time;

    #[test]
    fn rejects_reentrant_requests() {
        let mut gate = RefreshGate::new();
        assert!(gate.request(1));
        assert!(!gate.request(2));
        assert_eq!(gate.pending(), Some(&1));
    }

    #[test]
    fn job_runs_on_a_later_frame() {
        let mut gate = RefreshGate::new();
        let f0 = Frame::first();
        assert_eq!(gate.take_due(f0), None::<u32>);

        assert!(gate.request(7));
        assert_eq!(gate.take_due(f0), None);
        let f1 = f0.advance(Time(0.016));
        assert_eq!(gate.take_due(f1), Some(7));
        assert!(!gate.is_pending());
        assert!(gate.request(8));
    }

    #[test]
    fn request_before_any_frame_runs_on_the_first() {
        let mut gate = RefreshGate::new();
        assert!(gate.request("startup"));
        assert_eq!(gate.take_due(Frame::first()), Some("startup"));
    }
}
