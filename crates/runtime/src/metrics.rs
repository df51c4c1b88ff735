use std::collections::BTreeMap;

/// Session counters and gauges.
///
/// Sorted maps keep snapshots in a stable order for logs and the debug overlay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, u64>,
    distributions: BTreeMap<&'static str, Distribution>,
}

/// Running summary of observed values (e.g. points per regeneration).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Distribution {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
}

impl Distribution {
    pub fn record(&mut self, value: u64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub gauges: Vec<(&'static str, u64)>,
    pub distributions: Vec<(&'static str, Distribution)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: &'static str) {
        *self.counters.entry(name).or_insert(0) += 1;
    }

    pub fn gauge(&self, name: &str) -> Option<u64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: u64) {
        self.gauges.insert(name, value);
    }

    pub fn observe(&mut self, name: &'static str, value: u64) {
        self.distributions.entry(name).or_default().record(value);
    }

    pub fn distribution(&self, name: &str) -> Option<Distribution> {
        self.distributions.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (*k, *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (*k, *v)).collect(),
            distributions: self.distributions.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Distribution, Metrics};
    use pretty_assertions::assert_eq;

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc_counter("grid.regenerations");
        m.inc_counter("grid.regenerations");
        assert_eq!(m.counter("grid.regenerations"), 2);
        assert_eq!(m.counter("missing"), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge("gpu.resident_bytes"), None);
        m.set_gauge("gpu.resident_bytes", 10);
        m.set_gauge("gpu.resident_bytes", 4);
        assert_eq!(m.gauge("gpu.resident_bytes"), Some(4));
    }

    #[test]
    fn distribution_tracks_extremes() {
        let mut d = Distribution::default();
        assert_eq!(d.mean(), None);
        d.record(65_160);
        d.record(7_200);
        assert_eq!(d.min, 7_200);
        assert_eq!(d.max, 65_160);
        assert_eq!(d.mean(), Some(36_180.0));
    }

    #[test]
    fn snapshot_is_sorted() {
        let mut m = Metrics::new();
        m.inc_counter("texture.swaps");
        m.inc_counter("grid.regenerations");
        m.set_gauge("gpu.resident_bytes", 1);
        m.observe("grid.points", 4);

        let snap = m.snapshot();
        assert_eq!(
            snap.counters,
            vec![("grid.regenerations", 1), ("texture.swaps", 1)]
        );
        assert_eq!(snap.gauges, vec![("gpu.resident_bytes", 1)]);
        assert_eq!(snap.distributions.len(), 1);
    }
}
