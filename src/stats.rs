/// Running min/max/sum/count for one key.
///
/// A `Stats` only ever comes into existence from a first observed value, so
/// `count` is always at least one and `mean()` never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Stats {
    /// Stats for a key that has seen exactly one value.
    pub fn new(value: f64) -> Self {
        Stats {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Folds one more value in.
    pub fn update(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value;
        self.count += 1;
    }

    /// Folds another accumulator for the same key in, as if its `count`
    /// values had been passed to `update` one by one.
    pub fn merge(&mut self, other: &Stats) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_one_observation() {
        let s = Stats::new(4.2);
        assert_eq!(s.min(), 4.2);
        assert_eq!(s.max(), 4.2);
        assert_eq!(s.sum(), 4.2);
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn update_tracks_extremes() {
        let mut s = Stats::new(3.0);
        s.update(-1.5);
        s.update(10.0);
        assert_eq!(s.min(), -1.5);
        assert_eq!(s.max(), 10.0);
        assert_eq!(s.count(), 3);
        assert!((s.mean() - 3.8333).abs() < 1e-3);
    }

    #[test]
    fn merge_matches_sequential_updates() {
        let mut left = Stats::new(1.0);
        left.update(7.5);
        let mut right = Stats::new(-2.0);
        right.update(3.0);

        let mut merged = left;
        merged.merge(&right);

        let mut sequential = Stats::new(1.0);
        for v in [7.5, -2.0, 3.0] {
            sequential.update(v);
        }
        assert_eq!(merged, sequential);
    }

    #[test]
    fn merge_is_commutative() {
        let a = Stats::new(5.0);
        let mut b = Stats::new(-5.0);
        b.update(0.5);

        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab.min(), ba.min());
        assert_eq!(ab.max(), ba.max());
        assert_eq!(ab.count(), ba.count());
        assert_eq!(ab.sum(), ba.sum());
    }
}
