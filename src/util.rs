//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: std::cmp::PartialOrd> Interval<T> {
    /// Returns true if this interval overlaps with the other.
    /// Intervals which merely touch at an end point do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max > other.min && other.max > self.min
    }

    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Float> Interval<T> {
    /// Creates an interval with the given centre and radius.
    pub fn disc(centre: T, radius: T) -> Self {
        Self {
            min: centre - radius,
            max: centre + radius,
        }
    }

    /// Clamps a value into the interval.
    pub fn clamp(&self, value: T) -> T {
        value.max(self.min).min(self.max)
    }

    pub fn lerp(&self, t: T) -> T {
        self.min + t * (self.max - self.min)
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::Interval;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = Interval::new(0.0, 1.0);
        assert!(!a.overlaps(&Interval::new(1.0, 2.0)));
        assert!(a.overlaps(&Interval::new(0.5, 2.0)));
        assert!(Interval::new(-1.0, 5.0).overlaps(&a));
    }

    #[test]
    fn disc_clamp_and_lerp() {
        let i: Interval<f64> = Interval::disc(2.0, 0.5);
        assert_approx_eq!(i.length(), 1.0);
        assert_approx_eq!(i.clamp(10.0), 2.5);
        assert_approx_eq!(i.clamp(-3.0), 1.5);
        assert_approx_eq!(i.lerp(0.5), 2.0);
        assert_approx_eq!(i.lerp(0.0), 1.5);
    }
}
