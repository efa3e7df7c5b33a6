use super::types::{distance, Point};
use super::workspace::WorkspaceBounds;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random state generator over a rectangular workspace.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// A seeded sampler reproduces the same sequence for the same seed; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn sample(&mut self, bounds: &WorkspaceBounds) -> Point {
        Point {
            x: self.rng.gen_range(bounds.min_x..bounds.max_x),
            y: self.rng.gen_range(bounds.min_y..bounds.max_y),
        }
    }
}

/// Clamp the edge `from -> toward` to at most `max_step`, keeping its bearing.
pub fn steer(from: &Point, toward: &Point, max_step: f64) -> Point {
    if distance(from, toward) <= max_step {
        return *toward;
    }
    let theta = (toward.y - from.y).atan2(toward.x - from.x);
    Point {
        x: from.x + max_step * theta.cos(),
        y: from.y + max_step * theta.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_is_identity_within_step() {
        let from = Point::new(10.0, 10.0);
        let toward = Point::new(13.0, 14.0);
        assert_eq!(steer(&from, &toward, 5.0), toward);
        assert_eq!(steer(&from, &toward, 10.0), toward);
    }

    #[test]
    fn steer_clamps_to_step_along_bearing() {
        let from = Point::new(0.0, 0.0);
        let toward = Point::new(30.0, 40.0);
        let p = steer(&from, &toward, 10.0);
        assert!((distance(&from, &p) - 10.0).abs() < 1e-9);
        assert!((p.x - 6.0).abs() < 1e-9);
        assert!((p.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn steer_never_overshoots() {
        let mut sampler = Sampler::new(Some(3));
        let bounds = WorkspaceBounds::new(-200.0, 200.0, -200.0, 200.0).unwrap();
        for _ in 0..1000 {
            let from = sampler.sample(&bounds);
            let toward = sampler.sample(&bounds);
            let p = steer(&from, &toward, 10.0);
            assert!(distance(&from, &p) <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn samples_stay_in_bounds_and_are_reproducible() {
        let bounds = WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).unwrap();
        let mut a = Sampler::new(Some(42));
        let mut b = Sampler::new(Some(42));
        for _ in 0..500 {
            let p = a.sample(&bounds);
            assert!(bounds.contains(&p));
            assert_eq!(p, b.sample(&bounds));
        }
    }
}
