//! Rejection-sampled spawn area around the play field.

use lone_tower_core::Position;
use rand::Rng;
use thiserror::Error;

/// Reasons a spawn region cannot be built.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SpawnRegionError {
    /// The play area has no usable extent.
    #[error("arena must have positive finite dimensions, got {width}x{height}")]
    InvalidArena {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// The margin around the play area is negative or not finite.
    #[error("spawn margin must be a non-negative finite fraction, got {margin}")]
    InvalidMargin {
        /// Requested margin.
        margin: f32,
    },
    /// Every point of the sampling box lies inside the exclusion circle.
    #[error("exclusion radius {radius} covers the whole spawn box")]
    Unsatisfiable {
        /// Requested exclusion radius.
        radius: f32,
    },
}

/// Integer lattice box from which spawn points are drawn, minus a circle
/// around the tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRegion {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    center: Position,
    exclusion_radius: f32,
}

impl SpawnRegion {
    /// Builds the region covering the play area expanded by `margin` of its
    /// size on every side.
    ///
    /// # Errors
    ///
    /// Fails when the arena is degenerate, the margin is invalid, or no
    /// lattice point of the box lies outside `exclusion_radius` of `center`.
    pub fn new(
        width: f32,
        height: f32,
        margin: f32,
        center: Position,
        exclusion_radius: f32,
    ) -> Result<Self, SpawnRegionError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SpawnRegionError::InvalidArena { width, height });
        }
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(SpawnRegionError::InvalidMargin { margin });
        }

        let bound = |value: f32| {
            lattice_bound(value).ok_or(SpawnRegionError::InvalidArena { width, height })
        };
        let region = Self {
            min_x: bound(-margin * width)?,
            max_x: bound((1.0 + margin) * width)?,
            min_y: bound(-margin * height)?,
            max_y: bound((1.0 + margin) * height)?,
            center,
            exclusion_radius: exclusion_radius.max(0.0),
        };

        let corners = [
            (region.min_x, region.min_y),
            (region.min_x, region.max_y),
            (region.max_x, region.min_y),
            (region.max_x, region.max_y),
        ];
        if corners
            .iter()
            .all(|&(x, y)| !region.is_clear(Position::new(x as f32, y as f32)))
        {
            return Err(SpawnRegionError::Unsatisfiable {
                radius: exclusion_radius,
            });
        }

        Ok(region)
    }

    /// Reports whether `position` lies strictly outside the exclusion circle.
    #[must_use]
    pub fn is_clear(&self, position: Position) -> bool {
        position.distance_squared(self.center) > self.exclusion_radius * self.exclusion_radius
    }

    /// Reports whether `position` lies inside the sampling box.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (self.min_x as f32..=self.max_x as f32).contains(&position.x())
            && (self.min_y as f32..=self.max_y as f32).contains(&position.y())
    }

    /// Draws a uniformly distributed lattice point that is clear of the tower.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Position {
        loop {
            let x = rng.gen_range(self.min_x..=self.max_x);
            let y = rng.gen_range(self.min_y..=self.max_y);
            let candidate = Position::new(x as f32, y as f32);
            if self.is_clear(candidate) {
                return candidate;
            }
        }
    }
}

/// Rounds `value` to the nearest lattice coordinate, refusing values outside `i32`.
fn lattice_bound(value: f32) -> Option<i32> {
    let rounded = value.round();
    (rounded.is_finite() && rounded >= i32::MIN as f32 && rounded < i32::MAX as f32)
        .then(|| rounded as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn samples_stay_in_the_box_and_clear_of_the_tower() {
        let center = Position::new(600.0, 600.0);
        let region = SpawnRegion::new(1200.0, 1200.0, 0.5, center, 400.0).expect("valid region");
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..2_000 {
            let point = region.sample(&mut rng);
            assert!(region.contains(point), "{point:?} outside the box");
            assert!(point.distance(center) > 400.0, "{point:?} too close");
        }
    }

    #[test]
    fn box_spans_half_a_screen_beyond_each_edge() {
        let region = SpawnRegion::new(1200.0, 800.0, 0.5, Position::new(600.0, 400.0), 10.0)
            .expect("valid region");

        assert!(region.contains(Position::new(-600.0, -400.0)));
        assert!(region.contains(Position::new(1800.0, 1200.0)));
        assert!(!region.contains(Position::new(-601.0, 0.0)));
    }

    #[test]
    fn exclusion_covering_everything_is_rejected() {
        let error = SpawnRegion::new(100.0, 100.0, 0.5, Position::new(50.0, 50.0), 500.0)
            .expect_err("box fits inside the circle");

        assert_eq!(error, SpawnRegionError::Unsatisfiable { radius: 500.0 });
    }

    #[test]
    fn degenerate_arena_is_rejected() {
        assert!(matches!(
            SpawnRegion::new(0.0, 100.0, 0.5, Position::ORIGIN, 1.0),
            Err(SpawnRegionError::InvalidArena { .. })
        ));
        assert!(matches!(
            SpawnRegion::new(100.0, 100.0, -1.0, Position::ORIGIN, 1.0),
            Err(SpawnRegionError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn arena_beyond_the_lattice_is_rejected() {
        let error = SpawnRegion::new(3.0e9, 100.0, 0.5, Position::ORIGIN, 1.0)
            .expect_err("box exceeds i32 coordinates");

        assert_eq!(
            error,
            SpawnRegionError::InvalidArena {
                width: 3.0e9,
                height: 100.0,
            }
        );
        assert_eq!(lattice_bound(-1.5e9), Some(-1_500_000_000));
        assert_eq!(lattice_bound(f32::MAX), None);
    }
}
