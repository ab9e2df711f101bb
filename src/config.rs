use crate::error::VoronoiError;
use crate::geometry::Rect;

/// Where the diagram is computed and how it gets cut.
///
/// The diagram is computed for the square `[0, map_size]²`. Afterwards every
/// edge is cut `margin` units inside each border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub map_size: i32,
    pub margin: i32,
    /// Height of seeded bisectors above the map, in multiples of `map_size`.
    pub sentinel_factor: f64
}

impl Config {
    pub fn new(map_size: i32, margin: i32) -> Config {
        Config { map_size, margin, ..Config::default() }
    }

    pub fn with_sentinel_factor(mut self, sentinel_factor: f64) -> Config {
        self.sentinel_factor = sentinel_factor;
        self
    }

    pub fn validate(&self) -> Result<(), VoronoiError> {
        if self.map_size <= 0 || self.margin < 0 || 2 * i64::from(self.margin) >= i64::from(self.map_size) {
            return Err(VoronoiError::InvalidBounds { map_size: self.map_size, margin: self.margin });
        }

        if !(self.sentinel_factor >= 1.0) || !self.sentinel_factor.is_finite() {
            return Err(VoronoiError::InvalidSentinel(self.sentinel_factor));
        }

        Ok(())
    }

    /// The square the diagram is computed in.
    pub fn working_area(&self) -> Rect {
        Rect::square(f64::from(self.map_size))
    }

    /// The working area minus the margin. Output edges lie inside it.
    pub fn clip_area(&self) -> Rect {
        self.working_area().inset(f64::from(self.margin))
    }

    /// Unfinished edges are extended until they leave this.
    pub fn extension_area(&self) -> Rect {
        self.working_area().expand(f64::from(self.map_size))
    }

    /// Height of the shared origin of bisectors between sites that start
    /// on the same sweepline.
    pub fn sentinel_y(&self) -> f64 {
        self.sentinel_factor * f64::from(self.map_size)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config { map_size: 100, margin: 0, sentinel_factor: 10.0 }
    }
}
