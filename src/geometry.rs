use std::ops::{Add, Mul, Neg, Sub};
use std::fmt;

use ordered_float::{FloatIsNaN, NotNaN};

/// Tolerance used when deciding whether a point lies beyond a border.
pub const BORDER_EPSILON: f64 = 1e-6;

/// Basic Point type for usage in the Voronoi lib.
///
/// Doubles as a vector: ray directions are points too.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64
}

impl Point {
    /// Create a new point. Returns Err(FloatIsNaN) if either parameter is NaN.
    pub fn new(x: f64, y: f64) -> Result<Point, FloatIsNaN> {
        let x = NotNaN::new(x)?;
        let y = NotNaN::new(y)?;

        Ok(Point { x: x.into_inner(), y: y.into_inner() })
    }

    /// Like new, but panics instead of return an Err.
    pub fn new_unwrap(x: f64, y: f64) -> Point {
        Point::new(x, y).expect("Points cannot have NaN values.")
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Round to the nearest integer site.
    pub fn round(self) -> Site {
        Site { x: self.x.round() as i32, y: self.y.round() as i32 }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// The vector rotated a quarter turn counter-clockwise.
    pub fn perpendicular(self) -> Point {
        Point { x: -self.y, y: self.x }
    }

    /// z of the cross product. Negative when `other` is turned clockwise
    /// from `self`.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Both coordinates within `tolerance` of the other point's.
    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point { x: -self.x, y: -self.y }
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, scalar: f64) -> Point {
        Point { x: self.x * scalar, y: self.y * scalar }
    }
}

impl From<Site> for Point {
    fn from(site: Site) -> Point {
        Point { x: f64::from(site.x), y: f64::from(site.y) }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Point {{ x: {}, y: {} }}", self.x, self.y)
    }
}

/// An input site, rounded to integer coordinates.
///
/// Two sites are the same site iff their coordinates are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Site {
    pub x: i32,
    pub y: i32
}

impl Site {
    pub fn new(x: i32, y: i32) -> Site {
        Site { x, y }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        (self.dx().powi(2) + self.dy().powi(2)).sqrt()
    }

    pub fn dx(&self) -> f64 {
        self.to.x - self.from.x
    }

    pub fn dy(&self) -> f64 {
        self.to.y - self.from.y
    }

    /// Whether either end of the segment is within `tolerance` of `point`.
    pub fn touches(&self, point: Point, tolerance: f64) -> bool {
        self.from.approx_eq(point, tolerance) || self.to.approx_eq(point, tolerance)
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &LineSegment) -> bool {
        (self.from == other.from && self.to == other.to)
        || (self.from == other.to && self.to == other.from)
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\{{({}, {}) -> ({}, {})}}", self.from.x, self.from.y, self.to.x, self.to.y)
    }
}

/// Which borders of a rectangle a point lies beyond.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Outcode {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool
}

impl Outcode {
    pub fn is_inside(&self) -> bool {
        !(self.above || self.below || self.left || self.right)
    }

    /// Both points are beyond the same border.
    pub fn shares_side(&self, other: Outcode) -> bool {
        (self.above && other.above)
        || (self.below && other.below)
        || (self.left && other.left)
        || (self.right && other.right)
    }
}

/// Axis aligned rectangle. `y` grows upwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point
}

impl Rect {
    /// The square `[0, size] x [0, size]`.
    pub fn square(size: f64) -> Rect {
        Rect { min: Point { x: 0.0, y: 0.0 }, max: Point { x: size, y: size } }
    }

    /// Shrink every side by `amount`. Negative amounts grow the rectangle.
    pub fn inset(&self, amount: f64) -> Rect {
        Rect {
            min: Point { x: self.min.x + amount, y: self.min.y + amount },
            max: Point { x: self.max.x - amount, y: self.max.y - amount }
        }
    }

    pub fn expand(&self, amount: f64) -> Rect {
        self.inset(-amount)
    }

    /// Inclusive containment.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
        && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Classify a point against each border. Points on a border are inside.
    pub fn outcode(&self, point: Point) -> Outcode {
        Outcode {
            above: point.y > self.max.y + BORDER_EPSILON,
            below: point.y < self.min.y - BORDER_EPSILON,
            left: point.x < self.min.x - BORDER_EPSILON,
            right: point.x > self.max.x + BORDER_EPSILON
        }
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.max(self.min.x).min(self.max.x),
            y: point.y.max(self.min.y).min(self.max.y)
        }
    }

    /// The point where the ray `origin + t * direction`, `t >= 0`, leaves the
    /// rectangle.
    ///
    /// The origin may lie outside. Returns None when the ray never passes
    /// through the rectangle or when the direction is zero.
    pub fn ray_exit(&self, origin: Point, direction: Point) -> Option<Point> {
        if !origin.is_finite() || !direction.is_finite() {
            return None;
        }

        let mut t_enter = 0f64;
        let mut t_exit = ::std::f64::INFINITY;

        let slabs = [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.y, direction.y, self.min.y, self.max.y)
        ];

        for &(start, delta, low, high) in slabs.iter() {
            if delta == 0.0 {
                if start < low - BORDER_EPSILON || start > high + BORDER_EPSILON {
                    return None;
                }
                continue;
            }

            let t_low = (low - start) / delta;
            let t_high = (high - start) / delta;
            let (near, far) = if t_low < t_high { (t_low, t_high) } else { (t_high, t_low) };

            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
        }

        if !t_exit.is_finite() || t_exit < t_enter {
            return None;
        }

        Some(self.clamp(origin + direction * t_exit))
    }
}
