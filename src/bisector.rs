use tracing::warn;

use crate::geometry::{Point, Site};
use crate::voronoi_tree::EdgeId;

/// Origins closer than this on both axes count as the same point.
const COINCIDENT_ORIGINS: f64 = 0.01;

/// A ray on the perpendicular bisector of two sites.
///
/// Traced by the breakpoint between the arcs of its two sites while the
/// sweepline moves down. Splitting an arc creates two of these from the same
/// origin, heading in opposite directions; they are each other's complement.
#[derive(Debug, Clone, PartialEq)]
pub struct Bisector {
    pub first_site: Site,
    pub second_site: Site,
    pub origin: Point,
    pub direction: Point,
    /// Set once the edge stops growing.
    pub end: Option<Point>,
    pub complement: Option<EdgeId>
}

/// Which root of the breakpoint equation was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Root {
    /// Exactly one root lies on the ray.
    Forward(f64),
    /// Both roots lie ahead of the origin; the larger is used.
    Ambiguous(f64, f64),
    /// Neither root lies on the ray.
    Behind(f64, f64)
}

impl Root {
    /// Pick the root that lies on the forward ray.
    pub fn select(e1: f64, e2: f64) -> Root {
        if e1 >= 0.0 && e2 <= 0.0 {
            Root::Forward(e1)
        } else if e2 >= 0.0 && e1 <= 0.0 {
            Root::Forward(e2)
        } else if e1 > 0.0 && e2 > 0.0 {
            Root::Ambiguous(e1, e2)
        } else {
            Root::Behind(e1, e2)
        }
    }

    /// Ray parameter to use. Ambiguity prefers the larger root, no root at
    /// all falls back to the origin.
    pub fn parameter(&self) -> f64 {
        match *self {
            Root::Forward(e) => e,
            Root::Ambiguous(e1, e2) => e1.max(e2),
            Root::Behind(..) => 0.0
        }
    }
}

impl Bisector {
    /// Bisector between two sites with the direction derived from them: the
    /// vector from `first` to `second` turned a quarter counter-clockwise.
    pub fn new(first_site: Site, second_site: Site, origin: Point) -> Bisector {
        let direction = (Point::from(second_site) - Point::from(first_site)).perpendicular();
        Bisector::with_direction(first_site, second_site, origin, direction)
    }

    pub fn with_direction(first_site: Site, second_site: Site, origin: Point, direction: Point) -> Bisector {
        Bisector { first_site, second_site, origin, direction, end: None, complement: None }
    }

    pub fn sites(&self) -> (Site, Site) {
        (self.first_site, self.second_site)
    }

    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// The breakpoint this edge traces when the sweepline is at `sweep`.
    ///
    /// That is the point on the ray with equal distance to the sites and to
    /// the sweepline.
    pub fn position_at(&self, sweep: f64) -> Point {
        let t = if self.direction.x == 0.0 {
            self.vertical_parameter(sweep)
        } else {
            self.quadratic_parameter(sweep)
        };

        self.point_at(t)
    }

    /// `x` of `position_at`.
    pub fn x_at(&self, sweep: f64) -> f64 {
        self.position_at(sweep).x
    }

    fn vertical_parameter(&self, sweep: f64) -> f64 {
        // x stays put, so the distance condition is linear in the parameter.
        let focus = if f64::from(self.first_site.y) != sweep {
            Point::from(self.first_site)
        } else if f64::from(self.second_site.y) != sweep {
            Point::from(self.second_site)
        } else {
            return 0.0;
        };

        let Point { x: sx, y: sy } = self.origin;
        let numerator = (focus.x - sx).powi(2) + (focus.y - sy).powi(2) - (sweep - sy).powi(2);
        numerator / (2f64 * self.direction.y * (focus.y - sweep))
    }

    fn quadratic_parameter(&self, sweep: f64) -> f64 {
        // origin + e * direction has the same distance to the focus as to the
        // sweepline:
        //
        // (sx + e*dx - fx)^2 + (sy + e*dy - fy)^2 = (sy + e*dy - l)^2
        //
        // Expanded this is a*e^2 + b*e + c = 0 with the factors below.
        let Point { x: dx, y: dy } = self.direction;
        let Point { x: sx, y: sy } = self.origin;

        let factors = |focus: Site| {
            let focus = Point::from(focus);
            let b = 2f64 * (dx * (sx - focus.x) + dy * (sweep - focus.y));
            let c = (focus.x - sx).powi(2) + (focus.y - sy).powi(2) - (sweep - sy).powi(2);
            (b, c)
        };

        let a = dx * dx;
        let (mut b, mut c) = factors(self.first_site);
        if 4f64 * a * c > b * b {
            let (second_b, second_c) = factors(self.second_site);
            b = second_b;
            c = second_c;
        }

        let mut discriminant = b * b - 4f64 * a * c;
        if discriminant < 0.0 {
            warn!(discriminant = discriminant, "breakpoint equation of {} {} has no real root, using its vertex",
                self.first_site, self.second_site);
            discriminant = 0.0;
        }

        let root = discriminant.sqrt();
        let e1 = (-b + root) / (2f64 * a);
        let e2 = (-b - root) / (2f64 * a);

        let selected = Root::select(e1, e2);
        match selected {
            Root::Forward(..) => {}
            Root::Ambiguous(..) | Root::Behind(..) => {
                warn!(e1 = e1, e2 = e2, sweep = sweep, "unexpected roots for the breakpoint of {} {}",
                    self.first_site, self.second_site);
            }
        }

        selected.parameter()
    }

    /// Where this ray meets `right`, as the parameters along both rays.
    ///
    /// `self` is the bisector left of an arc and `right` the one to its right.
    /// None when the rays are parallel or meet behind either origin.
    pub fn intersection(&self, right: &Bisector) -> Option<(f64, f64)> {
        let left = self;

        if left.direction.x == 0.0 && right.direction.x == 0.0 {
            return None;
        }

        let (m_left, m_right) = if right.direction.x == 0.0 {
            let m_left = (right.origin.x - left.origin.x) / left.direction.x;
            let m_right = (left.origin.y + m_left * left.direction.y - right.origin.y) / right.direction.y;
            (m_left, m_right)
        } else if left.direction.y / left.direction.x == right.direction.y / right.direction.x {
            // Parallel bisectors never converge.
            return None;
        } else {
            let slope = right.direction.y / right.direction.x;
            let m_left = ((left.origin.x - right.origin.x) * slope + right.origin.y - left.origin.y)
                / (left.direction.y - slope * left.direction.x);
            let m_right = (left.origin.x + m_left * left.direction.x - right.origin.x) / right.direction.x;
            (m_left, m_right)
        };

        if !m_left.is_finite() || !m_right.is_finite() || m_left < 0.0 || m_right < 0.0 {
            return None;
        }

        Some((m_left, m_right))
    }

    /// Both rays start at (nearly) the same point.
    pub fn shares_origin(&self, other: &Bisector) -> bool {
        self.origin.approx_eq(other.origin, COINCIDENT_ORIGINS)
    }
}
