use crate::geometry::{Point, Site};

/// A parabola described as a focus and a directrix.
///
/// The parabola is the set of points where the distance between the focus
/// and the directrix are the same. Arcs on the beachline are pieces of these,
/// with the sweepline as directrix.
///
/// The focus cannot lie on the directrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusDirectrixParabola {
    focus: Point,
    /// y = directrix
    directrix: f64
}

impl FocusDirectrixParabola {
    /// Create a new parabola with the specified focus and directrix.
    ///
    /// Returns None if the directrix equals the focus's "y" value. The
    /// parabola would be degenerate: a vertical ray up from the focus.
    pub fn new(focus: Site, directrix: f64) -> Option<FocusDirectrixParabola> {
        let focus = Point::from(focus);

        if focus.y == directrix {
            return None;
        }

        Some(FocusDirectrixParabola { focus, directrix })
    }

    /// The `y` of the parabola above the given `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        // Let (x, y) be some point on the parabola. Its distance to the focus
        // equals its distance to the directrix:
        //
        // (y - d)^2 = (x - fx)^2 + (y - fy)^2
        // y^2 - 2*y*d + d^2 = (x - fx)^2 + y^2 - 2*y*fy + fy^2
        // 2*y*(fy - d) = (x - fx)^2 + fy^2 - d^2
        //
        // When a site arrives, d is the site's own y and x its x, so this is
        // also the height where the new arc first touches this one.
        let Point { x: fx, y: fy } = self.focus;
        let d = self.directrix;

        ((fx - x).powi(2) + fy.powi(2) - d.powi(2)) / (2f64 * (fy - d))
    }

    /// Distance from a point to the focus minus its distance to the directrix.
    ///
    /// Zero on the parabola.
    pub fn excess(&self, point: Point) -> f64 {
        point.distance(self.focus) - (point.y - self.directrix).abs()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn degenerate_parabola() {
        assert!(FocusDirectrixParabola::new(Site::new(3, 7), 7.0).is_none());
    }

    #[test]
    fn vertex_is_halfway_to_directrix() {
        let parabola = FocusDirectrixParabola::new(Site::new(50, 90), 10.0).unwrap();
        assert_eq!(parabola.y_at(50.0), 50.0);
    }

    #[test]
    fn height_above_new_site() {
        let parabola = FocusDirectrixParabola::new(Site::new(50, 90), 10.0).unwrap();
        assert_eq!(parabola.y_at(10.0), 60.0);
        assert_eq!(parabola.y_at(90.0), 60.0);
    }

    #[test]
    fn points_lie_on_the_parabola() {
        let parabola = FocusDirectrixParabola::new(Site::new(-4, 12), -3.0).unwrap();

        for &x in [-40.0, -4.0, 0.5, 17.0].iter() {
            let point = Point { x, y: parabola.y_at(x) };
            assert!(parabola.excess(point).abs() < 1e-9);
        }
    }
}
