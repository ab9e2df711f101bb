use crate::geometry::{LineSegment, Point, Rect};

/// Segments shorter than this after clipping are dropped.
pub const DEGENERATE_LENGTH: f64 = 1e-6;

/// Cut a segment down to the part inside `rect`.
///
/// Returns None when no part of the segment of positive length is inside.
/// Segments that are already inside come back unchanged.
pub fn clip(segment: LineSegment, rect: &Rect) -> Option<LineSegment> {
    let LineSegment { mut from, mut to } = segment;
    let from_code = rect.outcode(from);
    let to_code = rect.outcode(to);

    if from_code.shares_side(to_code) {
        return None;
    }

    if !from_code.is_inside() {
        from = border_towards(rect, to, from)?;
    }

    if !to_code.is_inside() {
        to = border_towards(rect, from, to)?;
    }

    if !rect.outcode(from).is_inside() || !rect.outcode(to).is_inside() {
        return None;
    }

    let clipped = LineSegment { from, to };
    if clipped.length() < DEGENERATE_LENGTH {
        return None;
    }

    Some(clipped)
}

/// Where the way from `from` to the outside point `to` leaves the rectangle,
/// if it gets there before reaching `to`.
fn border_towards(rect: &Rect, from: Point, to: Point) -> Option<Point> {
    let exit = rect.ray_exit(from, to - from)?;

    if exit.distance(from) > to.distance(from) + DEGENERATE_LENGTH {
        return None;
    }

    Some(exit)
}

#[cfg(test)]
mod test {
    use super::*;

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment { from: Point::new_unwrap(x1, y1), to: Point::new_unwrap(x2, y2) }
    }

    #[test]
    fn inside_is_unchanged() {
        let rect = Rect::square(100.0);
        let inside = segment(10.0, 20.0, 90.0, 100.0);

        assert_eq!(clip(inside, &rect), Some(inside));
        assert_eq!(clip(clip(inside, &rect).unwrap(), &rect), Some(inside));
    }

    #[test]
    fn beyond_the_same_side_is_dropped() {
        let rect = Rect::square(100.0);
        assert_eq!(clip(segment(-10.0, 0.0, -1.0, 100.0), &rect), None);
        assert_eq!(clip(segment(120.0, 150.0, 10.0, 101.0), &rect), None);
    }

    fn assert_close(actual: LineSegment, expected: LineSegment) {
        assert!(actual.from.approx_eq(expected.from, 1e-9), "{} != {}", actual, expected);
        assert!(actual.to.approx_eq(expected.to, 1e-9), "{} != {}", actual, expected);
    }

    #[test]
    fn one_end_outside() {
        let rect = Rect::square(100.0);
        let clipped = clip(segment(50.0, 40.0, 50.0, -190.0), &rect).unwrap();

        assert_close(clipped, segment(50.0, 40.0, 50.0, 0.0));
    }

    #[test]
    fn crossing_the_whole_rectangle() {
        let rect = Rect::square(100.0).inset(10.0);
        let clipped = clip(segment(50.0, 1000.0, 50.0, -100.0), &rect).unwrap();

        assert_close(clipped, segment(50.0, 90.0, 50.0, 10.0));
        assert_eq!(clip(clipped, &rect), Some(clipped));
    }

    #[test]
    fn crossing_corner_to_corner() {
        let rect = Rect::square(100.0);
        let clipped = clip(segment(-10.0, -10.0, 110.0, 110.0), &rect).unwrap();

        assert_close(clipped, segment(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn passing_by_a_corner_is_dropped() {
        let rect = Rect::square(100.0);
        assert_eq!(clip(segment(-10.0, 95.0, 10.0, 115.0), &rect), None);
    }

    #[test]
    fn points_are_dropped() {
        let rect = Rect::square(100.0);
        assert_eq!(clip(segment(50.0, 50.0, 50.0, 50.0), &rect), None);
    }
}
