extern crate sweepline_voronoi;

use sweepline_voronoi::{Config, LineSegment, Point, Site, Voronoi, VoronoiEdge};

fn point(x: f64, y: f64) -> Point {
    Point::new_unwrap(x, y)
}

fn run(sites: &[(f64, f64)], config: Config) -> Voronoi {
    let mut voronoi = Voronoi::new(sites.iter().map(|&(x, y)| point(x, y)), config).unwrap();
    assert!(voronoi.run().is_empty());
    assert!(voronoi.is_finished());
    voronoi
}

fn same_segment(a: &LineSegment, b: &LineSegment) -> bool {
    (a.from.approx_eq(b.from, 1e-6) && a.to.approx_eq(b.to, 1e-6))
    || (a.from.approx_eq(b.to, 1e-6) && a.to.approx_eq(b.from, 1e-6))
}

/// Every expected segment is found exactly once, and nothing else is there.
fn assert_segments(edges: &[VoronoiEdge], expected: &[((f64, f64), (f64, f64))]) {
    assert_eq!(edges.len(), expected.len(), "got {:?}", edges);

    for &((x1, y1), (x2, y2)) in expected {
        let wanted = LineSegment { from: point(x1, y1), to: point(x2, y2) };
        let found = edges.iter().filter(|edge| same_segment(&edge.segment, &wanted)).count();
        assert_eq!(found, 1, "{} in {:?}", wanted, edges);
    }
}

fn assert_pairs_unique(edges: &[VoronoiEdge]) {
    let mut pairs: Vec<(Site, Site)> = edges.iter().map(|edge| {
        let (a, b) = edge.sites;
        if a < b { (a, b) } else { (b, a) }
    }).collect();
    let count = pairs.len();

    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), count);
}

#[test]
fn two_sites_on_one_sweepline() {
    let voronoi = run(&[(10.0, 90.0), (90.0, 90.0)], Config::new(100, 0));
    let edges = voronoi.edges();

    assert_segments(&edges, &[((50.0, 100.0), (50.0, 0.0))]);
    assert_eq!(edges[0].sites, (Site::new(90, 90), Site::new(10, 90)));
    assert_eq!(voronoi.stats().horizontal_splits, 1);
}

#[test]
fn two_sites_on_one_sweepline_with_margin() {
    let voronoi = run(&[(10.0, 90.0), (90.0, 90.0)], Config::new(100, 10));
    assert_segments(&voronoi.edges(), &[((50.0, 90.0), (50.0, 10.0))]);
}

#[test]
fn three_sites_meet_in_one_vertex() {
    let voronoi = run(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)], Config::default());
    let edges = voronoi.edges();

    assert_segments(&edges, &[
        ((0.0, 65.0), (50.0, 40.0)),
        ((50.0, 40.0), (100.0, 65.0)),
        ((50.0, 40.0), (50.0, 0.0))
    ]);
    assert_pairs_unique(&edges);

    let vertex = point(50.0, 40.0);
    assert!(edges.iter().all(|edge| edge.segment.touches(vertex, 1e-6)));
    assert_eq!(voronoi.stats().circle_events, 1);
}

#[test]
fn one_site_has_no_edges() {
    let voronoi = run(&[(42.0, 17.0)], Config::default());

    assert!(voronoi.edges().is_empty());
    assert!(voronoi.completed_edges().is_empty());
    assert_eq!(voronoi.arc_count(), 1);
}

#[test]
fn one_site_finishes_in_two_steps() {
    let mut voronoi = Voronoi::new(vec![point(42.0, 17.0)], Config::default()).unwrap();

    voronoi.step().unwrap();
    assert!(!voronoi.is_finished());
    voronoi.step().unwrap();
    assert!(voronoi.is_finished());
}

#[test]
fn four_cocircular_sites() {
    let voronoi = run(&[(10.0, 10.0), (90.0, 10.0), (10.0, 90.0), (90.0, 90.0)], Config::default());
    let edges = voronoi.edges();

    assert_segments(&edges, &[
        ((50.0, 100.0), (50.0, 50.0)),
        ((50.0, 50.0), (50.0, 0.0)),
        ((0.0, 50.0), (50.0, 50.0)),
        ((50.0, 50.0), (100.0, 50.0))
    ]);
    assert_pairs_unique(&edges);

    // The bisector squeezed to a point between the two tied circle events is dropped.
    assert_eq!(voronoi.stats().circle_events, 2);
    assert_eq!(voronoi.completed_edges().len(), 6);
}

#[test]
fn rounded_duplicates_do_not_change_the_diagram() {
    let plain = run(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)], Config::default());
    let noisy = run(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0), (9.6, 10.4), (50.2, 89.9)], Config::default());

    assert_eq!(noisy.site_count(), 3);
    assert_eq!(noisy.edges(), plain.edges());
}

#[test]
fn sites_outside_the_map_still_cut_through_it() {
    let voronoi = run(&[(-50.0, 50.0), (150.0, 50.0)], Config::default());
    assert_segments(&voronoi.edges(), &[((50.0, 100.0), (50.0, 0.0))]);
}

#[test]
fn rotated_square() {
    let voronoi = run(&[(50.0, 90.0), (10.0, 50.0), (90.0, 50.0), (50.0, 10.0)], Config::default());
    let edges = voronoi.edges();

    assert_segments(&edges, &[
        ((0.0, 100.0), (50.0, 50.0)),
        ((100.0, 100.0), (50.0, 50.0)),
        ((50.0, 50.0), (100.0, 0.0)),
        ((50.0, 50.0), (0.0, 0.0))
    ]);
    assert_pairs_unique(&edges);
}

#[test]
fn cocircular_trapezoid() {
    let voronoi = run(&[(30.0, 0.0), (10.0, 10.0), (10.0, 40.0), (30.0, 50.0)], Config::default());
    let edges = voronoi.edges();

    assert_segments(&edges, &[
        ((0.0, 85.0), (30.0, 25.0)),
        ((0.0, 25.0), (30.0, 25.0)),
        ((30.0, 25.0), (17.5, 0.0)),
        ((30.0, 25.0), (100.0, 25.0))
    ]);
    assert_pairs_unique(&edges);
}
