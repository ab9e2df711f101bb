use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;

use tracing::{debug, error, warn};

use crate::clip::clip;
use crate::config::Config;
use crate::error::VoronoiError;
use crate::event_queue::{Event, EventId, EventQueue};
use crate::geometry::{LineSegment, Point, Site};
use crate::parabola::FocusDirectrixParabola;
use crate::voronoi_tree::{Beachline, EdgeId, NodeId};

/// Circle events this far above the sweepline still count as not in the past.
const SWEEP_TOLERANCE: f64 = 1e-6;

/// An edge of the finished diagram: a piece of the bisector of two sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
    pub sites: (Site, Site),
    pub segment: LineSegment
}

impl fmt::Display for VoronoiEdge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} | {}: {}", self.sites.0, self.sites.1, self.segment)
    }
}

/// Counts of the changes made to the beachline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Arcs started on an empty beachline.
    pub roots: usize,
    /// Arcs split in two by a site on the same sweepline as their focus.
    pub horizontal_splits: usize,
    /// Arcs split in three by a site below their focus.
    pub splits: usize,
    pub circle_events: usize
}

impl SweepStats {
    /// Arcs the beachline should hold after these changes.
    pub fn expected_arcs(&self) -> usize {
        (self.roots + self.horizontal_splits + 2 * self.splits).saturating_sub(self.circle_events)
    }

    /// Sites that made it onto the beachline.
    pub fn sites_added(&self) -> usize {
        self.roots + self.horizontal_splits + self.splits
    }
}

#[derive(Debug, Clone, Copy)]
struct CompletedEdge {
    edge: EdgeId,
    segment: LineSegment
}

/// Fortune's Algorithm, one event at a time.
///
/// ```text
/// let mut voronoi = Voronoi::new(sites, Config::default())?;
/// while !voronoi.is_finished() {
///     voronoi.step()?;
/// }
/// ```
#[derive(Debug)]
pub struct Voronoi {
    config: Config,
    events: EventQueue,
    beachline: Beachline,
    completed: Vec<CompletedEdge>,
    finished: bool,
    site_count: usize,
    sites_left: usize,
    stats: SweepStats,
    faults: Vec<VoronoiError>
}

impl Voronoi {
    /// Queue up the sites.
    ///
    /// Sites are rounded to integer coordinates. Sites that round to the same
    /// coordinates are merged, keeping the first.
    pub fn new<I>(sites: I, config: Config) -> Result<Voronoi, VoronoiError>
    where
        I: IntoIterator<Item = Point>
    {
        config.validate()?;

        let mut events = EventQueue::new();
        let mut seen = HashSet::new();

        for (index, point) in sites.into_iter().enumerate() {
            if !point.is_finite() {
                return Err(VoronoiError::NonFiniteSite { index });
            }

            let site = point.round();
            if !seen.insert(site) {
                warn!(index = index, "site {} rounds onto {}, which is already a site", point, site);
                continue;
            }

            events.insert(Event::Site(site))?;
        }

        let site_count = seen.len();

        Ok(Voronoi {
            config,
            events,
            beachline: Beachline::new(),
            completed: vec![],
            finished: false,
            site_count,
            sites_left: site_count,
            stats: SweepStats::default(),
            faults: vec![]
        })
    }

    /// Handle the next event, or finish the diagram if there are none left.
    ///
    /// Does nothing once finished. An error aborts only the event that
    /// caused it; it is also kept in `faults` and stepping can go on.
    pub fn step(&mut self) -> Result<(), VoronoiError> {
        if self.finished {
            return Ok(());
        }

        let result = match self.events.pop() {
            Some((id, event)) => {
                debug!("handling {:?}, {} events left", event, self.events.len());
                self.handle(id, event)
            },
            None => self.finish()
        };

        if let Err(ref fault) = result {
            error!("step aborted: {}", fault);
            self.faults.push(fault.clone());
        }

        result
    }

    /// Step until finished. Faults along the way are collected, not returned.
    pub fn run(&mut self) -> &[VoronoiError] {
        while !self.finished {
            let _ = self.step();
        }

        &self.faults
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of distinct sites.
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// Sites not yet on the beachline.
    pub fn sites_left(&self) -> usize {
        self.sites_left
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    pub fn faults(&self) -> &[VoronoiError] {
        &self.faults
    }

    pub fn beachline(&self) -> &Beachline {
        &self.beachline
    }

    /// Arcs currently on the beachline.
    pub fn arc_count(&self) -> usize {
        self.beachline.arcs().map(|arcs| arcs.len()).unwrap_or(0)
    }

    /// Every completed bisector on its own, a bisector and its complement
    /// being two entries. Clipped once finished.
    pub fn completed_edges(&self) -> Vec<VoronoiEdge> {
        self.completed.iter().map(|completed| VoronoiEdge {
            sites: self.beachline.edge(completed.edge).sites(),
            segment: completed.segment
        }).collect()
    }

    /// The edges of the diagram.
    ///
    /// A bisector whose complement survived is joined with it into a single
    /// edge running from the end of the complement to its own end.
    pub fn edges(&self) -> Vec<VoronoiEdge> {
        let positions: HashMap<EdgeId, usize> = self.completed.iter()
            .enumerate()
            .map(|(position, completed)| (completed.edge, position))
            .collect();

        let mut edges = vec![];

        for (position, completed) in self.completed.iter().enumerate() {
            let bisector = self.beachline.edge(completed.edge);
            let complement = bisector.complement.and_then(|complement| positions.get(&complement).cloned());

            let segment = match complement {
                Some(other) if other < position => continue,
                Some(other) => LineSegment { from: self.completed[other].segment.to, to: completed.segment.to },
                None => completed.segment
            };

            edges.push(VoronoiEdge { sites: bisector.sites(), segment });
        }

        edges
    }

    fn handle(&mut self, id: EventId, event: Event) -> Result<(), VoronoiError> {
        match event {
            Event::Site(site) => {
                self.add_parabola(site)?;

                // Sites on the same sweepline go in together.
                loop {
                    let next = match self.events.peek() {
                        Some((_, &Event::Site(next))) if next.y == site.y => next,
                        _ => break
                    };

                    self.events.pop();
                    self.add_parabola(next)?;
                }

                Ok(())
            },
            Event::Circle { vertex, arc, sweep } => self.remove_parabola(id, arc, vertex, sweep)
        }
    }

    fn add_parabola(&mut self, site: Site) -> Result<(), VoronoiError> {
        self.sites_left = self.sites_left.saturating_sub(1);

        if self.beachline.is_empty() {
            self.beachline.insert_root(site)?;
            self.stats.roots += 1;
            return Ok(());
        }

        let sweep = f64::from(site.y);
        let above = self.beachline.locate(f64::from(site.x), sweep)?;
        let focus = self.beachline.arc(above)?.focus;

        let parabola = match FocusDirectrixParabola::new(focus, sweep) {
            Some(parabola) => parabola,
            None => return self.add_parabola_beside(above, focus, site)
        };

        let origin = Point::new(f64::from(site.x), parabola.y_at(f64::from(site.x)))?;
        let split = self.beachline.split(above, site, origin)?;
        self.stats.splits += 1;

        if let Some(invalid) = split.invalid_event {
            self.events.remove(invalid);
        }

        self.check_circle_event(split.left_arc, sweep)?;
        self.check_circle_event(split.right_arc, sweep)
    }

    /// Split the arc of a focus on the same sweepline as the site.
    ///
    /// Their bisector is vertical and comes down from far above the map.
    fn add_parabola_beside(&mut self, above: NodeId, focus: Site, site: Site) -> Result<(), VoronoiError> {
        if self.stats.splits + self.stats.circle_events > 0 {
            warn!("site {} lies on the sweepline of the focus {} above it", site, focus);
        }

        let mid_x = (f64::from(focus.x) + f64::from(site.x)) / 2f64;
        let origin = Point::new(mid_x, self.config.sentinel_y())?;
        let (_, _, invalid) = self.beachline.split_horizontal(above, site, origin)?;
        self.stats.horizontal_splits += 1;

        if let Some(invalid) = invalid {
            self.events.remove(invalid);
        }

        Ok(())
    }

    fn remove_parabola(&mut self, id: EventId, arc: NodeId, vertex: Point, sweep: f64) -> Result<(), VoronoiError> {
        let owner = self.beachline.arc(arc).ok().and_then(|arc| arc.circle_event);
        if owner != Some(id) {
            return Err(VoronoiError::StaleCircleEvent(id));
        }

        let removal = self.beachline.remove_arc(arc, vertex)?;
        self.stats.circle_events += 1;

        for &edge in removal.finished.iter() {
            let origin = self.beachline.edge(edge).origin;
            self.completed.push(CompletedEdge { edge, segment: LineSegment { from: origin, to: vertex } });
        }

        self.check_circle_event(removal.left_arc, sweep)?;
        self.check_circle_event(removal.right_arc, sweep)
    }

    /// Schedule the point where the arc gets squeezed out between its
    /// neighbours, if they ever squeeze it out.
    fn check_circle_event(&mut self, arc: NodeId, sweep: f64) -> Result<(), VoronoiError> {
        if let Some(old) = self.beachline.arc_mut(arc)?.circle_event.take() {
            self.events.remove(old);
        }

        let neighbors = self.beachline.neighbors(arc)?;
        let (left_edge, left_arc, right_edge, right_arc) = match (
            neighbors.left_edge, neighbors.left_arc, neighbors.right_edge, neighbors.right_arc
        ) {
            (Some(le), Some(la), Some(re), Some(ra)) => (le, la, re, ra),
            _ => return Ok(())
        };

        if self.beachline.arc(left_arc)?.focus == self.beachline.arc(right_arc)?.focus {
            return Ok(());
        }

        let left = self.beachline.edge(self.beachline.breakpoint(left_edge)?.edge);
        let right = self.beachline.edge(self.beachline.breakpoint(right_edge)?.edge);

        // Rays leaving one point only close the arc between them when the
        // right one is turned clockwise from the left one. The arc has no
        // width then and goes at once.
        let vertex = if left.shares_origin(right) {
            if left.direction.cross(right.direction) >= 0.0 {
                return Ok(());
            }
            left.origin
        } else {
            match left.intersection(right) {
                Some((along_left, _)) => left.point_at(along_left),
                None => return Ok(())
            }
        };

        let focus = Point::from(self.beachline.arc(arc)?.focus);
        let circle_bottom = vertex.y - vertex.distance(focus);
        if circle_bottom > sweep + SWEEP_TOLERANCE {
            return Ok(());
        }

        let id = self.events.insert(Event::Circle { vertex, arc, sweep: circle_bottom })?;
        self.beachline.arc_mut(arc)?.circle_event = Some(id);
        Ok(())
    }

    /// Give the bisectors still on the beachline an end, then cut every
    /// completed edge to the clip area.
    fn finish(&mut self) -> Result<(), VoronoiError> {
        self.finished = true;

        let working = self.config.working_area();
        let extension = self.config.extension_area();

        for edge in self.beachline.remaining_edges()? {
            let (origin, direction) = {
                let bisector = self.beachline.edge(edge);
                (bisector.origin, bisector.direction)
            };

            let crosses = working.contains(origin) || working.ray_exit(origin, direction).is_some();
            match extension.ray_exit(origin, direction) {
                Some(end) if crosses => {
                    self.beachline.edge_mut(edge).end = Some(end);
                    self.completed.push(CompletedEdge { edge, segment: LineSegment { from: origin, to: end } });
                },
                _ => self.beachline.sever_complement(edge)
            }
        }

        let clip_area = self.config.clip_area();
        for mut completed in mem::replace(&mut self.completed, vec![]) {
            match clip(completed.segment, &clip_area) {
                Some(segment) => {
                    completed.segment = segment;
                    self.completed.push(completed);
                },
                None => self.beachline.sever_complement(completed.edge)
            }
        }

        debug!("finished with {} completed edges", self.completed.len());
        Ok(())
    }
}

impl fmt::Display for Voronoi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Voronoi{{\n    {}\n}}", itertools::join(self.edges().iter(), ",\n    "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn points(coordinates: &[(f64, f64)]) -> Vec<Point> {
        coordinates.iter().map(|&(x, y)| Point::new_unwrap(x, y)).collect()
    }

    fn finished(coordinates: &[(f64, f64)]) -> Voronoi {
        let mut voronoi = Voronoi::new(points(coordinates), Config::default()).unwrap();
        assert!(voronoi.run().is_empty());
        voronoi
    }

    const INPUTS: &[&[(f64, f64)]] = &[
        &[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)],
        &[(10.0, 10.0), (90.0, 10.0), (10.0, 90.0), (90.0, 90.0)],
        &[(50.0, 90.0), (10.0, 50.0), (90.0, 50.0), (50.0, 10.0)],
        &[(20.0, 90.0), (50.0, 90.0), (80.0, 90.0), (35.0, 40.0), (65.0, 20.0)],
        &[(13.0, 71.0), (42.0, 17.0), (77.0, 58.0), (61.0, 88.0), (25.0, 33.0), (88.0, 12.0), (50.0, 50.0)]
    ];

    #[test]
    fn complements_mirror_each_other() {
        for input in INPUTS {
            let voronoi = finished(input);

            for (id, bisector) in voronoi.beachline().edges() {
                if let Some(complement) = bisector.complement {
                    let other = voronoi.beachline().edge(complement);
                    assert_eq!(other.complement, Some(id));
                    assert_eq!(other.sites(), (bisector.second_site, bisector.first_site));
                    assert_eq!(other.origin, bisector.origin);
                }
            }
        }
    }

    #[test]
    fn arcs_are_accounted_for() {
        for input in INPUTS {
            let voronoi = finished(input);
            let stats = voronoi.stats();

            assert_eq!(stats.sites_added(), voronoi.site_count());
            assert_eq!(voronoi.arc_count(), stats.expected_arcs());
        }
    }

    #[test]
    fn completed_edges_have_two_sites() {
        for input in INPUTS {
            for edge in finished(input).completed_edges() {
                assert_ne!(edge.sites.0, edge.sites.1);
            }
        }
    }

    #[test]
    fn bookkeeping_while_stepping() {
        let mut voronoi = Voronoi::new(points(&[(50.0, 90.0), (10.0, 10.0), (90.0, 10.0)]), Config::default()).unwrap();
        assert_eq!(voronoi.site_count(), 3);
        assert_eq!(voronoi.sites_left(), 3);
        assert_eq!(voronoi.pending_events(), 3);

        voronoi.step().unwrap();
        assert_eq!(voronoi.sites_left(), 2);
        assert_eq!(voronoi.arc_count(), 1);

        // Both lower sites share a sweepline and go in together.
        voronoi.step().unwrap();
        assert_eq!(voronoi.sites_left(), 0);
        assert_eq!(voronoi.arc_count(), 5);
        assert_eq!(voronoi.pending_events(), 1);

        voronoi.step().unwrap();
        assert_eq!(voronoi.arc_count(), 4);
        assert!(!voronoi.is_finished());

        voronoi.step().unwrap();
        assert!(voronoi.is_finished());
        assert_eq!(voronoi.edges().len(), 3);
        assert_eq!(voronoi.completed_edges().len(), 5);
    }

    #[test]
    fn duplicate_sites_are_merged() {
        let voronoi = Voronoi::new(points(&[(10.2, 10.0), (10.0, 10.4), (60.0, 60.0)]), Config::default()).unwrap();
        assert_eq!(voronoi.site_count(), 2);
    }

    #[test]
    fn non_finite_sites_are_rejected() {
        let sites = vec![Point::new_unwrap(1.0, 2.0), Point { x: ::std::f64::INFINITY, y: 0.0 }];
        assert_eq!(
            Voronoi::new(sites, Config::default()).unwrap_err(),
            VoronoiError::NonFiniteSite { index: 1 }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Voronoi::new(points(&[(1.0, 1.0)]), Config::new(10, 5)).is_err());
    }

    #[test]
    fn stale_circle_event_is_a_contained_fault() {
        let mut voronoi = Voronoi::new(points(&[(50.0, 50.0)]), Config::default()).unwrap();
        let stale = voronoi.events.insert(Event::Circle {
            vertex: Point::new_unwrap(50.0, 150.0),
            arc: NodeId::new(7),
            sweep: 100.0
        }).unwrap();

        assert_eq!(voronoi.step(), Err(VoronoiError::StaleCircleEvent(stale)));
        assert_eq!(voronoi.faults(), &[VoronoiError::StaleCircleEvent(stale)][..]);

        assert_eq!(voronoi.run().len(), 1);
        assert!(voronoi.is_finished());
        assert!(voronoi.edges().is_empty());
    }

    #[test]
    fn stepping_after_the_end_does_nothing() {
        let mut voronoi = finished(&[(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)]);
        let edges = voronoi.edges();

        voronoi.step().unwrap();
        assert_eq!(voronoi.edges(), edges);
    }

    #[test]
    fn display_lists_the_edges() {
        let voronoi = finished(&[(10.0, 90.0), (90.0, 90.0)]);
        let shown = voronoi.to_string();

        assert!(shown.starts_with("Voronoi{"));
        assert!(shown.contains("(90, 90) | (10, 90)"));
    }
}
