//! Voronoi diagrams of integer sites via Fortune's sweepline algorithm.
//!
//! A sweepline moves down over the sites. Above it, the beachline of
//! parabolic arcs separates the part of the plane whose diagram is already
//! known from the rest. Site events split arcs, circle events squeeze them
//! out and produce the vertexes of the diagram. Edges left open at the end
//! are extended to the border and everything is cut down to the map.
//!
//! https://en.wikipedia.org/wiki/Fortune%27s_algorithm

extern crate itertools;
extern crate ordered_float;

mod bisector;
mod clip;
mod config;
mod error;
mod event_queue;
mod fortune;
mod geometry;
mod parabola;
mod voronoi_tree;

pub use ordered_float::{FloatIsNaN, NotNaN};

pub use crate::bisector::{Bisector, Root};
pub use crate::clip::clip;
pub use crate::config::Config;
pub use crate::error::VoronoiError;
pub use crate::event_queue::{Event, EventId, EventQueue};
pub use crate::fortune::{SweepStats, Voronoi, VoronoiEdge};
pub use crate::geometry::{LineSegment, Outcode, Point, Rect, Site};
pub use crate::parabola::FocusDirectrixParabola;
pub use crate::voronoi_tree::{Beachline, EdgeId, NodeId};

/// Translate a list of coordinates into the edges of their Voronoi diagram.
///
/// Fails on invalid input, or on the first fault hit while sweeping.
pub fn fortune(sites: &[Point], config: Config) -> Result<Vec<VoronoiEdge>, VoronoiError> {
    let mut voronoi = Voronoi::new(sites.iter().cloned(), config)?;

    if let Some(fault) = voronoi.run().first() {
        return Err(fault.clone());
    }

    Ok(voronoi.edges())
}
