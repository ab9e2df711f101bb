use ordered_float::FloatIsNaN;
use thiserror::Error;

use crate::event_queue::EventId;
use crate::voronoi_tree::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },

    #[error("a coordinate evaluated to NaN")]
    NotANumber,

    #[error("map size {map_size} with margin {margin} leaves no working area")]
    InvalidBounds { map_size: i32, margin: i32 },

    #[error("sentinel factor {0} must be at least 1")]
    InvalidSentinel(f64),

    #[error("beachline node {0:?} does not exist")]
    MissingNode(NodeId),

    #[error("beachline node {0:?} is not an arc")]
    NotAnArc(NodeId),

    #[error("beachline node {0:?} is not a breakpoint")]
    NotABreakpoint(NodeId),

    #[error("beachline is empty")]
    EmptyBeachline,

    #[error("malformed beachline: {0}")]
    MalformedTree(&'static str),

    #[error("circle event {0:?} no longer belongs to its arc")]
    StaleCircleEvent(EventId),
}

impl From<FloatIsNaN> for VoronoiError {
    fn from(_: FloatIsNaN) -> VoronoiError {
        VoronoiError::NotANumber
    }
}
