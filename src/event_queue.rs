use std::cmp::Ordering;
use std::collections::binary_heap::BinaryHeap;
use std::collections::HashSet;

use ordered_float::NotNaN;

use crate::error::VoronoiError;
use crate::geometry::{Point, Site};
use crate::voronoi_tree::NodeId;

/// Handle to an inserted event, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

/// An event to be processed in Fortune's Algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Handled when the sweepline is passing this site.
    Site(Site),

    /// Handled when the associated arc collapses into a single point.
    /// May be removed from the event queue when the arc's neighbourhood
    /// changes first.
    Circle {
        /// The point the arc collapses at.
        vertex: Point,

        /// The arc that collapses.
        arc: NodeId,

        /// Where the sweepline is when the circle through the arc's
        /// neighbours touches it.
        sweep: f64
    }
}

impl Event {
    /// Sweepline position of the event.
    pub fn y(&self) -> f64 {
        match *self {
            Event::Site(site) => f64::from(site.y),
            Event::Circle { sweep, .. } => sweep
        }
    }

    pub fn x(&self) -> f64 {
        match *self {
            Event::Site(site) => f64::from(site.x),
            Event::Circle { vertex, .. } => vertex.x
        }
    }

    fn rank(&self) -> u8 {
        match *self {
            Event::Site(..) => 0,
            Event::Circle { .. } => 1
        }
    }
}

/// Heap entry. Compares so that the greatest entry is the next to handle.
#[derive(Debug)]
struct Queued {
    y: NotNaN<f64>,
    rank: u8,
    x: NotNaN<f64>,
    id: EventId,
    event: Event
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher y first, then sites before circles, then lower x, then the
        // order of insertion.
        self.y.cmp(&other.y)
            .then_with(|| other.rank.cmp(&self.rank))
            .then_with(|| other.x.cmp(&self.x))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Event Queue that allows removing events.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: BinaryHeap<Queued>,
    live: HashSet<EventId>,
    next_id: u64
}

impl EventQueue {
    pub fn new() -> EventQueue {
        EventQueue::default()
    }

    pub fn insert(&mut self, event: Event) -> Result<EventId, VoronoiError> {
        let y = NotNaN::new(event.y())?;
        let x = NotNaN::new(event.x())?;
        let id = EventId(self.next_id);
        self.next_id += 1;

        self.queue.push(Queued { y, rank: event.rank(), x, id, event });
        self.live.insert(id);
        Ok(id)
    }

    /// The next event to handle, without removing it.
    pub fn peek(&mut self) -> Option<(EventId, &Event)> {
        self.discard_removed();
        self.queue.peek().map(|queued| (queued.id, &queued.event))
    }

    pub fn pop(&mut self) -> Option<(EventId, Event)> {
        self.discard_removed();
        let queued = self.queue.pop()?;
        self.live.remove(&queued.id);
        Some((queued.id, queued.event))
    }

    /// Drop an event before it is handled. Returns false if the event was
    /// already handled or removed.
    pub fn remove(&mut self, id: EventId) -> bool {
        self.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn discard_removed(&mut self) {
        loop {
            match self.queue.peek() {
                Some(queued) if !self.live.contains(&queued.id) => {}
                _ => break
            }
            self.queue.pop();
        }
    }
}
