use crate::bisector::Bisector;
use crate::error::VoronoiError;
use crate::event_queue::EventId;
use crate::geometry::{Point, Site};

/// Slot of a node in the beachline arena. Slots are reused once freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index)
    }
}

/// Index of a bisector. Bisectors are never freed, so these stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

/// An arc on the beachline.
///
/// A parabola with the specified focus and a directix of the sweepline.
/// Since the sweepline changes as the algorithm runs, this represents an
/// entire class of parabolas, though only one parabola at any point in time.
#[derive(Debug, Clone)]
pub struct Arc {
    /// The focus of the parabolas where the directrix is the sweepline.
    pub focus: Site,

    /// Pending circle event of the arc. At most one at a time.
    pub circle_event: Option<EventId>,

    /// Pointer up the tree.
    parent: Option<NodeId>
}

impl Arc {
    fn new(focus: Site) -> Arc {
        Arc { focus, circle_event: None, parent: None }
    }
}

/// Boundary between the arcs of its two subtrees.
#[derive(Debug, Clone)]
pub struct Breakpoint {
    /// The bisector the breakpoint travels along.
    pub edge: EdgeId,
    left: NodeId,
    right: NodeId,
    parent: Option<NodeId>
}

impl Breakpoint {
    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }
}

/// Tree where the branches are breakpoints and the leaves are arcs.
#[derive(Debug, Clone)]
pub enum ArcTreeComponent {
    Branch(Breakpoint),
    Leaf(Arc)
}

impl ArcTreeComponent {
    fn set_parent(&mut self, parent: Option<NodeId>) {
        match *self {
            ArcTreeComponent::Branch(ref mut breakpoint) => breakpoint.parent = parent,
            ArcTreeComponent::Leaf(ref mut arc) => arc.parent = parent,
        }
    }
}

/// The breakpoints and arcs next to an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub left_edge: Option<NodeId>,
    pub left_arc: Option<NodeId>,
    pub right_edge: Option<NodeId>,
    pub right_arc: Option<NodeId>
}

/// The arcs that came out of splitting one arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub left_arc: NodeId,
    pub new_arc: NodeId,
    pub right_arc: NodeId,
    pub left_edge: EdgeId,
    pub right_edge: EdgeId,
    /// The circle event of the arc that was split. No longer valid.
    pub invalid_event: Option<EventId>
}

/// What became of the neighbourhood of a removed arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub left_arc: NodeId,
    pub right_arc: NodeId,
    /// The bisectors that bounded the arc, left one first. Both end at the
    /// vertex now.
    pub finished: [EdgeId; 2],
    /// The bisector between the arcs that became adjacent.
    pub new_edge: EdgeId
}

/// The beachline knows what all the arcs and breakpoints are.
///
/// Nodes live in an arena and refer to each other by `NodeId`. Every
/// breakpoint owns its two children; the root is owned by the beachline.
/// The bisectors the breakpoints travel along are kept in a second arena
/// that only grows, so finished edges can still be looked up.
#[derive(Debug, Default)]
pub struct Beachline {
    nodes: Vec<Option<ArcTreeComponent>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    edges: Vec<Bisector>
}

impl Beachline {
    pub fn new() -> Beachline {
        Beachline::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self, id: NodeId) -> Result<&ArcTreeComponent, VoronoiError> {
        self.nodes.get(id.0).and_then(Option::as_ref).ok_or(VoronoiError::MissingNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut ArcTreeComponent, VoronoiError> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut).ok_or(VoronoiError::MissingNode(id))
    }

    pub fn arc(&self, id: NodeId) -> Result<&Arc, VoronoiError> {
        match *self.node(id)? {
            ArcTreeComponent::Leaf(ref arc) => Ok(arc),
            ArcTreeComponent::Branch(..) => Err(VoronoiError::NotAnArc(id)),
        }
    }

    pub fn arc_mut(&mut self, id: NodeId) -> Result<&mut Arc, VoronoiError> {
        match *self.node_mut(id)? {
            ArcTreeComponent::Leaf(ref mut arc) => Ok(arc),
            ArcTreeComponent::Branch(..) => Err(VoronoiError::NotAnArc(id)),
        }
    }

    pub fn breakpoint(&self, id: NodeId) -> Result<&Breakpoint, VoronoiError> {
        match *self.node(id)? {
            ArcTreeComponent::Branch(ref breakpoint) => Ok(breakpoint),
            ArcTreeComponent::Leaf(..) => Err(VoronoiError::NotABreakpoint(id)),
        }
    }

    fn breakpoint_mut(&mut self, id: NodeId) -> Result<&mut Breakpoint, VoronoiError> {
        match *self.node_mut(id)? {
            ArcTreeComponent::Branch(ref mut breakpoint) => Ok(breakpoint),
            ArcTreeComponent::Leaf(..) => Err(VoronoiError::NotABreakpoint(id)),
        }
    }

    pub fn edge(&self, id: EdgeId) -> &Bisector {
        &self.edges[id.0]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Bisector {
        &mut self.edges[id.0]
    }

    /// Every bisector ever created, in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Bisector)> {
        self.edges.iter().enumerate().map(|(index, edge)| (EdgeId(index), edge))
    }

    fn add_edge(&mut self, edge: Bisector) -> EdgeId {
        self.edges.push(edge);
        EdgeId(self.edges.len() - 1)
    }

    /// Add a bisector and its complement, linked to each other.
    fn add_complements(&mut self, left: Bisector, right: Bisector) -> (EdgeId, EdgeId) {
        let left = self.add_edge(left);
        let right = self.add_edge(right);
        self.edges[left.0].complement = Some(right);
        self.edges[right.0].complement = Some(left);
        (left, right)
    }

    /// Unlink a bisector from its complement, on both sides.
    pub fn sever_complement(&mut self, id: EdgeId) {
        if let Some(complement) = self.edges[id.0].complement.take() {
            self.edges[complement.0].complement = None;
        }
    }

    fn alloc(&mut self, node: ArcTreeComponent) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            },
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id.0) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
    }

    /// Put `new` where `old` hangs below `parent`, or at the root.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) -> Result<(), VoronoiError> {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                let breakpoint = self.breakpoint_mut(parent)?;
                if breakpoint.left == old {
                    breakpoint.left = new;
                } else if breakpoint.right == old {
                    breakpoint.right = new;
                } else {
                    return Err(VoronoiError::MalformedTree("child is missing from its parent"));
                }
            }
        }

        self.node_mut(new)?.set_parent(parent);
        Ok(())
    }

    /// Start the beachline with the arc of its first site.
    pub fn insert_root(&mut self, focus: Site) -> Result<NodeId, VoronoiError> {
        if self.root.is_some() {
            return Err(VoronoiError::MalformedTree("beachline already has a root"));
        }

        let root = self.alloc(ArcTreeComponent::Leaf(Arc::new(focus)));
        self.root = Some(root);
        Ok(root)
    }

    /// Find the arc directly above `x` when the sweepline is at `sweep`.
    pub fn locate(&self, x: f64, sweep: f64) -> Result<NodeId, VoronoiError> {
        let mut current = self.root.ok_or(VoronoiError::EmptyBeachline)?;

        loop {
            match *self.node(current)? {
                ArcTreeComponent::Leaf(..) => return Ok(current),
                ArcTreeComponent::Branch(ref breakpoint) => {
                    current = if self.edge(breakpoint.edge).x_at(sweep) <= x {
                        breakpoint.right
                    } else {
                        breakpoint.left
                    };
                }
            }
        }
    }

    /// Replace the arc with three arcs.
    ///
    /// The left and right arcs have the same focus as the one being removed,
    /// while the middle one has the specified site as its focus. The two
    /// bisectors start at `origin`, the point of the arc above the site.
    ///
    /// ```text
    ///           left edge
    ///          /         \
    ///      left arc    right edge
    ///                 /          \
    ///             new arc     right arc
    /// ```
    pub fn split(&mut self, arc: NodeId, site: Site, origin: Point) -> Result<Split, VoronoiError> {
        let (focus, parent, invalid_event) = {
            let old = self.arc(arc)?;
            (old.focus, old.parent, old.circle_event)
        };

        let (left_edge, right_edge) = self.add_complements(
            Bisector::new(site, focus, origin),
            Bisector::new(focus, site, origin)
        );

        let left_arc = self.alloc(ArcTreeComponent::Leaf(Arc::new(focus)));
        let new_arc = self.alloc(ArcTreeComponent::Leaf(Arc::new(site)));
        let right_arc = self.alloc(ArcTreeComponent::Leaf(Arc::new(focus)));

        let right_branch = self.alloc(ArcTreeComponent::Branch(Breakpoint {
            edge: right_edge, left: new_arc, right: right_arc, parent: None
        }));
        let left_branch = self.alloc(ArcTreeComponent::Branch(Breakpoint {
            edge: left_edge, left: left_arc, right: right_branch, parent: None
        }));

        self.node_mut(left_arc)?.set_parent(Some(left_branch));
        self.node_mut(right_branch)?.set_parent(Some(left_branch));
        self.node_mut(new_arc)?.set_parent(Some(right_branch));
        self.node_mut(right_arc)?.set_parent(Some(right_branch));

        self.replace_child(parent, arc, left_branch)?;
        self.release(arc);

        Ok(Split { left_arc, new_arc, right_arc, left_edge, right_edge, invalid_event })
    }

    /// Replace the arc with two arcs, one for its focus and one for a site on
    /// the same sweepline, divided by a single vertical bisector from `origin`.
    ///
    /// Returns the arc of the new site and the bisector.
    pub fn split_horizontal(&mut self, arc: NodeId, site: Site, origin: Point)
        -> Result<(NodeId, EdgeId, Option<EventId>), VoronoiError>
    {
        let (focus, parent, invalid_event) = {
            let old = self.arc(arc)?;
            (old.focus, old.parent, old.circle_event)
        };

        // Right site first, so the bisector heads down.
        let (left_site, right_site) = if focus.x <= site.x { (focus, site) } else { (site, focus) };
        let edge = self.add_edge(Bisector::new(right_site, left_site, origin));

        let left_arc = self.alloc(ArcTreeComponent::Leaf(Arc::new(left_site)));
        let right_arc = self.alloc(ArcTreeComponent::Leaf(Arc::new(right_site)));
        let branch = self.alloc(ArcTreeComponent::Branch(Breakpoint {
            edge, left: left_arc, right: right_arc, parent: None
        }));

        self.node_mut(left_arc)?.set_parent(Some(branch));
        self.node_mut(right_arc)?.set_parent(Some(branch));

        self.replace_child(parent, arc, branch)?;
        self.release(arc);

        let new_arc = if right_site == site { right_arc } else { left_arc };
        Ok((new_arc, edge, invalid_event))
    }

    fn leftmost(&self, mut id: NodeId) -> Result<NodeId, VoronoiError> {
        loop {
            match *self.node(id)? {
                ArcTreeComponent::Leaf(..) => return Ok(id),
                ArcTreeComponent::Branch(ref breakpoint) => id = breakpoint.left,
            }
        }
    }

    fn rightmost(&self, mut id: NodeId) -> Result<NodeId, VoronoiError> {
        loop {
            match *self.node(id)? {
                ArcTreeComponent::Leaf(..) => return Ok(id),
                ArcTreeComponent::Branch(ref breakpoint) => id = breakpoint.right,
            }
        }
    }

    /// Find the breakpoints and arcs around an arc.
    ///
    /// The left breakpoint is the nearest ancestor that has the arc in its
    /// right subtree; the left arc is the rightmost leaf of its left subtree.
    /// Mirrored for the right side.
    pub fn neighbors(&self, arc: NodeId) -> Result<Neighbors, VoronoiError> {
        let mut neighbors = Neighbors::default();
        let start = self.arc(arc)?.parent;

        let mut child = arc;
        let mut current = start;
        while let Some(id) = current {
            let breakpoint = self.breakpoint(id)?;
            if breakpoint.right == child {
                neighbors.left_edge = Some(id);
                neighbors.left_arc = Some(self.rightmost(breakpoint.left)?);
                break;
            }
            child = id;
            current = breakpoint.parent;
        }

        child = arc;
        current = start;
        while let Some(id) = current {
            let breakpoint = self.breakpoint(id)?;
            if breakpoint.left == child {
                neighbors.right_edge = Some(id);
                neighbors.right_arc = Some(self.leftmost(breakpoint.right)?);
                break;
            }
            child = id;
            current = breakpoint.parent;
        }

        Ok(neighbors)
    }

    /// Take a collapsed arc off the beachline.
    ///
    /// The arc's sibling moves up into its parent's place. The parent's
    /// bisector is done; the other bounding breakpoint stays where it is but
    /// now travels along a new bisector from `vertex` between the arcs that
    /// became adjacent. Everything is checked before anything is changed.
    pub fn remove_arc(&mut self, arc: NodeId, vertex: Point) -> Result<Removal, VoronoiError> {
        let neighbors = self.neighbors(arc)?;
        let (left_edge, left_arc, right_edge, right_arc) = match neighbors {
            Neighbors { left_edge: Some(le), left_arc: Some(la), right_edge: Some(re), right_arc: Some(ra) } => (le, la, re, ra),
            _ => return Err(VoronoiError::MalformedTree("collapsing arc lacks a neighbour")),
        };

        let parent = self.arc(arc)?.parent.ok_or(VoronoiError::MalformedTree("collapsing arc is the root"))?;
        let (sibling, grandparent) = {
            let breakpoint = self.breakpoint(parent)?;
            let sibling = if breakpoint.left == arc { breakpoint.right } else { breakpoint.left };
            (sibling, breakpoint.parent)
        };

        let other = if parent == left_edge {
            right_edge
        } else if parent == right_edge {
            left_edge
        } else {
            return Err(VoronoiError::MalformedTree("parent does not bound its arc"));
        };

        let left_focus = self.arc(left_arc)?.focus;
        let right_focus = self.arc(right_arc)?.focus;
        let left_bisector = self.breakpoint(left_edge)?.edge;
        let right_bisector = self.breakpoint(right_edge)?.edge;
        self.breakpoint(other)?;

        let direction = self.edge(left_bisector).direction + self.edge(right_bisector).direction;

        self.replace_child(grandparent, parent, sibling)?;
        self.release(parent);
        self.release(arc);

        let new_edge = self.add_edge(Bisector::with_direction(left_focus, right_focus, vertex, direction));
        self.breakpoint_mut(other)?.edge = new_edge;

        self.edge_mut(left_bisector).end = Some(vertex);
        self.edge_mut(right_bisector).end = Some(vertex);

        Ok(Removal { left_arc, right_arc, finished: [left_bisector, right_bisector], new_edge })
    }

    /// Arcs from left to right.
    pub fn arcs(&self) -> Result<Vec<NodeId>, VoronoiError> {
        let mut arcs = vec![];
        let mut stack = vec![];
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                match *self.node(id)? {
                    ArcTreeComponent::Leaf(..) => {
                        arcs.push(id);
                        current = None;
                    },
                    ArcTreeComponent::Branch(ref breakpoint) => {
                        stack.push(breakpoint.right);
                        current = Some(breakpoint.left);
                    }
                }
            }
            current = stack.pop();
        }

        Ok(arcs)
    }

    /// Bisectors of the breakpoints still in the tree, children before
    /// their parents.
    pub fn remaining_edges(&self) -> Result<Vec<EdgeId>, VoronoiError> {
        fn visit(beachline: &Beachline, id: NodeId, edges: &mut Vec<EdgeId>) -> Result<(), VoronoiError> {
            if let ArcTreeComponent::Branch(ref breakpoint) = *beachline.node(id)? {
                visit(beachline, breakpoint.right, edges)?;
                visit(beachline, breakpoint.left, edges)?;
                edges.push(breakpoint.edge);
            }
            Ok(())
        }

        let mut edges = vec![];
        if let Some(root) = self.root {
            visit(self, root, &mut edges)?;
        }
        Ok(edges)
    }
}
