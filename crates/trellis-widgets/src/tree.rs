#![forbid(unsafe_code)]

//! The container tree.
//!
//! Nodes live in an arena and are referred to by [`NodeId`] handles; anchors
//! and parents hold handles, never owning references, so teardown is
//! dropping the arena. The node set is closed: leaves (any [`Surface`]),
//! axis splits, and float containers. New leaf behavior comes from new
//! `Surface` implementations.
//!
//! A render pass is two walks. [`Tree::resolve`] assigns a rectangle to
//! every node top-down: splits divide their extent with the dimension
//! solver (padding between children is a phantom exact-size child), float
//! containers resolve their base first and then each float in declaration
//! order against already-resolved anchors. [`Tree::render`] then paints the
//! base tree and composites floats over it, later floats over earlier ones.
//!
//! No failure in either walk aborts the pass: over-constrained splits clip
//! to minimums and degrade, floats with unresolvable anchors are skipped,
//! and both are recorded as [`LayoutFault`]s for the caller.

use crate::float::{self, Anchor, Float};
use crate::focus::FocusTracker;
use crate::surface::Surface;
use rustc_hash::FxHashMap;
use std::fmt;
use trellis_core::geometry::Rect;
use trellis_layout::{Dimension, distribute};
use trellis_render::{Frame, Style};

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The direction a split arranges its children in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Children side by side, left to right.
    Horizontal,
    /// Children stacked, top to bottom.
    Vertical,
}

enum NodeKind {
    Leaf(Box<dyn Surface>),
    Split {
        axis: Axis,
        children: Vec<NodeId>,
        gap: u16,
    },
    Floats {
        base: NodeId,
        floats: Vec<Float>,
    },
}

struct Node {
    kind: NodeKind,
    width: Option<Dimension>,
    height: Option<Dimension>,
}

/// A recoverable defect recorded during resolution.
///
/// Faults never abort the pass; the affected subtree degrades and the rest
/// of the tree renders normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFault {
    /// A split's child minimums exceed its extent; sizes were clipped to
    /// the minimums and the overflow spills out of the split.
    OverConstrained {
        node: NodeId,
        axis: Axis,
        shortfall: u16,
    },
    /// A float references an anchor with no rectangle in this pass (not in
    /// the tree, hidden, or declared after the float). The float was
    /// skipped.
    DanglingAnchor {
        container: NodeId,
        index: usize,
        anchor: NodeId,
    },
}

impl fmt::Display for LayoutFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverConstrained {
                node,
                axis,
                shortfall,
            } => write!(
                f,
                "split {node:?} over-constrained on {axis:?} axis by {shortfall} cells"
            ),
            Self::DanglingAnchor {
                container,
                index,
                anchor,
            } => write!(
                f,
                "float {index} of {container:?} anchored to unresolved node {anchor:?}"
            ),
        }
    }
}

impl std::error::Error for LayoutFault {}

/// Resolution plan extracted from a node so the walk can recurse without
/// holding a borrow of the arena.
enum Plan {
    Leaf,
    Split(Axis, Vec<NodeId>, u16),
    Floats(NodeId, Vec<Float>),
}

/// Arena of UI nodes plus the per-pass rectangle store.
pub struct Tree {
    nodes: Vec<Node>,
    rects: FxHashMap<NodeId, Rect>,
    faults: Vec<LayoutFault>,
    screen: Rect,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rects: FxHashMap::default(),
            faults: Vec::new(),
            screen: Rect::default(),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Add a leaf surface.
    pub fn leaf(&mut self, surface: impl Surface + 'static) -> NodeId {
        self.push(Node {
            kind: NodeKind::Leaf(Box::new(surface)),
            width: None,
            height: None,
        })
    }

    /// Add a split along `axis` with `gap` cells of padding between
    /// children.
    pub fn split(&mut self, axis: Axis, children: Vec<NodeId>, gap: u16) -> NodeId {
        self.push(Node {
            kind: NodeKind::Split {
                axis,
                children,
                gap,
            },
            width: None,
            height: None,
        })
    }

    /// Children side by side.
    pub fn row(&mut self, children: Vec<NodeId>) -> NodeId {
        self.split(Axis::Horizontal, children, 0)
    }

    /// Children stacked.
    pub fn column(&mut self, children: Vec<NodeId>) -> NodeId {
        self.split(Axis::Vertical, children, 0)
    }

    /// Add a float container over `base`.
    pub fn float_container(&mut self, base: NodeId, floats: Vec<Float>) -> NodeId {
        self.push(Node {
            kind: NodeKind::Floats { base, floats },
            width: None,
            height: None,
        })
    }

    /// Replace the float list of a float container. No-op on other nodes.
    pub fn set_floats(&mut self, container: NodeId, new_floats: Vec<Float>) {
        if let Some(node) = self.nodes.get_mut(container.index())
            && let NodeKind::Floats { floats, .. } = &mut node.kind
        {
            *floats = new_floats;
        }
    }

    /// The float list of a container, empty for other nodes.
    pub fn floats(&self, container: NodeId) -> &[Float] {
        match self.node(container).map(|n| &n.kind) {
            Some(NodeKind::Floats { floats, .. }) => floats,
            _ => &[],
        }
    }

    /// Override the horizontal space request of a node.
    pub fn set_width(&mut self, id: NodeId, dim: Dimension) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.width = Some(dim);
        }
    }

    /// Override the vertical space request of a node.
    pub fn set_height(&mut self, id: NodeId, dim: Dimension) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.height = Some(dim);
        }
    }

    /// The surface of a leaf node.
    pub fn surface_mut(&mut self, id: NodeId) -> Option<&mut dyn Surface> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(s)) => Some(s.as_mut()),
            _ => None,
        }
    }

    /// Whether `id` is a leaf that takes focus.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Leaf(s)) if s.focusable())
    }

    /// Tell a leaf that it gained or lost focus.
    pub fn notify_focus(&mut self, id: NodeId, focused: bool) {
        if let Some(s) = self.surface_mut(id) {
            s.on_focus_change(focused);
        }
    }

    /// Horizontal space request of a node: the override if set, otherwise
    /// derived from the subtree (sums along a horizontal split, maximum
    /// across a vertical one).
    pub fn width_hint(&self, id: NodeId) -> Dimension {
        let Some(node) = self.node(id) else {
            return Dimension::default();
        };
        if let Some(d) = node.width {
            return d.normalized();
        }
        match &node.kind {
            NodeKind::Leaf(s) => s.width_hint().normalized(),
            NodeKind::Split {
                axis: Axis::Horizontal,
                children,
                gap,
            } => {
                let mut dims: Vec<Dimension> =
                    children.iter().map(|&c| self.width_hint(c)).collect();
                if *gap > 0 && children.len() > 1 {
                    dims.push(Dimension::exact(*gap * (children.len() as u16 - 1)));
                }
                Dimension::sum_of(dims)
            }
            NodeKind::Split {
                axis: Axis::Vertical,
                children,
                ..
            } => Dimension::max_of(children.iter().map(|&c| self.width_hint(c))),
            NodeKind::Floats { base, .. } => self.width_hint(*base),
        }
    }

    /// Vertical space request of a node; mirror of [`Tree::width_hint`].
    pub fn height_hint(&self, id: NodeId) -> Dimension {
        let Some(node) = self.node(id) else {
            return Dimension::default();
        };
        if let Some(d) = node.height {
            return d.normalized();
        }
        match &node.kind {
            NodeKind::Leaf(s) => s.height_hint().normalized(),
            NodeKind::Split {
                axis: Axis::Vertical,
                children,
                gap,
            } => {
                let mut dims: Vec<Dimension> =
                    children.iter().map(|&c| self.height_hint(c)).collect();
                if *gap > 0 && children.len() > 1 {
                    dims.push(Dimension::exact(*gap * (children.len() as u16 - 1)));
                }
                Dimension::sum_of(dims)
            }
            NodeKind::Split {
                axis: Axis::Horizontal,
                children,
                ..
            } => Dimension::max_of(children.iter().map(|&c| self.height_hint(c))),
            NodeKind::Floats { base, .. } => self.height_hint(*base),
        }
    }

    /// The preferred size of a node, used to size floats without edge
    /// constraints.
    fn preferred_size(&self, id: NodeId) -> (u16, u16) {
        let w = self.width_hint(id);
        let h = self.height_hint(id);
        (w.preferred.max(w.min), h.preferred.max(h.min))
    }

    /// Resolve the tree into concrete rectangles.
    ///
    /// Clears the previous pass, then assigns every reachable node a
    /// rectangle. Returns the faults recorded during this pass. Resolving
    /// an unchanged tree with the same area yields identical rectangles.
    pub fn resolve(&mut self, root: NodeId, area: Rect) -> &[LayoutFault] {
        self.rects.clear();
        self.faults.clear();
        self.screen = area;
        self.place(root, area);
        &self.faults
    }

    /// The rectangle assigned to `id` in the last pass.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    /// Faults recorded by the last pass.
    pub fn faults(&self) -> &[LayoutFault] {
        &self.faults
    }

    fn plan(&self, id: NodeId) -> Option<Plan> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(_)) => Some(Plan::Leaf),
            Some(NodeKind::Split {
                axis,
                children,
                gap,
            }) => Some(Plan::Split(*axis, children.clone(), *gap)),
            Some(NodeKind::Floats { base, floats }) => Some(Plan::Floats(*base, floats.clone())),
            None => None,
        }
    }

    fn place(&mut self, id: NodeId, area: Rect) {
        self.rects.insert(id, area);
        match self.plan(id) {
            None | Some(Plan::Leaf) => {}
            Some(Plan::Split(axis, children, gap)) => {
                self.place_split(id, area, axis, &children, gap);
            }
            Some(Plan::Floats(base, floats)) => {
                self.place(base, area);
                for (index, fl) in floats.iter().enumerate() {
                    if fl.hidden {
                        continue;
                    }
                    self.place_float(id, area, index, fl);
                }
            }
        }
    }

    fn place_split(&mut self, id: NodeId, area: Rect, axis: Axis, children: &[NodeId], gap: u16) {
        let mut dims: Vec<Dimension> = Vec::with_capacity(children.len() * 2);
        for (i, &child) in children.iter().enumerate() {
            if gap > 0 && i > 0 {
                dims.push(Dimension::exact(gap));
            }
            dims.push(match axis {
                Axis::Horizontal => self.width_hint(child),
                Axis::Vertical => self.height_hint(child),
            });
        }

        let extent = match axis {
            Axis::Horizontal => area.width,
            Axis::Vertical => area.height,
        };
        let dist = distribute(extent, &dims);
        if dist.over_constrained() {
            tracing::warn!(
                node = ?id,
                ?axis,
                shortfall = dist.shortfall,
                "split minimums exceed available space; clipping"
            );
            self.faults.push(LayoutFault::OverConstrained {
                node: id,
                axis,
                shortfall: dist.shortfall,
            });
        }

        let mut pos = match axis {
            Axis::Horizontal => area.x,
            Axis::Vertical => area.y,
        };
        let mut slot = 0;
        for (i, &child) in children.iter().enumerate() {
            if gap > 0 && i > 0 {
                pos = pos.saturating_add(dist.sizes[slot]);
                slot += 1;
            }
            let size = dist.sizes[slot];
            slot += 1;
            let rect = match axis {
                Axis::Horizontal => Rect::new(pos, area.y, size, area.height),
                Axis::Vertical => Rect::new(area.x, pos, area.width, size),
            };
            // Over-constrained children can spill past the split; clip so a
            // degraded subtree cannot paint over its parent's siblings.
            let rect = rect.intersection(area).unwrap_or(Rect {
                width: 0,
                height: 0,
                ..rect
            });
            pos = pos.saturating_add(size);
            self.place(child, rect);
        }
    }

    fn place_float(&mut self, container: NodeId, area: Rect, index: usize, fl: &Float) {
        let pref = self.preferred_size(fl.content);
        let raw = match fl.anchor {
            Anchor::Absolute {
                left,
                top,
                right,
                bottom,
            } => float::resolve_absolute(area, left, top, right, bottom, fl.width, fl.height, pref),
            Anchor::Attached {
                node,
                placement,
                dx,
                dy,
            } => {
                let Some(anchor_rect) = self.rects.get(&node).copied() else {
                    tracing::warn!(
                        container = ?container,
                        index,
                        anchor = ?node,
                        "float anchored to unresolved node; skipping"
                    );
                    self.faults.push(LayoutFault::DanglingAnchor {
                        container,
                        index,
                        anchor: node,
                    });
                    return;
                };
                let size = (fl.width.unwrap_or(pref.0), fl.height.unwrap_or(pref.1));
                float::resolve_attached(anchor_rect, placement, dx, dy, size)
            }
        };
        let rect = float::clamp_to_screen(raw.0, raw.1, raw.2, raw.3, self.screen);
        self.place(fl.content, rect);
    }

    /// Paint the resolved tree into `frame`.
    ///
    /// Must follow a [`Tree::resolve`] of the same root; unresolved nodes
    /// are skipped silently.
    pub fn render(&mut self, root: NodeId, frame: &mut Frame, focus: &FocusTracker) {
        self.paint(root, frame, focus);
    }

    fn paint(&mut self, id: NodeId, frame: &mut Frame, focus: &FocusTracker) {
        let Some(area) = self.rects.get(&id).copied() else {
            return;
        };
        match self.plan(id) {
            None => {}
            Some(Plan::Leaf) => {
                let focused = focus.current() == Some(id);
                if let Some(NodeKind::Leaf(s)) =
                    self.nodes.get_mut(id.index()).map(|n| &mut n.kind)
                {
                    s.render(area, frame, focused);
                }
            }
            Some(Plan::Split(_, children, _)) => {
                for child in children {
                    self.paint(child, frame, focus);
                }
            }
            Some(Plan::Floats(base, floats)) => {
                self.paint(base, frame, focus);
                for fl in floats {
                    if fl.hidden {
                        continue;
                    }
                    let Some(rect) = self.rects.get(&fl.content).copied() else {
                        continue;
                    };
                    if rect.is_empty() {
                        continue;
                    }
                    if fl.transparent {
                        let mut scratch = Frame::new(frame.width(), frame.height());
                        self.paint(fl.content, &mut scratch, focus);
                        frame.buffer.merge_region(&scratch.buffer, rect, true);
                        if let Some(cursor) = scratch.cursor() {
                            frame.set_cursor(Some(cursor));
                        }
                    } else {
                        frame.buffer.fill(rect, ' ', Style::new());
                        self.paint(fl.content, frame, focus);
                    }
                }
            }
        }
    }

    /// The topmost leaf under the cell `(x, y)`, honoring float stacking.
    ///
    /// Pointer input is out of scope for the engine, but the resolved
    /// rectangles keep hit testing possible for a backend that adds it.
    pub fn leaf_at(&self, root: NodeId, x: u16, y: u16) -> Option<NodeId> {
        let mut hit = None;
        self.hit_walk(root, x, y, &mut hit);
        hit
    }

    fn hit_walk(&self, id: NodeId, x: u16, y: u16, hit: &mut Option<NodeId>) {
        let Some(rect) = self.rects.get(&id) else {
            return;
        };
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(_)) => {
                if rect.contains(x, y) {
                    *hit = Some(id);
                }
            }
            Some(NodeKind::Split { children, .. }) => {
                for &child in children {
                    self.hit_walk(child, x, y, hit);
                }
            }
            Some(NodeKind::Floats { base, floats }) => {
                self.hit_walk(*base, x, y, hit);
                for fl in floats {
                    if !fl.hidden {
                        self.hit_walk(fl.content, x, y, hit);
                    }
                }
            }
            None => {}
        }
    }

    /// Focusable leaves reachable from `root` in document order.
    ///
    /// Document order is the tab order: split children in sequence, a float
    /// container's base before its floats.
    pub fn focusable_leaves(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_focusable(root, &mut out);
        out
    }

    fn collect_focusable(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(s)) => {
                if s.focusable() {
                    out.push(id);
                }
            }
            Some(NodeKind::Split { children, .. }) => {
                for &child in children {
                    self.collect_focusable(child, out);
                }
            }
            Some(NodeKind::Floats { base, floats }) => {
                self.collect_focusable(*base, out);
                for fl in floats {
                    self.collect_focusable(fl.content, out);
                }
            }
            None => {}
        }
    }
}
