#![forbid(unsafe_code)]

//! Decorative compositions: borders, shadows, and dialogs.
//!
//! Everything here is glue over the container tree — exact-size fill
//! leaves for border pieces, splits for arrangement, floats for shadows
//! and centering. No new layout machinery.

use crate::float::{Anchor, Float};
use crate::surfaces::{Fill, Label};
use crate::tree::{Axis, NodeId, Tree};
use trellis_core::text::display_width;
use trellis_layout::Dimension;
use trellis_render::Style;

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

fn border_cell(tree: &mut Tree, ch: char) -> NodeId {
    let id = tree.leaf(Fill::new(ch));
    tree.set_width(id, Dimension::exact(1));
    id
}

/// Draw a single-line border around `body`, with an optional centered
/// title in the top edge.
pub fn framed(tree: &mut Tree, body: NodeId, title: &str) -> NodeId {
    let tl = border_cell(tree, TOP_LEFT);
    let tr = border_cell(tree, TOP_RIGHT);
    let top = if title.is_empty() {
        let line = tree.leaf(Fill::new(HORIZONTAL));
        tree.row(vec![tl, line, tr])
    } else {
        let text = format!(" {title} ");
        let width = display_width(&text).min(usize::from(u16::MAX)) as u16;
        let label = tree.leaf(Label::new(text));
        tree.set_width(label, Dimension::exact(width));
        let left_line = tree.leaf(Fill::new(HORIZONTAL));
        let right_line = tree.leaf(Fill::new(HORIZONTAL));
        tree.row(vec![tl, left_line, label, right_line, tr])
    };
    tree.set_height(top, Dimension::exact(1));

    let left = border_cell(tree, VERTICAL);
    let right = border_cell(tree, VERTICAL);
    let middle = tree.row(vec![left, body, right]);

    let bl = border_cell(tree, BOTTOM_LEFT);
    let br = border_cell(tree, BOTTOM_RIGHT);
    let line = tree.leaf(Fill::new(HORIZONTAL));
    let bottom = tree.row(vec![bl, line, br]);
    tree.set_height(bottom, Dimension::exact(1));

    tree.column(vec![top, middle, bottom])
}

/// Hang a drop shadow one cell below and to the right of `body`.
///
/// The strips are absolute floats with negative edge offsets, so they land
/// outside the body's own rectangle.
pub fn shadow(tree: &mut Tree, body: NodeId) -> NodeId {
    let shade = Style::new().dim();
    let below = tree.leaf(Fill::new('░').style(shade));
    let beside = tree.leaf(Fill::new('░').style(shade));
    tree.float_container(
        body,
        vec![
            Float::new(
                below,
                Anchor::Absolute {
                    left: Some(1),
                    top: None,
                    right: Some(-1),
                    bottom: Some(-1),
                },
            )
            .height(1),
            Float::new(
                beside,
                Anchor::Absolute {
                    left: None,
                    top: Some(1),
                    right: Some(-1),
                    bottom: Some(-1),
                },
            )
            .width(1),
        ],
    )
}

/// A titled, bordered, shadowed dialog: `body` above a centered row of
/// `buttons`.
///
/// Present it over a background with [`centered`]; tab order follows the
/// buttons' creation order.
pub fn dialog(tree: &mut Tree, title: &str, body: NodeId, buttons: Vec<NodeId>) -> NodeId {
    let content = if buttons.is_empty() {
        body
    } else {
        let left_pad = tree.leaf(Fill::new(' '));
        let right_pad = tree.leaf(Fill::new(' '));
        let mut children = Vec::with_capacity(buttons.len() + 2);
        children.push(left_pad);
        children.extend(buttons);
        children.push(right_pad);
        let row = tree.split(Axis::Horizontal, children, 2);
        tree.set_height(row, Dimension::exact(1));
        tree.split(Axis::Vertical, vec![body, row], 1)
    };
    let framed = framed(tree, content, title);
    shadow(tree, framed)
}

/// Float `content` centered over `base` at its preferred size.
pub fn centered(tree: &mut Tree, base: NodeId, content: NodeId) -> NodeId {
    tree.float_container(base, vec![Float::new(content, Anchor::centered())])
}
