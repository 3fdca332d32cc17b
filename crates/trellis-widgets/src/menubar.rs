#![forbid(unsafe_code)]

//! The menu bar and its dropdown float layer.
//!
//! [`attach`] wraps a body node in a float container with a one-row menu
//! bar above it. The bar leaf owns the [`MenuNavigator`]; pane leaves (one
//! per nesting level) render the children of the item selected at their
//! level. [`MenuLayer::sync`] projects the selection path onto the float
//! list before every resolve: the first pane hangs below the bar at the
//! selected top-level item's column, each deeper pane cascades to the
//! right of its parent pane at the selected row. Declaration order makes
//! deeper panes paint over shallower ones.

use crate::float::{Anchor, Float, Placement};
use crate::menu::{self, Activation, MenuItem, MenuNavigator};
use crate::surface::{EventOutcome, Surface};
use crate::tree::{NodeId, Tree};
use std::cell::RefCell;
use std::rc::Rc;
use trellis_core::event::{KeyCode, KeyEvent};
use trellis_core::geometry::Rect;
use trellis_core::text::display_width;
use trellis_layout::Dimension;
use trellis_render::{Frame, Style};

/// Items plus navigator, shared between the bar and its panes.
struct MenuCore {
    items: Vec<MenuItem>,
    nav: MenuNavigator,
}

/// Column offset of item `index` in the rendered bar.
fn bar_offset(items: &[MenuItem], index: usize) -> u16 {
    items
        .iter()
        .take(index)
        .map(|item| segment_width(item.label()))
        .sum()
}

/// Width of one " label " bar segment.
fn segment_width(label: &str) -> u16 {
    (display_width(label) + 2).min(usize::from(u16::MAX)) as u16
}

/// The one-row bar leaf.
struct MenuBar {
    core: Rc<RefCell<MenuCore>>,
}

impl Surface for MenuBar {
    fn width_hint(&self) -> Dimension {
        let core = self.core.borrow();
        let total = bar_offset(&core.items, core.items.len());
        Dimension::default().preferring(total)
    }

    fn height_hint(&self) -> Dimension {
        Dimension::exact(1)
    }

    fn focusable(&self) -> bool {
        true
    }

    fn render(&mut self, area: Rect, frame: &mut Frame, focused: bool) {
        let core = self.core.borrow();
        frame.buffer.fill(area, ' ', Style::new());
        let mut x = area.x;
        for (i, item) in core.items.iter().enumerate() {
            let segment = format!(" {} ", item.label());
            frame.buffer.draw_str(x, area.y, &segment, Style::new(), area);
            let selected = core.nav.path().first() == Some(&i);
            if focused && selected {
                frame.buffer.style_region(
                    Rect::new(x, area.y, segment_width(item.label()), 1),
                    Style::new().reversed(),
                );
                if core.nav.depth() == 1 {
                    frame.set_cursor(Some((x, area.y)));
                }
            }
            x = x.saturating_add(segment_width(item.label()));
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> EventOutcome {
        let core = &mut *self.core.borrow_mut();
        match key.code {
            KeyCode::Left => {
                core.nav.left(&core.items);
                EventOutcome::Consumed
            }
            KeyCode::Right => {
                core.nav.right(&core.items);
                EventOutcome::Consumed
            }
            KeyCode::Up => {
                core.nav.up(&core.items);
                EventOutcome::Consumed
            }
            KeyCode::Down => {
                core.nav.down(&core.items);
                EventOutcome::Consumed
            }
            KeyCode::Enter => {
                if core.nav.activate(&mut core.items) == Activation::Invoked {
                    core.nav.collapse();
                }
                EventOutcome::Consumed
            }
            KeyCode::Escape => {
                if core.nav.collapse() {
                    EventOutcome::Consumed
                } else {
                    EventOutcome::Ignored
                }
            }
            _ => EventOutcome::Ignored,
        }
    }

    fn on_focus_change(&mut self, focused: bool) {
        self.core.borrow_mut().nav.on_focus_change(focused);
    }
}

/// A dropdown pane showing the children of the item selected at
/// `level - 1` of the path.
struct MenuPane {
    core: Rc<RefCell<MenuCore>>,
    level: usize,
}

impl MenuPane {
    /// The items this pane lists, per the current path.
    fn visible_children<'a>(&self, core: &'a MenuCore) -> &'a [MenuItem] {
        let path = core.nav.path();
        if self.level >= path.len() {
            return &[];
        }
        menu::item_at(&core.items, &path[..self.level])
            .map(MenuItem::children)
            .unwrap_or(&[])
    }
}

impl Surface for MenuPane {
    fn width_hint(&self) -> Dimension {
        let core = self.core.borrow();
        let widest = self
            .visible_children(&core)
            .iter()
            .map(|item| display_width(item.label()))
            .max()
            .unwrap_or(0);
        Dimension::exact(((widest + 2).min(usize::from(u16::MAX))) as u16)
    }

    fn height_hint(&self) -> Dimension {
        let core = self.core.borrow();
        Dimension::exact(self.visible_children(&core).len().min(usize::from(u16::MAX)) as u16)
    }

    fn render(&mut self, area: Rect, frame: &mut Frame, _focused: bool) {
        let core = self.core.borrow();
        let children = self.visible_children(&core);
        let path = core.nav.path();
        let selected = path.get(self.level).copied();
        let deepest = self.level + 1 == path.len();

        frame.buffer.fill(area, ' ', Style::new());
        for (i, item) in children.iter().enumerate() {
            let Ok(dy) = u16::try_from(i) else { break };
            if dy >= area.height {
                break;
            }
            let y = area.y + dy;
            let mut style = Style::new();
            if item.is_inert() {
                style = style.dim();
            }
            let line = format!(" {} ", item.label());
            frame.buffer.draw_str(area.x, y, &line, style, area);
            if selected == Some(i) {
                frame.buffer.style_region(
                    Rect::new(area.x, y, area.width, 1),
                    Style::new().reversed(),
                );
                if deepest {
                    frame.set_cursor(Some((area.x, y)));
                }
            }
        }
    }
}

/// Handle to an attached menu layer.
pub struct MenuLayer {
    core: Rc<RefCell<MenuCore>>,
    root: NodeId,
    bar: NodeId,
    panes: Vec<NodeId>,
}

impl MenuLayer {
    /// The float container wrapping the bar and body; use as (part of) the
    /// tree root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The bar leaf; focus it to start menu navigation.
    #[must_use]
    pub fn bar(&self) -> NodeId {
        self.bar
    }

    /// The current selection path (empty until the bar is first focused).
    #[must_use]
    pub fn path(&self) -> Vec<usize> {
        self.core.borrow().nav.path().to_vec()
    }

    /// Whether any dropdown is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.core.borrow().nav.depth() > 1
    }

    /// Label of the item the selection path points at.
    #[must_use]
    pub fn selected_label(&self) -> Option<String> {
        let core = self.core.borrow();
        core.nav.selected(&core.items).map(|i| i.label().to_owned())
    }

    /// Project the selection path onto the float layer. Call before each
    /// resolve (the runtime's frame hook is the natural place).
    pub fn sync(&self, tree: &mut Tree) {
        let core = self.core.borrow();
        let path = core.nav.path();
        let mut floats = Vec::new();
        for level in 1..path.len() {
            let Some(&pane) = self.panes.get(level - 1) else {
                break;
            };
            let anchor = if level == 1 {
                Anchor::Attached {
                    node: self.bar,
                    placement: Placement::Below,
                    dx: bar_offset(&core.items, path[0]) as i16,
                    dy: 0,
                }
            } else {
                Anchor::Attached {
                    node: self.panes[level - 2],
                    placement: Placement::RightOf,
                    dx: 0,
                    dy: path[level - 1] as i16,
                }
            };
            floats.push(Float::new(pane, anchor));
        }
        drop(core);
        tree.set_floats(self.root, floats);
    }
}

/// Put a menu bar above `body` and wire up its dropdown float layer.
///
/// The returned layer's [`root`](MenuLayer::root) replaces `body` in the
/// surrounding tree.
pub fn attach(tree: &mut Tree, body: NodeId, items: Vec<MenuItem>) -> MenuLayer {
    let levels = menu::tree_depth(&items).saturating_sub(1);
    let core = Rc::new(RefCell::new(MenuCore {
        items,
        nav: MenuNavigator::new(),
    }));

    let bar = tree.leaf(MenuBar { core: core.clone() });
    let column = tree.column(vec![bar, body]);
    let panes: Vec<NodeId> = (1..=levels)
        .map(|level| {
            tree.leaf(MenuPane {
                core: core.clone(),
                level,
            })
        })
        .collect();
    let root = tree.float_container(column, Vec::new());

    MenuLayer {
        core,
        root,
        bar,
        panes,
    }
}
