//! Whole-engine tests: tree, focus, menus, and floats working together.

use trellis_core::event::{KeyCode, KeyEvent};
use trellis_core::geometry::Rect;
use trellis_layout::Dimension;
use trellis_render::Frame;
use trellis_widgets::menu::MenuItem;
use trellis_widgets::surfaces::{Button, Fill, Label};
use trellis_widgets::tree::Tree;
use trellis_widgets::{FocusTracker, chrome, menubar};

#[test]
fn menu_and_dialog_compose() {
    let mut tree = Tree::new();
    let background = tree.leaf(Fill::new(' '));
    let text = tree.leaf(Label::new("body"));
    let ok = tree.leaf(Button::new("Ok"));
    let dialog = chrome::dialog(&mut tree, "Dialog", text, vec![ok]);
    let centered = chrome::centered(&mut tree, background, dialog);

    let items = vec![MenuItem::submenu(
        "View",
        vec![MenuItem::new("Zoom In"), MenuItem::new("Zoom Out")],
    )];
    let layer = menubar::attach(&mut tree, centered, items);
    let root = layer.root();

    let mut focus = FocusTracker::new();
    for id in tree.focusable_leaves(root) {
        focus.register(id);
    }
    focus.focus(layer.bar());
    tree.notify_focus(layer.bar(), true);

    // Open the dropdown.
    tree.surface_mut(layer.bar())
        .unwrap()
        .on_key(KeyEvent::new(KeyCode::Down));
    assert_eq!(layer.path(), vec![0, 0]);

    layer.sync(&mut tree);
    tree.resolve(root, Rect::new(0, 0, 40, 12));
    assert!(tree.faults().is_empty());

    let mut frame = Frame::new(40, 12);
    tree.render(root, &mut frame, &focus);

    // The dropdown owns rows 1-2 at the bar's left edge even though the
    // dialog occupies the middle of the screen.
    assert!(frame.buffer.row_text(1).contains(" Zoom In "));
    assert!(frame.buffer.row_text(2).contains(" Zoom Out "));
    // The dialog is still visible elsewhere.
    let all: String = (0..12).map(|y| frame.buffer.row_text(y)).collect();
    assert!(all.contains(" Dialog "));
}

#[test]
fn unregistering_focused_leaf_falls_forward() {
    let mut tree = Tree::new();
    let a = tree.leaf(Button::new("A"));
    let b = tree.leaf(Button::new("B"));
    let c = tree.leaf(Button::new("C"));
    let root = tree.row(vec![a, b, c]);

    let mut focus = FocusTracker::new();
    for id in tree.focusable_leaves(root) {
        focus.register(id);
    }
    focus.focus(b);
    focus.unregister(b);
    assert_eq!(focus.current(), Some(c));

    // The tree still renders; the removed leaf simply no longer paints as
    // focused.
    tree.resolve(root, Rect::new(0, 0, 36, 1));
    let mut frame = Frame::new(36, 1);
    tree.render(root, &mut frame, &focus);
    assert!(frame.buffer.row_text(0).contains("< A"));
}

#[test]
fn split_passes_full_cross_axis_to_children() {
    let mut tree = Tree::new();
    let narrow = tree.leaf(Fill::new('n'));
    tree.set_width(narrow, Dimension::exact(5));
    let wide = tree.leaf(Fill::new('w'));
    let root = tree.row(vec![narrow, wide]);

    tree.resolve(root, Rect::new(0, 0, 20, 7));
    // Both children span the full height of the row.
    assert_eq!(tree.rect(narrow), Some(Rect::new(0, 0, 5, 7)));
    assert_eq!(tree.rect(wide), Some(Rect::new(5, 0, 15, 7)));
}

#[test]
fn deep_menu_cascade_resolves_and_paints_left_to_right() {
    let mut tree = Tree::new();
    let body = tree.leaf(Fill::new('.'));
    let items = vec![MenuItem::submenu(
        "A",
        vec![MenuItem::submenu(
            "B",
            vec![MenuItem::submenu("C", vec![MenuItem::new("D")])],
        )],
    )];
    let layer = menubar::attach(&mut tree, body, items);
    let root = layer.root();

    let mut focus = FocusTracker::new();
    focus.register(layer.bar());
    focus.focus(layer.bar());
    tree.notify_focus(layer.bar(), true);

    for code in [KeyCode::Down, KeyCode::Right, KeyCode::Right] {
        tree.surface_mut(layer.bar())
            .unwrap()
            .on_key(KeyEvent::new(code));
    }
    assert_eq!(layer.path(), vec![0, 0, 0, 0]);

    layer.sync(&mut tree);
    tree.resolve(root, Rect::new(0, 0, 60, 15));
    assert!(tree.faults().is_empty());

    let floats = tree.floats(root);
    assert_eq!(floats.len(), 3);
    let rects: Vec<Rect> = floats
        .iter()
        .map(|f| tree.rect(f.content).unwrap())
        .collect();
    // Cascade strictly left to right, each pane starting at its parent's
    // right edge.
    assert!(rects[0].x < rects[1].x);
    assert!(rects[1].x < rects[2].x);
    assert_eq!(rects[1].x, rects[0].right());
    assert_eq!(rects[2].x, rects[1].right());
}
