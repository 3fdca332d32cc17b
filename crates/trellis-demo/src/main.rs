#![forbid(unsafe_code)]

//! Showcase: a menu bar over a dialog, plus a worker thread feeding a
//! gauge through the repaint signal.
//!
//! Keys: Tab/Shift-Tab cycle focus, arrows navigate the menu once the bar
//! is focused, Enter activates. File ▸ Quit or the Close button exits.

use std::thread;
use std::time::Duration;
use trellis::prelude::*;
use trellis::CrosstermBackend;

fn main() -> std::io::Result<()> {
    let gauge = Gauge::new();
    let gauge_handle = gauge.handle();

    let mut layer_slot = None;
    let app: App<i32> = App::build(|handles| {
        let mut tree = Tree::new();

        // Dialog body: a message and the progress gauge.
        let message = tree.leaf(Label::new(
            "A worker thread is scanning.\nProgress arrives via the repaint signal.",
        ));
        let gauge_leaf = tree.leaf(gauge);
        let body = tree.column(vec![message, gauge_leaf]);

        let exit_close = handles.exiter();
        let close = tree.leaf(Button::new("Close").on_press(move || exit_close.set(0)));
        let dialog = chrome::dialog(&mut tree, "Worker", body, vec![close]);

        let background = tree.leaf(Fill::new('░').style(Style::new().dim()));
        let centered = chrome::centered(&mut tree, background, dialog);

        let exit_quit = handles.exiter();
        let exit_about = handles.exiter();
        let items = vec![
            MenuItem::submenu(
                "File",
                vec![
                    MenuItem::submenu(
                        "Export",
                        vec![MenuItem::new("Text"), MenuItem::new("HTML")],
                    ),
                    MenuItem::separator(),
                    MenuItem::action("Quit", move || exit_quit.set(1)),
                ],
            ),
            MenuItem::submenu(
                "Help",
                vec![MenuItem::action("About", move || exit_about.set(2))],
            ),
        ];
        let layer = menubar::attach(&mut tree, centered, items);
        let root = layer.root();
        layer_slot = Some(layer);
        (tree, root)
    });

    let layer = layer_slot.expect("menu layer");
    let repaint = app.repaint_handle();
    let mut app = app.with_frame_hook(move |tree| layer.sync(tree));

    thread::spawn(move || {
        for pct in (0u8..=100).step_by(2) {
            gauge_handle.set(pct);
            repaint.request();
            thread::sleep(Duration::from_millis(80));
        }
    });

    let mut backend = CrosstermBackend::new()?;
    let outcome = app.run(&mut backend)?;
    drop(backend);
    println!("exited with {outcome:?}");
    Ok(())
}
