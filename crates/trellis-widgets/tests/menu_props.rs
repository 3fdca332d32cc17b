//! Property test for the selection-path invariant: after any input
//! sequence, every prefix of the path indexes a real item.

use proptest::prelude::*;
use trellis_widgets::menu::{self, MenuItem, MenuNavigator};

fn sample_items() -> Vec<MenuItem> {
    vec![
        MenuItem::submenu(
            "File",
            vec![
                MenuItem::new("New"),
                MenuItem::submenu(
                    "Recent",
                    vec![MenuItem::new("a.txt"), MenuItem::new("b.txt")],
                ),
                MenuItem::separator(),
                MenuItem::new("Quit"),
            ],
        ),
        MenuItem::new("Bare"),
        MenuItem::submenu("Help", vec![MenuItem::new("About")]),
    ]
}

proptest! {
    #[test]
    fn every_path_prefix_stays_valid(moves in prop::collection::vec(0u8..5, 0..48)) {
        let mut items = sample_items();
        let mut nav = MenuNavigator::new();
        nav.on_focus_change(true);

        for m in moves {
            match m {
                0 => nav.left(&items),
                1 => nav.right(&items),
                2 => nav.up(&items),
                3 => nav.down(&items),
                _ => {
                    nav.activate(&mut items);
                }
            }

            let path = nav.path().to_vec();
            prop_assert!(!path.is_empty());
            for k in 1..=path.len() {
                prop_assert!(
                    menu::item_at(&items, &path[..k]).is_some(),
                    "prefix {:?} of {:?} resolves to no item",
                    &path[..k],
                    path
                );
            }
        }
    }

    #[test]
    fn depth_is_bounded_by_tree_depth(moves in prop::collection::vec(0u8..5, 0..48)) {
        let mut items = sample_items();
        let bound = menu::tree_depth(&items);
        let mut nav = MenuNavigator::new();
        nav.on_focus_change(true);

        for m in moves {
            match m {
                0 => nav.left(&items),
                1 => nav.right(&items),
                2 => nav.up(&items),
                3 => nav.down(&items),
                _ => {
                    nav.activate(&mut items);
                }
            }
            prop_assert!(nav.depth() <= bound);
        }
    }
}
