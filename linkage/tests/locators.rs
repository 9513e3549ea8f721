use linkage::attributes::{to_map, AttrValue, AttributeMap};
use linkage::{Drawing, Geometry, Locator, PathNode, Point, Rect, Shape};
use proptest::prelude::*;

fn wave(n: usize) -> Shape {
    let nodes = (0..n)
        .map(|i| {
            let x = i as f32 * 10.0;
            let y = if i % 2 == 0 { 0.0 } else { 10.0 };
            PathNode::curved(Point::new(x, y), Point::new(x - 3.0, y + 1.0), Point::new(x + 3.0, y - 1.0))
        })
        .collect();
    Shape::path(nodes, false)
}

#[test]
fn index_past_end_resolves_to_origin() {
    // two nodes, index 2 is one past the end
    let s = wave(2);
    assert_eq!(s.node_count(), 2);
    assert_eq!(Locator::path_node(2).compute(&s), Point::ORIGIN);
    assert_eq!(Locator::path_node_coord(2, 1).compute(&s), Point::ORIGIN);
}

#[test]
fn two_argument_constructor_keeps_coord() {
    let s = wave(4);
    let loc = Locator::path_node_coord(3, 2);
    assert_eq!(loc, Locator::PathNode { index: 3, coord: 2 });
    assert_eq!(loc.compute(&s), Point::new(33.0, 9.0));
    assert_eq!(Locator::path_node_coord(3, 1).compute(&s), Point::new(27.0, 11.0));
}

#[test]
fn truncated_path_degrades_instead_of_failing() {
    let mut d = Drawing::new();
    let id = d.add_shape(wave(3));
    let loc = Locator::path_node(2);
    let view = d.shape_view(id).unwrap();
    assert_eq!(loc.compute(&view), Point::new(20.0, 0.0));
    assert!(d.remove_path_node(id, 2));
    let view = d.shape_view(id).unwrap();
    assert_eq!(loc.compute(&view), Point::ORIGIN);
}

#[test]
fn path_node_attributes_use_declared_names() {
    let attrs = Locator::path_node_coord(1, 2).write_attributes();
    assert_eq!(
        attrs,
        vec![
            ("index".to_string(), AttrValue::Int(1)),
            ("coordSelector".to_string(), AttrValue::Int(2)),
        ]
    );
    let mut restored = Locator::path_node(0);
    restored.read_attributes(&AttributeMap::new());
    assert_eq!(restored, Locator::path_node_coord(0, 0));
}

#[test]
fn relative_locator_tracks_moves() {
    let mut d = Drawing::new();
    let id = d.add_shape(Shape::rect(Rect::new(0.0, 0.0, 40.0, 20.0)));
    let loc = Locator::south_east();
    assert_eq!(loc.compute(&d.shape_view(id).unwrap()), Point::new(40.0, 20.0));
    assert!(d.move_shape(id, 5.0, 5.0));
    assert_eq!(loc.compute(&d.shape_view(id).unwrap()), Point::new(45.0, 25.0));
}

proptest! {
    #[test]
    fn in_range_returns_stored_coordinate(n in 1usize..12, idx in 0usize..12, coord in 0i32..3) {
        let s = wave(n);
        let got = Locator::path_node_coord(idx as i32, coord).compute(&s);
        if idx < n {
            let node = s.path_nodes()[idx];
            let want = match coord { 0 => node.main, 1 => node.c1, _ => node.c2 };
            prop_assert_eq!(got, want);
        } else {
            prop_assert_eq!(got, Point::ORIGIN);
        }
    }

    #[test]
    fn attributes_round_trip(index in any::<i32>(), coord in any::<i32>()) {
        let loc = Locator::path_node_coord(index, coord);
        let mut back = Locator::path_node(0);
        back.read_attributes_strict(&to_map(loc.write_attributes())).unwrap();
        prop_assert_eq!(back, loc);
    }

    #[test]
    fn relative_round_trip(rx in -2.0f32..2.0, ry in -2.0f32..2.0) {
        let loc = Locator::relative(rx, ry);
        let mut back = Locator::center();
        back.read_attributes(&to_map(loc.write_attributes()));
        prop_assert_eq!(back, loc);
    }
}
