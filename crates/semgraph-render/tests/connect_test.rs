use semgraph_core::Side;
use semgraph_render::geom::point;
use semgraph_render::{Error, NodeBox, resolve_sides, select_sides};

fn rect(x: f64, y: f64) -> NodeBox {
    NodeBox::new(point(x, y), 1.2, 0.8)
}

fn dist(a: &NodeBox, sa: Side, b: &NodeBox, sb: Side) -> f64 {
    (b.anchor(sb) - a.anchor(sa)).length()
}

#[test]
fn side_by_side_nodes_connect_right_to_left() {
    let x = rect(2.0, 2.0);
    let y = rect(4.0, 2.0);
    assert_eq!(select_sides(&x, &y, None).unwrap(), (Side::Right, Side::Left));
    assert_eq!(select_sides(&y, &x, None).unwrap(), (Side::Left, Side::Right));
}

#[test]
fn stacked_nodes_connect_bottom_to_top() {
    let f = rect(2.0, 4.0);
    let x = rect(2.0, 2.0);
    assert_eq!(select_sides(&f, &x, None).unwrap(), (Side::Bottom, Side::Top));
    assert_eq!(select_sides(&x, &f, None).unwrap(), (Side::Top, Side::Bottom));
}

#[test]
fn nearest_rule_picks_a_minimum_distance_pair() {
    let from = rect(0.0, 0.0);
    let targets = [
        (3.0, 1.0),
        (-2.5, 4.0),
        (0.3, -3.0),
        (-1.0, -1.0),
        (5.0, 5.0),
        (0.0, 0.9),
    ];
    for (x, y) in targets {
        let to = rect(x, y);
        let (fs, ts) = select_sides(&from, &to, None).unwrap();
        let best = Side::ALL
            .iter()
            .flat_map(|&a| Side::ALL.iter().map(move |&b| (a, b)))
            .map(|(a, b)| dist(&from, a, &to, b))
            .fold(f64::INFINITY, f64::min);
        assert!(
            (dist(&from, fs, &to, ts) - best).abs() < 1e-12,
            "({x}, {y}) picked {fs}/{ts}"
        );
    }
}

#[test]
fn nearest_rule_breaks_ties_in_side_order() {
    // Square boxes on a diagonal: top/left and right/bottom style pairs tie.
    let a = NodeBox::new(point(0.0, 0.0), 1.0, 1.0);
    let b = NodeBox::new(point(2.0, 2.0), 1.0, 1.0);
    let first = select_sides(&a, &b, None).unwrap();
    assert_eq!(first, (Side::Top, Side::Left));
    for _ in 0..5 {
        assert_eq!(select_sides(&a, &b, None).unwrap(), first);
    }
}

#[test]
fn angle_rule_splits_on_half_angle() {
    let from = rect(0.0, 0.0);
    // 30 degrees off vertical.
    let steep = rect(30f64.to_radians().tan() * 2.0, 2.0);
    assert_eq!(
        select_sides(&from, &steep, Some(90.0)).unwrap(),
        (Side::Top, Side::Bottom)
    );
    assert_eq!(
        select_sides(&from, &steep, Some(40.0)).unwrap(),
        (Side::Right, Side::Left)
    );

    let below_left = rect(-3.0, -1.0);
    assert_eq!(
        select_sides(&from, &below_left, Some(90.0)).unwrap(),
        (Side::Left, Side::Right)
    );
    let below = rect(-0.5, -3.0);
    assert_eq!(
        select_sides(&from, &below, Some(90.0)).unwrap(),
        (Side::Bottom, Side::Top)
    );
}

#[test]
fn angle_180_is_always_vertical() {
    let from = rect(0.0, 0.0);
    for (x, y) in [(5.0, 0.1), (-5.0, 0.1), (3.0, -0.2), (4.0, 0.0)] {
        let (fs, ts) = select_sides(&from, &rect(x, y), Some(180.0)).unwrap();
        assert!(matches!(fs, Side::Top | Side::Bottom), "({x}, {y})");
        assert!(matches!(ts, Side::Top | Side::Bottom), "({x}, {y})");
    }
}

#[test]
fn angle_0_is_vertical_only_when_aligned() {
    let from = rect(0.0, 0.0);
    assert_eq!(
        select_sides(&from, &rect(0.0, 3.0), Some(0.0)).unwrap(),
        (Side::Top, Side::Bottom)
    );
    assert_eq!(
        select_sides(&from, &rect(0.01, 3.0), Some(0.0)).unwrap(),
        (Side::Right, Side::Left)
    );
}

#[test]
fn coincident_centers_fall_back_to_top() {
    let a = rect(1.0, 1.0);
    assert_eq!(select_sides(&a, &a, None).unwrap(), (Side::Top, Side::Top));
    assert_eq!(select_sides(&a, &a, Some(45.0)).unwrap(), (Side::Top, Side::Top));
    assert_eq!(
        resolve_sides(&a, &a, None, Some(Side::Left), None).unwrap(),
        (Side::Left, Side::Top)
    );
}

#[test]
fn out_of_range_angles_are_rejected() {
    let a = rect(0.0, 0.0);
    let b = rect(1.0, 1.0);
    for angle in [-1.0, 180.5, f64::NAN] {
        let err = select_sides(&a, &b, Some(angle)).unwrap_err();
        assert!(matches!(err, Error::InvalidAngle { .. }), "{angle}");
    }
}

#[test]
fn fixed_sides_are_kept_and_the_rest_is_searched() {
    let x = rect(2.0, 2.0);
    let y = rect(4.0, 2.0);
    assert_eq!(
        resolve_sides(&x, &y, None, Some(Side::Top), Some(Side::Top)).unwrap(),
        (Side::Top, Side::Top)
    );
    // Leaving from the bottom, the closest entry to y is still its left side.
    assert_eq!(
        resolve_sides(&x, &y, None, Some(Side::Bottom), None).unwrap(),
        (Side::Bottom, Side::Left)
    );
    assert_eq!(
        resolve_sides(&x, &y, Some(90.0), None, Some(Side::Bottom)).unwrap(),
        (Side::Right, Side::Bottom)
    );
}
