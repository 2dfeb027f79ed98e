use cutkit_core::{find_bbox, flip, mirror, ClipRegion, PathList, Point, Rect};
use proptest::prelude::*;

// Quarter-millimeter grid keeps the reflection arithmetic exact
fn coord() -> impl Strategy<Value = f64> {
    (-4000i32..4000).prop_map(|v| v as f64 * 0.25)
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn path_list() -> impl Strategy<Value = PathList> {
    prop::collection::vec(prop::collection::vec(point(), 1..12), 1..6)
}

proptest! {
    #[test]
    fn mirror_twice_is_identity(paths in path_list()) {
        let once = mirror(&paths).unwrap();
        prop_assert_eq!(mirror(&once).unwrap(), paths);
    }

    #[test]
    fn flip_twice_is_identity(paths in path_list()) {
        let once = flip(&paths).unwrap();
        prop_assert_eq!(flip(&once).unwrap(), paths);
    }

    #[test]
    fn find_bbox_is_idempotent(paths in path_list()) {
        prop_assert_eq!(find_bbox(&paths).unwrap(), find_bbox(&paths).unwrap());
    }

    #[test]
    fn bbox_contains_every_point(paths in path_list()) {
        let bb = find_bbox(&paths).unwrap();
        prop_assert!(bb.min_x <= bb.max_x && bb.min_y <= bb.max_y);
        for p in paths.iter().flatten() {
            prop_assert!(bb.contains(*p));
        }
    }

    #[test]
    fn containing_region_never_clips(paths in path_list()) {
        let bb = find_bbox(&paths).unwrap();
        let mut region = ClipRegion::new(bb);
        for p in paths.iter().flatten() {
            let (clipped, inside) = region.clip(*p);
            prop_assert!(inside);
            prop_assert_eq!(clipped, *p);
        }
        prop_assert_eq!(region.clipped, 0);
    }
}

#[test]
fn test_smaller_region_clips() {
    let paths: PathList = vec![vec![
        Point::new(0.0, 0.0),
        Point::new(4.5, 10.0),
        Point::new(4.5, 20.0),
    ]];
    let bb = find_bbox(&paths).unwrap();
    let mut region = ClipRegion::new(Rect::new(bb.min_x, bb.max_x - 1.0, bb.min_y, bb.max_y));
    for p in paths.iter().flatten() {
        region.clip(*p);
    }
    assert!(region.clipped > 0);
}
