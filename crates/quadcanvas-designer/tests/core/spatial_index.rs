use quadcanvas_core::{Bounds, ObjectId};
use quadcanvas_designer::spatial_index::SpatialIndex;

fn scenario_index() -> SpatialIndex {
    SpatialIndex::new(Bounds::new(0.0, 0.0, 1000.0, 1000.0), 4, 8).unwrap()
}

#[test]
fn test_spatial_index_creation() {
    let index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 16).unwrap();
    let stats = index.stats();
    assert_eq!(stats.total_items, 0);
    assert_eq!(stats.total_nodes, 1);
    assert!(index.is_empty());
    assert_eq!(index.capacity(), 8);
    assert_eq!(index.max_depth(), 16);
}

#[test]
fn test_spatial_index_insert_and_query() {
    let mut index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 16).unwrap();

    index.insert(ObjectId(0), &Bounds::new(0.0, 0.0, 10.0, 10.0));
    index.insert(ObjectId(1), &Bounds::new(5.0, 5.0, 15.0, 15.0));
    index.insert(ObjectId(2), &Bounds::new(50.0, 50.0, 60.0, 60.0));

    let results = index.query(&Bounds::new(7.0, 7.0, 12.0, 12.0));
    assert_eq!(results, vec![ObjectId(0), ObjectId(1)]);
}

#[test]
fn test_spatial_index_query_point() {
    let mut index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 16).unwrap();

    index.insert(ObjectId(0), &Bounds::new(0.0, 0.0, 10.0, 10.0));

    let results = index.query_point(5.0, 5.0);
    assert!(results.contains(&ObjectId(0)));

    // Query far away - outside root bounds shouldn't match
    let results2 = index.query_point(150.0, 150.0);
    assert!(results2.is_empty());
}

#[test]
fn test_boundary_touching_counts_as_intersecting() {
    let mut index = scenario_index();
    index.insert(ObjectId(1), &Bounds::new(100.0, 100.0, 200.0, 200.0));

    assert_eq!(index.query(&Bounds::new(200.0, 200.0, 300.0, 300.0)), vec![ObjectId(1)]);
    assert_eq!(index.query(&Bounds::new(0.0, 0.0, 100.0, 100.0)), vec![ObjectId(1)]);
    assert!(index.query(&Bounds::new(200.5, 0.0, 300.0, 300.0)).is_empty());
    assert_eq!(index.hit_test(200.0, 150.0), Some(ObjectId(1)));
}

#[test]
fn test_out_of_world_boxes_are_dropped() {
    let mut index = scenario_index();
    assert!(!index.insert(ObjectId(1), &Bounds::new(2000.0, 2000.0, 2100.0, 2100.0)));
    assert!(!index.insert(ObjectId(2), &Bounds::new(0.0, 0.0, f64::INFINITY, 10.0)));
    assert!(index.is_empty());
    assert!(!index.contains(ObjectId(1)));
    assert!(index.query(&Bounds::new(-1e9, -1e9, 1e9, 1e9)).is_empty());
    assert_eq!(index.stats().dropped_items, 2);

    // Removing a dropped id is a silent no-op.
    assert!(!index.remove(ObjectId(1)));
    assert_eq!(index.stats().dropped_items, 1);
}

#[test]
fn test_partially_outside_box_is_indexed_at_root() {
    let mut index = scenario_index();
    assert!(index.insert(ObjectId(1), &Bounds::new(-50.0, -50.0, 50.0, 50.0)));
    // Only the part outside the world is queried.
    assert_eq!(index.query(&Bounds::new(-60.0, -60.0, -55.0, -40.0)), vec![ObjectId(1)]);
    assert_eq!(index.hit_test(-10.0, -10.0), Some(ObjectId(1)));
}

#[test]
fn test_subdivision_threshold() {
    let mut index = scenario_index();
    for i in 0..4 {
        let x = i as f64 * 60.0;
        index.insert(ObjectId(i), &Bounds::from_rect(x, x, 10.0, 10.0));
    }
    assert_eq!(index.stats().divided_nodes, 0);

    index.insert(ObjectId(4), &Bounds::from_rect(500.0, 700.0, 10.0, 10.0));
    let stats = index.stats();
    assert_eq!(stats.divided_nodes, 1);
    assert_eq!(stats.total_nodes, 5);
    assert_eq!(stats.total_items, 5);
}

#[test]
fn test_depth_ceiling_with_clustered_boxes() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 1024.0, 1024.0), 2, 4).unwrap();
    for i in 0..200 {
        index.insert(ObjectId(i), &Bounds::from_rect(1.0, 1.0, 1.0, 1.0));
    }
    let stats = index.stats();
    assert!(stats.max_depth_reached <= 4);
    assert_eq!(stats.total_items, 200);
    assert!(stats.max_items_in_node > 2);
    assert_eq!(index.query(&Bounds::new(0.0, 0.0, 10.0, 10.0)).len(), 200);
}

#[test]
fn test_hit_test_prefers_latest_insert() {
    let mut index = scenario_index();
    index.insert(ObjectId(10), &Bounds::new(0.0, 0.0, 100.0, 100.0));
    index.insert(ObjectId(3), &Bounds::new(50.0, 50.0, 150.0, 150.0));

    assert_eq!(index.hit_test(75.0, 75.0), Some(ObjectId(3)));
    assert_eq!(index.hit_test(25.0, 25.0), Some(ObjectId(10)));
    assert_eq!(index.hit_test(500.0, 500.0), None);
}

#[test]
fn test_hit_test_across_tree_levels() {
    let mut index = SpatialIndex::new(Bounds::new(0.0, 0.0, 1000.0, 1000.0), 1, 8).unwrap();
    // A big spanning box stays near the root, small ones go deep.
    index.insert(ObjectId(1), &Bounds::new(10.0, 10.0, 20.0, 20.0));
    index.insert(ObjectId(2), &Bounds::new(0.0, 0.0, 900.0, 900.0));
    index.insert(ObjectId(3), &Bounds::new(12.0, 12.0, 14.0, 14.0));

    assert_eq!(index.hit_test(13.0, 13.0), Some(ObjectId(3)));
    assert_eq!(index.hit_test(18.0, 18.0), Some(ObjectId(2)));
    assert_eq!(
        index.query_point(13.0, 13.0),
        vec![ObjectId(1), ObjectId(2), ObjectId(3)]
    );
}

#[test]
fn test_spatial_index_clear() {
    let mut index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 16).unwrap();

    index.insert(ObjectId(0), &Bounds::new(0.0, 0.0, 10.0, 10.0));
    assert!(!index.query_point(5.0, 5.0).is_empty());

    index.clear();
    assert!(index.query_point(5.0, 5.0).is_empty());
    assert!(index.is_empty());
}

#[test]
fn test_spatial_index_stress() {
    let mut index =
        SpatialIndex::new(Bounds::new(-10000.0, -10000.0, 10000.0, 10000.0), 8, 16).unwrap();

    // Insert 1000 shapes on a 50 x 20 grid
    for i in 0..1000u64 {
        let x = ((i % 50) as f64) * 10.0;
        let y = ((i / 50) as f64) * 10.0;
        index.insert(ObjectId(i), &Bounds::new(x, y, x + 5.0, y + 5.0));
    }

    let stats = index.stats();
    assert_eq!(stats.total_items, 1000);
    assert!(stats.total_nodes > 1);

    // Cells 0..=10 in x and y start inside (0, 0) - (100, 100).
    let results = index.query(&Bounds::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(results.len(), 11 * 11);

    for i in (0..1000u64).step_by(2) {
        assert!(index.remove(ObjectId(i)));
    }
    assert_eq!(index.len(), 500);
    assert_eq!(index.query(&Bounds::new(-1.0, -1.0, 600.0, 600.0)).len(), 500);
}

#[test]
fn test_spatial_index_large_coordinates() {
    let mut index = SpatialIndex::default();

    index.insert(ObjectId(1), &Bounds::new(1000.0, 1000.0, 1010.0, 1010.0));
    let results = index.query_point(1005.0, 1005.0);
    assert!(results.contains(&ObjectId(1)), "Should find item at (1000, 1000)");

    index.insert(ObjectId(2), &Bounds::new(50000.0, -50000.0, 50010.0, -49990.0));
    let results2 = index.query_point(50005.0, -49995.0);
    assert!(results2.contains(&ObjectId(2)), "Should find item at (50000, -50000)");
}

#[test]
fn test_scenario_insert_remove_move() {
    let mut index = scenario_index();
    let boxes = [
        Bounds::from_rect(0.0, 0.0, 50.0, 50.0),
        Bounds::from_rect(60.0, 0.0, 50.0, 50.0),
        Bounds::from_rect(0.0, 60.0, 50.0, 50.0),
        Bounds::from_rect(60.0, 60.0, 50.0, 50.0),
    ];
    for (i, b) in boxes.iter().enumerate() {
        index.insert(ObjectId(i as u64), b);
    }
    assert_eq!(index.stats().divided_nodes, 0);

    index.insert(ObjectId(4), &Bounds::from_rect(120.0, 120.0, 50.0, 50.0));
    assert!(index.stats().divided_nodes >= 1);

    let near_origin = Bounds::from_rect(0.0, 0.0, 400.0, 400.0);
    assert_eq!(index.query(&near_origin).len(), 5);

    index.remove(ObjectId(2));
    assert_eq!(index.query(&near_origin).len(), 4);

    index.update(ObjectId(0), &Bounds::from_rect(900.0, 900.0, 50.0, 50.0));
    let hits = index.query(&near_origin);
    assert_eq!(hits.len(), 3);
    assert!(!hits.contains(&ObjectId(0)));
    assert_eq!(
        index.query(&Bounds::from_rect(800.0, 800.0, 200.0, 200.0)),
        vec![ObjectId(0)]
    );
}

#[test]
fn test_nan_box_is_dropped() {
    let mut index = scenario_index();
    assert!(!index.insert(ObjectId(1), &Bounds::new(f64::NAN, 0.0, 10.0, 10.0)));
    assert!(!index.insert(ObjectId(2), &Bounds::new(0.0, 0.0, 10.0, f64::NAN)));
    assert!(index.is_empty());
    assert_eq!(index.hit_test(5.0, 5.0), None);
    assert_eq!(index.stats().dropped_items, 2);
}

#[test]
fn test_len_tracks_placed_entries() {
    let mut index = scenario_index();
    index.insert(ObjectId(1), &Bounds::from_rect(10.0, 10.0, 10.0, 10.0));
    index.insert(ObjectId(2), &Bounds::from_rect(5000.0, 0.0, 10.0, 10.0));
    assert_eq!(index.len(), 1);

    // Moving the dropped box into the world indexes it.
    index.update(ObjectId(2), &Bounds::from_rect(20.0, 20.0, 10.0, 10.0));
    assert_eq!(index.len(), 2);

    // And back out again.
    index.update(ObjectId(1), &Bounds::from_rect(-5000.0, 0.0, 10.0, 10.0));
    assert_eq!(index.len(), 1);

    // Re-inserting an indexed id is an update.
    index.insert(ObjectId(2), &Bounds::from_rect(30.0, 30.0, 10.0, 10.0));
    assert_eq!(index.len(), 1);

    assert!(!index.remove(ObjectId(1)));
    assert!(index.remove(ObjectId(2)));
    assert!(index.is_empty());

    index.insert(ObjectId(3), &Bounds::from_rect(10.0, 10.0, 10.0, 10.0));
    index.clear();
    assert_eq!(index.len(), 0);
    assert_eq!(index.len(), index.stats().total_items);
}

#[test]
fn test_restore_keeps_old_stamp() {
    let mut index = scenario_index();
    let a = Bounds::from_rect(0.0, 0.0, 100.0, 100.0);
    index.insert(ObjectId(1), &a);
    index.insert(ObjectId(2), &Bounds::from_rect(50.0, 50.0, 100.0, 100.0));

    let stamp = index.order_of(ObjectId(1)).unwrap();
    index.remove(ObjectId(1));
    assert_eq!(index.order_of(ObjectId(1)), None);

    assert!(index.restore(ObjectId(1), &a, stamp));
    assert_eq!(index.len(), 2);
    assert_eq!(index.hit_test(75.0, 75.0), Some(ObjectId(2)));
    assert_eq!(index.query_point(75.0, 75.0), vec![ObjectId(1), ObjectId(2)]);

    // Later inserts still land on top.
    index.insert(ObjectId(3), &Bounds::from_rect(60.0, 60.0, 30.0, 30.0));
    assert_eq!(index.hit_test(75.0, 75.0), Some(ObjectId(3)));
}
