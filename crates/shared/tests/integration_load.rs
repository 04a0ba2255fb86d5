//! Fan-in loading: the render pipeline runs exactly once, and only when
//! every source arrived intact.

use shared::fixtures;
use shared::harness::ViewerHarness;
use shared::Delivery;

const SOURCES: [&str; 3] = ["rank0.json", "rank1.json", "rank2.json"];

fn payload(rank: u32) -> String {
    let x = rank as f64 * 2.0;
    fixtures::triangle_json(rank, [[x, 0.0], [x + 1.0, 0.0], [x, 1.0]])
}

#[test]
fn test_all_orders_trigger_once() {
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let mut h = ViewerHarness::new("mv");
        h.load_data(&SOURCES).unwrap();
        for (n, &i) in order.iter().enumerate() {
            let d = h.arrive(i, &payload(i as u32));
            if n < 2 {
                assert!(matches!(d, Delivery::Waiting { .. }), "order {order:?}");
            } else {
                assert_eq!(d, Delivery::Ready, "order {order:?}");
            }
        }
        assert_eq!(h.pipeline_runs(), 1, "order {order:?}");

        // Mesh index follows request order, not arrival order.
        let ranks: Vec<_> = h.scene().unwrap().meshes().iter().map(|m| m.rank()).collect();
        assert_eq!(ranks, [0, 1, 2]);

        // Late duplicates do not re-run the pipeline.
        assert_eq!(h.arrive(0, &payload(0)), Delivery::Ignored);
        assert_eq!(h.pipeline_runs(), 1);
    }
}

#[test]
fn test_one_failure_never_triggers() {
    let mut h = ViewerHarness::new("mv");
    h.load_data(&SOURCES).unwrap();

    h.arrive(0, &payload(0));
    assert!(matches!(h.fail(1, "404 Not Found"), Delivery::Failed(_)));
    assert_eq!(h.arrive(2, &payload(2)), Delivery::Ignored);

    assert_eq!(h.pipeline_runs(), 0);
    assert!(h.scene().is_none());
    assert!(h.error().unwrap().contains("404"));
    assert!(h.error().unwrap().contains("rank1.json"));
}

#[test]
fn test_point_mesh_keeps_positive_view_box() {
    let mut h = ViewerHarness::new("mv");
    h.load_data(&["dot.json"]).unwrap();

    let dot = r#"{"rank": 0, "nodes": {"0": {"pos": [1, 1]}}, "zones": {"0": {"nids": [0]}},
                  "bbox": {"min0": 1, "max0": 1, "min1": 1, "max1": 1}}"#;
    assert_eq!(h.arrive(0, dot), Delivery::Ready);

    let fitted = h.view_box().unwrap();
    assert!(fitted.width > 0.0 && fitted.height > 0.0);
    let resized = h.resize(400.0, 300.0).unwrap();
    assert!(resized.width > 0.0 && resized.height > 0.0);
}

#[test]
fn test_duplicate_zone_ids_render_once() {
    let mut h = ViewerHarness::new("mv");
    h.load_data(&["dup.json"]).unwrap();

    let dup = r#"{"rank": 0,
                  "nodes": {"0": {"pos": [0, 0]}, "1": {"pos": [1, 0]}, "2": {"pos": [0, 1]}},
                  "zones": {"5": {"nids": [0, 1]}, "5": {"nids": [0, 1, 2]}},
                  "bbox": {"min0": 0, "max0": 1, "min1": 0, "max1": 1}}"#;
    assert_eq!(h.arrive(0, dup), Delivery::Ready);

    let ids: Vec<_> = h.elements().iter().map(|e| e.dom_id.as_str()).collect();
    assert_eq!(ids, ["mv_z_0_5"]);
}

#[test]
fn test_integrity_failure_names_source() {
    let mut h = ViewerHarness::new("mv");
    h.load_data(&SOURCES).unwrap();

    let broken = r#"{"rank": 1, "nodes": {}, "zones": {"3": {"nids": [0]}},
                     "bbox": {"min0": 0, "max0": 1, "min1": 0, "max1": 1}}"#;
    h.arrive(0, &payload(0));
    match h.arrive(1, broken) {
        Delivery::Failed(msg) => {
            assert!(msg.contains("rank1.json"));
            assert!(msg.contains("missing node"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    h.arrive(2, &payload(2));
    assert_eq!(h.pipeline_runs(), 0);
}

#[test]
fn test_empty_source_list() {
    let mut h = ViewerHarness::new("mv");
    assert!(h.load_data(&[]).is_err());
    assert_eq!(h.pipeline_runs(), 0);
    assert!(h.error().is_some());
}

#[test]
fn test_bundled_sample_data() {
    let mut h = ViewerHarness::new("mv");
    h.load_data(&["data/rank0.json", "data/rank1.json"]).unwrap();
    h.arrive(1, include_str!("../../../data/rank1.json"));
    assert_eq!(
        h.arrive(0, include_str!("../../../data/rank0.json")),
        Delivery::Ready
    );
    assert_eq!(h.elements().len(), 5);

    let vb = h.view_box().unwrap();
    assert_eq!((vb.x, vb.y), (0.0, -2.0));
    assert_eq!(vb.height, 2.0);
}
