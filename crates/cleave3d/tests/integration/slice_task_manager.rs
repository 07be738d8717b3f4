use cleave3d::dynamics::{PhysicsModel, RigidBodyParams};
use cleave3d::math::{Isometry, Point, Vector};
use cleave3d::mesh::primitives::cuboid_mesh;
use cleave3d::mesh::Model;
use cleave3d::shape::{ColliderType, Plane};
use cleave3d::slicing::{SliceTaskError, SliceTaskManager, SliceTaskManagerConfig};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

fn cube_at(x: f32) -> PhysicsModel {
    let model = Model::from_mesh(cuboid_mesh(&Vector::repeat(0.5), 0)).into_shared();
    PhysicsModel::new(
        model,
        Isometry::translation(x, 0.0, 0.0),
        Vector::repeat(1.0),
        ColliderType::Aabb,
        RigidBodyParams::default(),
    )
}

#[test]
fn every_request_gets_exactly_one_result() {
    const K: usize = 16;
    let mut manager = SliceTaskManager::start(SliceTaskManagerConfig {
        worker_count: 3,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(manager.worker_count(), 3);

    let mut ids = BTreeSet::new();
    for i in 0..K {
        let cube = cube_at(i as f32 * 2.0);
        // Every other plane misses its cube.
        let offset = if i % 2 == 0 { 0.0 } else { 5.0 };
        let plane = Plane::from_point_normal(
            &Point::new(i as f32 * 2.0 + offset, 0.0, 0.0),
            &Vector::x(),
        )
        .unwrap();
        let _ = ids.insert(manager.enqueue_slice(cube.slice_request(plane)).unwrap());
    }
    assert_eq!(ids.len(), K);

    let start = Instant::now();
    let mut results = Vec::new();
    while results.len() < K {
        results.extend(manager.drain_completed_results());
        assert!(start.elapsed() < Duration::from_secs(20));
        std::thread::sleep(Duration::from_millis(1));
    }

    let received: BTreeSet<u64> = results.iter().map(|r| r.request_id).collect();
    assert_eq!(received, ids);
    assert_eq!(results.iter().filter(|r| r.success()).count(), K / 2);
    assert_eq!(manager.pending_task_count(), 0);

    manager.finalize();
    assert!(!manager.is_running());
    assert!(manager.try_get_completed_result().is_none());
    assert_eq!(
        manager.enqueue_slice(cube_at(0.0).slice_request(Plane::new(Vector::x_axis(), 0.0))),
        Err(SliceTaskError::NotRunning)
    );
}
