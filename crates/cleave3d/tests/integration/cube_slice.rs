use cleave3d::math::{Point, Real, Vector};
use cleave3d::mesh::primitives::{cuboid_mesh, uv_sphere_mesh};
use cleave3d::mesh::Model;
use cleave3d::shape::Plane;
use cleave3d::slicing::{SliceError, SliceOptions, Slicer};

fn unit_cube() -> Model {
    Model::from_mesh(cuboid_mesh(&Vector::repeat(1.0), 0))
}

#[test]
fn cube_cut_through_its_center_gives_two_closed_halves() {
    let plane = Plane::from_point_normal(&Point::origin(), &Vector::y()).unwrap();
    let output = Slicer::default().slice_cpu_only(&unit_cube(), &plane).unwrap();

    assert_eq!(output.loops.len(), 1);
    assert!(!output.loops[0].forced_closed);
    // The cross-section of a cube is a square, whatever the face triangulation.
    assert_eq!(output.loops[0].len(), 4);
    for pt in &output.loops[0].points {
        assert_relative_eq!(pt.y, 0.0, epsilon = 1.0e-5);
    }

    let cap = output.back.last().unwrap();
    assert_eq!(cap.triangle_count(), 2);
    for v in &cap.vertices {
        assert_relative_eq!(v.position.y, 0.0, epsilon = 1.0e-5);
        assert!(v.position.x.abs() <= 1.0 + 1.0e-5);
        assert!(v.position.z.abs() <= 1.0 + 1.0e-5);
    }

    let (front, back) = output.into_models();
    assert_relative_eq!(front.volume(), 4.0, epsilon = 1.0e-4);
    assert_relative_eq!(back.volume(), 4.0, epsilon = 1.0e-4);
    assert!(front.local_aabb.mins.y >= -1.0e-5);
    assert!(back.local_aabb.maxs.y <= 1.0e-5);

    for mesh in front.meshes.iter().chain(back.meshes.iter()) {
        assert_eq!(mesh.validate(), Ok(()));
    }
}

#[test]
fn oblique_cuts_conserve_volume() {
    let sphere = Model::from_mesh(uv_sphere_mesh(1.0, 32, 16, 0));
    let total = sphere.volume();
    let mut rng = oorandom::Rand32::new(7);
    let slicer = Slicer::new(SliceOptions::default());

    for _ in 0..20 {
        let dir = Vector::new(
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
        );
        let offset = (rng.rand_float() - 0.5) as Real;
        let plane = match Plane::from_point_normal(&Point::from(dir * offset), &dir) {
            Some(plane) => plane,
            None => continue,
        };

        let (front, back) = slicer.slice_cpu_only(&sphere, &plane).unwrap().into_models();
        assert_relative_eq!(front.volume() + back.volume(), total, epsilon = 1.0e-3);
    }
}

#[test]
fn planes_missing_the_model_are_rejected() {
    let plane = Plane::from_point_normal(&Point::new(0.0, 3.0, 0.0), &Vector::y()).unwrap();
    let err = Slicer::default().slice_cpu_only(&unit_cube(), &plane).unwrap_err();
    assert!(matches!(err, SliceError::NotCrossed { .. }));

    let empty = Model::new(Vec::new());
    assert_eq!(
        Slicer::default().slice_cpu_only(&empty, &plane).unwrap_err(),
        SliceError::EmptyModel
    );
}
