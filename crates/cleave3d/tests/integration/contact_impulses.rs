use cleave3d::dynamics::{resolve_contact, solve_collision, RigidBody, RigidBodyParams, StaticMaterial};
use cleave3d::math::{Isometry, Point, Real, Rotation, Vector};
use cleave3d::query;
use cleave3d::shape::Collider;

fn body(collider: Collider, x: Real, mass: Real, vx: Real) -> RigidBody {
    let mut body = RigidBody::new(
        Isometry::translation(x, 0.0, 0.0),
        collider,
        RigidBodyParams {
            mass,
            use_gravity: false,
            ..Default::default()
        },
    );
    body.set_linvel(Vector::new(vx, 0.0, 0.0));
    body
}

#[test]
fn normal_impulses_are_equal_and_opposite() {
    let mut rng = oorandom::Rand32::new(11);

    for _ in 0..50 {
        let ma = 0.5 + rng.rand_float() * 5.0;
        let mb = 0.5 + rng.rand_float() * 5.0;
        let mut a = body(Collider::sphere(Point::origin(), 0.5), -0.4, ma, 1.0 + rng.rand_float());
        let mut b = body(
            Collider::obb(Point::origin(), Vector::repeat(0.5), Rotation::identity()),
            0.5,
            mb,
            -rng.rand_float(),
        );

        let momentum = a.linvel() * a.mass() + b.linvel() * b.mass();
        let hit = solve_collision(&mut a, &mut b).unwrap();
        let after = a.linvel() * a.mass() + b.linvel() * b.mass();

        assert_relative_eq!(after, momentum, epsilon = 1.0e-3);
        assert!((a.linvel() - b.linvel()).dot(&hit.normal) >= -1.0e-4);
    }
}

#[test]
fn contact_against_static_geometry_only_moves_the_body() {
    let wall = Collider::aabb(Point::new(0.0, -5.0, -5.0), Point::new(1.0, 5.0, 5.0));
    let mut a = body(Collider::sphere(Point::origin(), 0.5), -0.45, 1.0, 2.0);
    let hit = query::detect(a.world_collider(), &wall).unwrap();
    assert!(hit.normal.x < -0.99);

    let material = StaticMaterial {
        restitution: 0.5,
        friction: 0.0,
    };
    let impulse = resolve_contact(&mut a, None, &hit, &material);
    assert!(impulse.normal > 0.0);
    assert!(a.linvel().x < 0.0);
    assert!(a.position().translation.x < -0.45);
}
