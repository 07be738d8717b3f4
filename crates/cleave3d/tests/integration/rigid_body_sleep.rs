use cleave3d::dynamics::consts::SLEEP_TIME_THRESHOLD;
use cleave3d::dynamics::{RigidBody, RigidBodyParams, StaticWorld};
use cleave3d::math::{Isometry, Point, Real, Rotation, Vector};
use cleave3d::shape::Collider;

const DT: Real = 1.0 / 60.0;

fn floating_box() -> RigidBody {
    RigidBody::new(
        Isometry::translation(0.0, 1.0, 0.0),
        Collider::obb(
            Point::origin(),
            Vector::repeat(0.5),
            Rotation::identity(),
        ),
        RigidBodyParams {
            use_gravity: false,
            ..Default::default()
        },
    )
}

#[test]
fn resting_bodies_fall_asleep_after_the_threshold() {
    let mut body = floating_box();
    let steps = (SLEEP_TIME_THRESHOLD / DT).ceil() as usize;

    for _ in 0..steps - 2 {
        body.integrate(DT);
    }
    assert!(!body.is_sleeping());

    for _ in 0..4 {
        body.integrate(DT);
    }
    assert!(body.is_sleeping());
}

#[test]
fn impulses_wake_sleeping_bodies() {
    let mut body = floating_box();
    body.sleep();
    let before = *body.position();

    body.integrate(DT);
    assert_eq!(*body.position(), before);

    body.apply_impulse(Vector::new(2.0, 0.0, 0.0));
    assert!(!body.is_sleeping());
    body.integrate(DT);
    assert!(body.position().translation.x > before.translation.x);
}

#[test]
fn falling_box_settles_on_the_ground() {
    let world = StaticWorld::with_ground(0.0, 10.0);
    let mut body = floating_box();
    body.set_params(RigidBodyParams::default());
    body.set_position(Isometry::translation(0.0, 3.0, 0.0));

    for _ in 0..900 {
        body.integrate(DT);
        let _ = world.solve(&mut body);
    }

    assert!(body.is_sleeping());
    let y = body.position().translation.y;
    assert!(y > 0.4 && y < 0.55, "{}", y);
}
