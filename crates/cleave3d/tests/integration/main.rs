#[macro_use]
extern crate approx;

mod cube_slice;
mod ear_clipping;
mod rigid_body_sleep;
mod contact_impulses;
mod slice_task_manager;
