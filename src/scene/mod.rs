//! The driving caller of the slicing pipeline: a pool of sliceable props.

pub use self::prop_manager::{
    cutting_plane_from_swing, FrameReport, Prop, PropError, PropHandle, PropManager, SlicedProp,
};

mod prop_manager;
