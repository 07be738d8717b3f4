pub use self::split::{PlaneSide, SplitResult};

mod split;
