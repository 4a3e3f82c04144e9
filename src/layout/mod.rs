mod partition;

pub use partition::{compute_layout, Layout, LayoutConfig, PositionedNode};
