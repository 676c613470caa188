pub mod delta_ops;
pub mod suggest;
pub mod tracker;
