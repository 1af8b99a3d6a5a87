pub mod action;
pub mod model;
pub mod replay;
pub mod store;
pub mod task;
