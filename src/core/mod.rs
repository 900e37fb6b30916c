pub mod unit;

pub use unit::{DependencyRef, NodeId, SourceTarget, UnitNode};
