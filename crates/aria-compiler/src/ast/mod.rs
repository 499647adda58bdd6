pub mod nodes;
pub mod visitor;

pub use nodes::*;
pub use visitor::MutVisitor;
