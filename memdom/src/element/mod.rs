mod id;
mod node;

pub use id::NodeId;
pub use node::{Element, Node};
