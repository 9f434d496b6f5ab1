mod arena;
mod node;
mod node_id;
mod raw_tree;

pub(crate) use raw_tree::RawBTree;
