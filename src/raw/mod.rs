mod arena;
mod balance;
mod handle;
mod node;
mod raw_oslist;
mod size;

pub use arena::Arena;
pub use handle::Handle;
pub use node::Node;
pub(crate) use raw_oslist::RawOSList;
