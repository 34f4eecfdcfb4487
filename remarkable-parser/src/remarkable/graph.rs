//! Document graph
//!
//!     The structure the assembler builds: maps and lists in an arena, linked by handles, with
//!     a registry of named containers on the side. Sharing and cycles are representable; both
//!     are resolved before the tree leaves the assembler.
//!
//!     - arena: [Graph], [NodeId], [Value], JSON import and export
//!     - registry: named containers and the merge rules for re-registration
//!     - cycles: back-edge removal
//!     - walk: content transforms over the finished tree

pub mod arena;
pub mod cycles;
pub mod registry;
pub mod walk;

pub use arena::{Fields, Graph, Key, Node, NodeId, Value};
pub use cycles::{remove_cycles, Cycle, CyclePolicy};
pub use registry::{combine, Container, Registry, Slot, ROOT_NAME, VALUE_FIELD};
pub use walk::{walk_content, ContentTransform};
