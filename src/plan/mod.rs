//! The batch planner: turns a list of source chunks (inflate) or one input
//! buffer (deflate) into a bounded list of per-block work descriptors, with
//! admission control against the destination region's remaining space.
//!
//! Planning is single-threaded and allocation-light (one `Vec` of
//! descriptors); the parallel executor in [`crate::executor`] is what
//! actually runs the codec over the plan.

pub mod deflate;
pub mod inflate;
