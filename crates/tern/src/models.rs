//! The objects passed around by the bridge: conversation messages and the
//! tool-call request/result types that cross the dispatcher boundary.
//!
//! The Anthropic wire format and the dispatcher envelope both overlap with
//! these but neither is used directly; provider and server code convert at
//! the edges so the rest of the crate works with one set of structs.
pub mod message;
pub mod role;
pub mod tool;
pub mod web;
