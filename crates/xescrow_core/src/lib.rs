//! Xescrow Core
//!
//! Foundational primitives shared by the landing intro crates:
//!
//! - **Layer types**: sizes, vectors, colors, shadows and gradients
//! - **Reactive Signals**: a small signal graph with typed subscribers
//! - **State**: thread-safe handles over a shared graph, the component state API
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use xescrow_core::{ReactiveGraph, State};
//!
//! let graph = Arc::new(Mutex::new(ReactiveGraph::new()));
//! let open = State::create(&graph, false);
//!
//! open.update_rebuild(|v| !v);
//! assert!(open.get());
//! ```

pub mod layer;
pub mod reactive;

pub use layer::{Color, Gradient, GradientStop, Shadow, Size, Vec2};
pub use reactive::{
    DirtyFlag, Pending, ReactiveGraph, SharedReactiveGraph, Signal, SignalId, State, SubscriberId,
    Subscription,
};
