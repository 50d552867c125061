//! Deferred section rendering for long single-page layouts.
//!
//! Sections below the fold start as skeleton placeholders. A
//! [`VisibilityObserver`] watches each placeholder against the viewport
//! extended by a root margin; once a placeholder comes near, its
//! [`SectionLoader`] retrieves the section implementation and swaps it in.
//! A page-level [`ReadyGate`] holds the whole page behind a skeleton until
//! the document load event or a fallback timer, whichever comes first.
//!
//! All state is single-threaded. Components must be created inside a
//! `tokio::task::LocalSet` on a current-thread runtime.

pub mod events;
pub mod gate;
pub mod geometry;
pub mod lifecycle;
pub mod loader;
pub mod observer;
pub mod scheduler;
pub mod section;
pub mod skeleton;
pub mod telemetry;

pub use events::{PageEvent, PageEvents};
pub use gate::{GateOptions, GatePhase, LoadGateState, ReadyGate, ReadyTrigger};
pub use geometry::{Length, Rect, RootMargin, Viewport};
pub use lifecycle::{DocumentLifecycle, ReadyState, ResourceKind, ResourceLoad};
pub use loader::{LoadFailure, LoadPhase, SectionLoader, SectionResolver, SectionSlot};
pub use observer::{
    IntersectionEntry, ObserveControl, Observation, ObserverOptions, VisibilityObserver, observe,
};
pub use scheduler::{FrameClock, ScopedTask};
pub use section::{DeferredSection, PageContext, SectionId};
pub use skeleton::{PageSkeleton, Skeleton, SkeletonShape};
pub use telemetry::{PageCounters, Telemetry};
