//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Request tracing middleware re-exported for app assembly.
pub use middleware::trace::Trace;
