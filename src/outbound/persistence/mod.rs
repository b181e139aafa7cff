//! In-memory job repository adapter.
//!
//! The document store is an external collaborator with a simple contract,
//! so the only adapter shipped here keeps records in a process-local map
//! behind a read-write lock. Each operation takes the lock once, which
//! gives the single-record atomicity the concurrency model asks for;
//! concurrent updates to the same record are last-write-wins.

mod memory;

pub use memory::InMemoryJobRepository;
