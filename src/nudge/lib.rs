//! # Nudge Architecture
//!
//! Nudge is a small local reminder manager. Every reminder has a priority, and
//! the priority decides how often a repeating host notification fires for it.
//! Reminders are dismissed by marking them done, with a short window to undo.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders lists, runs the undo prompt    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves selectors (positions, id prefixes) → ids        │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Lifecycle Layer (lifecycle.rs, schedule.rs, notify.rs)     │
//! │  - Filtering, sorting, add flow, mark-done / undo           │
//! │  - Deferred deletes on an injectable clock                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ReminderStore over a KvBackend trait                     │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI takes plain Rust values and returns plain Rust
//! types. Nothing there prints or exits; diagnostics go through `tracing`.
//!
//! ## Testing Strategy
//!
//! 1. **Store and lifecycle**: unit tests against `MemBackend`, `MemNotifier`
//!    and `ManualClock`, so grace periods elapse without sleeping.
//! 2. **API**: selector resolution and result shaping.
//! 3. **CLI**: end-to-end runs of the binary against a temporary data dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`lifecycle`]: Reminder controller (view modes, add, mark done, undo)
//! - [`schedule`]: Deferred tasks and clocks
//! - [`notify`]: Host notification abstraction
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `Reminder` and `Priority`
//! - [`index`]: Selectors
//! - [`config`]: Configuration
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod schedule;
pub mod store;
