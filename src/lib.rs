//! Kindred — a relational AI companion prototype.
//!
//! Kindred simulates a conversational companion without any server-side
//! intelligence: user text is classified against a small set of keyword
//! intents, answered from canned response tables, and everything the
//! companion "remembers" lives in a single local profile. The crate ships
//! the engine cluster as a library plus a documentation-site binary that
//! doubles as the prototype's runtime surface.
//!
//! # Architecture
//!
//! - **Storage**: SQLite in WAL mode, used as a namespaced key → JSON
//!   document store (one document per persisted collection)
//! - **Events**: an in-process publish/subscribe bus connecting the
//!   engines; delivery is synchronous in registration order
//! - **Engines**: conversation turns, guided ritual flows, and an
//!   append-only memory graph, all driving a four-state pixel indicator
//! - **Transport**: an axum HTTP server for the documentation pages,
//!   the decorative memory visualization, and the prototype JSON API
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`storage`] — SQLite-backed local persistence adapter
//! - [`bus`] — Application event bus (publish/subscribe)
//! - [`haptics`] — Haptic cue sink and vibration patterns
//! - [`pixel`] — The four-state pixel indicator
//! - [`conversation`] — Conversation engine: intents, canned responses, typing reveal
//! - [`rituals`] — Guided-practice ritual catalog and step sequencer
//! - [`memory`] — Memory graph builder and node-link rendering
//! - [`settings`] — Persisted user settings and theme output
//! - [`shell`] — Application shell: component wiring and section routing
//! - [`docs`] — Documentation site: markdown rendering, routes, search

pub mod bus;
pub mod config;
pub mod conversation;
pub mod docs;
pub mod haptics;
pub mod memory;
pub mod pixel;
pub mod rituals;
pub mod settings;
pub mod shell;
pub mod storage;
