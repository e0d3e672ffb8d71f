//! # Review Harness
//!
//! Client-side harness for an AI essay-review backend. It covers the two
//! pieces of the review pipeline with real state-machine and algorithmic
//! content: polling a review resource through its lifecycle, and aligning
//! content-addressed correction annotations back onto the submission text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  GET /review   ┌──────────────┐  done   ┌─────────┐
//! │ backend  │◀──────────────│ ReviewPoller  │────────▶│  align  │
//! │  (REST)  │                │ (state+timer)│         │ (pure)  │
//! └──────────┘                └──────────────┘         └────┬────┘
//!                                                          ▼
//!                                                     Vec<Segment>
//! ```
//!
//! The poller fetches the review record on a fixed cadence until it
//! reaches a terminal state. Once the server reports `done`, the canonical
//! submission text is fetched and merged, and the aligner partitions it
//! into plain and annotated segments for rendering.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration (backend URL, poll cadence) |
//! | [`models`] | Wire types: Submission, Review, Annotation, scores |
//! | [`client`] | REST client with a typed not-found/transport taxonomy |
//! | [`align`] | Pure annotation-alignment algorithm |
//! | [`poll`] | Polling controller: state machine + cancellable timer |
//! | [`display`] | Terminal rendering of aligned segments and scores |

pub mod align;
pub mod client;
pub mod config;
pub mod display;
pub mod models;
pub mod poll;
