//! Broken-promise issue board back-end.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)      │
//! │ (ui/*.js)│ <─────── │    └─ api.rs  (route handlers, AppState)     │
//! └──────────┘   JSON   │         │                                    │
//!                       │         │ StoreHandle::call()                │
//!                       │         v                                    │
//!                       │  store.rs  (IssueStore, whole-file JSON)     │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! | Module     | Responsibility                                          |
//! |------------|---------------------------------------------------------|
//! | `models`   | `Issue`, `IssueStatus`, request payloads, `Summary`     |
//! | `store`    | load/save of `{ "issues": [...] }`, id assignment       |
//! | `api`      | `/api/issues` CRUD handlers and `ApiError`              |
//! | `embedded` | Statically embeds the browser client (`rust-embed`)     |
//! | `server`   | Router assembly, SPA fallback, listener and shutdown    |
//!
//! ## Request Flow (update an issue)
//!
//! 1. `PUT /api/issues/{id}` → `api::update_issue()`
//! 2. The handler hands an owned closure to `StoreHandle::call()`, which runs
//!    it on the blocking pool.
//! 3. `IssueStore::update()` reads the whole file, overlays the patch on the
//!    matching record (the id is never touched) and rewrites the file.
//! 4. The updated record goes back as JSON; a missing id becomes a 404.

pub mod api;
pub mod embedded;
pub mod models;
pub mod server;
pub mod store;
