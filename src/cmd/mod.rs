//! CLI command implementations.
//!
//! | Module  | Responsibility                                     |
//! |---------|----------------------------------------------------|
//! | `serve` | `--init` data-file setup and the HTTP server       |

pub mod serve;

pub use serve::cmd_serve;
