//! # garagectl Architecture
//!
//! garagectl stands up and administers a single-node [Garage](https://garagehq.deuxfleurs.fr)
//! object store running in Docker. It owns no storage logic of its own: every operation
//! is a pass-through to `docker`, the compose tool, or the `garage` binary inside the
//! container.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Interactive menu, subcommands, colored output            │
//! │  - The ONLY place that knows about stdin/stdout/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade holding runner, workspace and settings       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per operation, returns CmdResult            │
//! │  - File generation (garage.toml, docker-compose.yml)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Process Layer (runtime/, probe.rs)                         │
//! │  - CommandRunner trait: SystemRunner, ScriptedRunner        │
//! │  - Shell probe for running garage inside the container      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Strategy
//!
//! Commands take a `CommandRunner`, so nearly everything is tested against
//! [`runtime::memory::ScriptedRunner`], which records invocations and sleeps instead
//! of performing them. File generation is tested against temporary directories.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Setup, lifecycle, status, bootstrap, buckets, keys, cleanup, settings
//! - [`runtime`]: Process abstraction and docker/compose helpers
//! - [`probe`]: Shell and binary path probing inside the container
//! - [`garage_config`]: The generated `garage.toml`
//! - [`compose`]: The generated compose descriptor
//! - [`secrets`]: Random RPC secret and API tokens
//! - [`settings`]: Persisted tool settings
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod compose;
pub mod error;
pub mod garage_config;
pub mod probe;
pub mod runtime;
pub mod secrets;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_utils;
