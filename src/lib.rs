//! Bundle-based dotfiles synchronization.
//!
//! A homefiles repository holds one directory per *bundle*: `Default` applies
//! everywhere, `OS-*` bundles apply to matching platforms, and any other
//! bundle is linked on request.  Linking mirrors a bundle into the root tree
//! (usually the home directory) by creating real directories and symlinking
//! files; directories carrying a `.trackeddir` marker are linked as a whole.
//! Every multi-step change is recorded on an undo log and rolled back on
//! failure.
//!
//! The public API is organised into layers:
//!
//! - **[`paths`]**, **[`transaction`]**, **[`tracking`]**: filesystem primitives
//! - **[`bundles`]**: selection, walking, ignore list and persisted state
//! - **[`engine`]**: link, unlink, track, untrack, sync, clone and init
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod bundles;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod git;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod platform;
pub mod tracking;
pub mod transaction;
