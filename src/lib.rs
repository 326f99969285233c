//! automerge - branch promotion for CI
//!
//! Runs once per CI event. On push it opens (or reuses) a pull request from
//! the pushed branch into each configured target branch, labels new ones,
//! and merges those carrying the auto-merge label. Review and check-run
//! events can merge existing promotion PRs. Outcomes are relayed to a chat
//! channel.
//!
//! The flow lives in [`promote::Promoter`]; remote calls go through
//! [`platform::PlatformService`] and [`notify::ChatNotifier`] so the flow can
//! be exercised without a network.

pub mod actions;
pub mod config;
pub mod error;
pub mod event;
pub mod notify;
pub mod platform;
pub mod promote;
pub mod types;
