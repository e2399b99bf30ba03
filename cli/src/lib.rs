// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! digi driver library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Bootstrap, HTTP surface and CLI commands of the `digi` binary

pub mod bootstrap;
pub mod commands;
pub mod server;
