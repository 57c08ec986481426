// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Thud integration tests.
//!
//! Provides module test doubles and fixtures for fast, deterministic tests
//! that never load foreign code.
//!
//! # Components
//!
//! - [`EchoComponent`] / [`CountingComponent`] - components with known output
//! - [`RecordingHandler`] - appends to a shared [`CallLog`] on every call
//! - [`FailingHandler`] / [`PanickingHandler`] - handlers that always fail
//! - [`fixtures`] - descriptor graphs and manifest directories

pub mod fixtures;
pub mod mock_component;
pub mod mock_handler;

pub use mock_component::{CountingComponent, EchoComponent};
pub use mock_handler::{CallLog, FailingHandler, PanickingHandler, RecordingHandler};
