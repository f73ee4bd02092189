//! Test Module
//!
//! Async suites for the event-driven side of the bot. Pure game logic is
//! tested next to its code.
//!
//! ## Test Categories
//! - `turn_tests`: filtering, submission, staleness, throttling and skipping
//! - `dispatcher_tests`: command handling, routing, error boundary, console transport

mod support;

pub mod dispatcher_tests;
