//! Member Registry - membership groups, members and subscription plans
//!
//! This crate keeps member groups with their members and time-bounded
//! subscriptions, drives the activation state machine, and serves the
//! member listings: a simple page-numbered company listing and an
//! advanced listing driven by a configurable filter registry.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
