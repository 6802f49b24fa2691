//! # sensornode-domain
//!
//! Pure domain model for the sensor node command engine.
//!
//! ## Responsibilities
//! - Define **Commands** (type tag + optional typed argument) and their
//!   **Execution Results**
//! - Define the **Device Configuration** aggregate, its persistence keys and
//!   raw stored values
//! - Define the **Records** held in the node's append-only buffers
//! - Define the **Response Items** handlers append to a response
//! - Foundational types: addresses, alarm thresholds, RTC time, errors
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod address;
pub mod alarm;
pub mod command;
pub mod config;
pub mod device;
pub mod record;
pub mod response;
pub mod version;
