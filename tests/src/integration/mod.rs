//! # Integration Scenarios
//!
//! Each module wires real subsystem services together. Only the outermost
//! collaborators (content stores, delivery, clock) are in-memory.

pub mod fixtures;

#[cfg(test)]
mod moderation;
#[cfg(test)]
mod persistence;
#[cfg(test)]
mod reports;
#[cfg(test)]
mod runtime;
