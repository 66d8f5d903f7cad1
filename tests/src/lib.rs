//! # Relay Guard Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for hot-path evaluation
//! └── src/integration/  # Scenarios crossing subsystem boundaries
//!     ├── fixtures.rs       # Shared wiring over in-memory adapters
//!     ├── moderation.rs     # Admin commands → policy decisions
//!     ├── reports.rs        # Reports → moderation queue → bans
//!     ├── persistence.rs    # State and name mappings survive restarts
//!     └── runtime.rs        # Full runtime with notifications
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rg-tests
//! cargo test -p rg-tests integration::moderation
//! cargo bench -p rg-tests
//! ```

#![allow(dead_code)]

pub mod integration;
