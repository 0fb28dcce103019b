//! Common utilities and types used throughout the co-simulation harness.
//!
//! This module provides the building blocks shared by every other component:
//! 1. **Address Decoding:** Splitting bus addresses into device selector and local offset.
//! 2. **Constants:** The device address map, memory window and halt sentinel.
//! 3. **Error Handling:** The fatal configuration error taxonomy.
//! 4. **Signals:** Clock and sync levels with a pure edge-transition function.

/// Bus address decoding (selector / local offset).
pub mod addr;

/// Common constants used throughout the harness.
pub mod constants;

/// Error types for configuration and startup failures.
pub mod error;

/// Signal levels and edge detection.
pub mod signal;

pub use addr::BusAddr;
pub use error::{HarnessError, Result};
pub use signal::{Edge, EdgeDetector, Level};
