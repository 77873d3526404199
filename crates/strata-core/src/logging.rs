//! Logging facilities for Strata.
//!
//! Strata uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("strata::drag_drop=warn,strata::section=trace")
//!         .init();
//! }
//! ```
//!
//! Every event carries one of the [`targets`] below so subsystems can be
//! filtered independently. Severity follows a fixed convention:
//!
//! | Level   | Used for                                                   |
//! |---------|------------------------------------------------------------|
//! | `trace` | identity misses, signal emission, task execution           |
//! | `debug` | host creation and discard, deferred selection writes       |
//! | `warn`  | recovered programmer errors such as duplicate identifiers  |

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Section identity resolution and event forwarding.
    pub const SECTION: &str = "strata::section";
    /// Content host creation, reuse and type checks.
    pub const HOST: &str = "strata::host";
    /// Drag payloads and data-binding mutation.
    pub const DRAG_DROP: &str = "strata::drag_drop";
    /// Owner-thread run loop.
    pub const RUN_LOOP: &str = "strata_core::run_loop";
    /// Signal/slot system.
    pub const SIGNAL: &str = "strata_core::signal";
}

/// Span names used for turn-level tracing.
pub mod span_names {
    /// One turn of the owner-thread run loop.
    pub const RUN_LOOP_TURN: &str = "strata_core::run_loop::turn";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::SECTION,
            targets::HOST,
            targets::DRAG_DROP,
            targets::RUN_LOOP,
            targets::SIGNAL,
        ] {
            assert!(target.starts_with("strata"), "{target}");
            assert!(target.contains("::"), "{target}");
        }
    }
}
