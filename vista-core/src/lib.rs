//! Vista Core - view-driven interaction engine
//!
//! Platform-independent logic behind two page effects: revealing elements
//! the first time they scroll into view, and tilting elements toward the
//! pointer while hovered. Hosts own the elements and feed in visibility and
//! pointer events; the engine decides what changes and hands the result back.

pub mod config;
pub mod focus;
pub mod geometry;
pub mod margin;
pub mod reveal;
pub mod tilt;
pub mod trace;
pub mod transform;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, RevealConfig, TiltConfig};
pub use focus::FocusIndex;
pub use geometry::{intersection_ratio, Insets, Point, Rect};
pub use margin::{parse_root_margin, MarginParseError};
pub use reveal::{GeometryObserver, RevealTracker, VisibilityEntry, VisibilityObserver, WatchedElement};
pub use tilt::{compute_tilt, TiltInteractor, TiltState, TiltTarget};
pub use trace::{RevealCause, SlotId, TiltSkip, TraceSink};
pub use transform::{Rotation, TiltTransform};
