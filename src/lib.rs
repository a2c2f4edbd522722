//! Thread arc diagrams: nodes on a line, linked by arcs whose height grows
//! with the distance they span.
//!
//! The crate covers the analysis and layout core: topological depths,
//! orderings, arc geometry, depth-tagged highlighting and hover/tooltip
//! state. Painting goes through the [`DrawingSurface`] trait; the bundled
//! [`RetainedSurface`] keeps elements in memory and can export SVG.

pub mod config;
pub mod diagram;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod layout;
pub mod scene;
pub mod surface;
pub mod timer;
pub mod tooltip;

pub use config::{ArcPlacement, LayoutConfig, Orientation, ThreadArcsOptions};
pub use diagram::{ThreadArcs, TooltipFormatter};
pub use error::{Result, ThreadArcsError};
pub use graph::{Adjacency, ArcTarget, Direction, GraphIndex, compute_depths, invert};
pub use highlight::HighlightController;
pub use layout::{ArcPath, Coord, LayoutEngine, SortStrategy};
pub use scene::{Chain, HighlightDepths, Scene};
pub use surface::{
    Animation, AttrValue, DrawingSurface, Easing, Element, ElementId, RetainedSurface, Shape,
};
pub use tooltip::{TooltipController, TooltipPhase, TooltipState};
