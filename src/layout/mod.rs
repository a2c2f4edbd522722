mod sort;

pub use sort::{SortStrategy, by_generation, depth_zero_first};

use std::fmt;

use crate::config::{LayoutConfig, Orientation};
use crate::graph::{Direction, GraphIndex};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A symmetric cubic bow between two points on the axis. Both control points
/// share the same off-axis coordinate, the arc height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPath {
    pub start: Coord,
    pub control_start: Coord,
    pub control_end: Coord,
    pub end: Coord,
}

impl ArcPath {
    /// Evaluates the curve at `t` in `0..=1`.
    pub fn sample(&self, t: f64) -> Coord {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Coord::new(
            a * self.start.x + b * self.control_start.x + c * self.control_end.x + d * self.end.x,
            a * self.start.y + b * self.control_start.y + c * self.control_end.y + d * self.end.y,
        )
    }

    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{} {} C{} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.control_start.x,
            self.control_start.y,
            self.control_end.x,
            self.control_end.y,
            self.end.x,
            self.end.y
        )
    }
}

/// Linear placement of nodes along one axis plus the arc curvature model.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEngine {
    config: LayoutConfig,
    node_count: usize,
    max_arc_length: f64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, graph: &GraphIndex) -> Self {
        let span = graph.max_span();
        // Without any non-zero span the first arc would divide by zero.
        let max_arc_length = if span == 0 {
            config.space
        } else {
            span as f64 * config.space
        };

        Self {
            config,
            node_count: graph.len(),
            max_arc_length,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn max_arc_length(&self) -> f64 {
        self.max_arc_length
    }

    pub fn position(&self, index: usize) -> f64 {
        self.config.padding + index as f64 * self.config.space
    }

    pub fn positions(&self) -> Vec<f64> {
        (0..self.node_count).map(|index| self.position(index)).collect()
    }

    pub fn xy(&self, pos: f64) -> Coord {
        match self.config.orientation {
            Orientation::Horizontal => Coord::new(pos, self.config.axis_pos),
            Orientation::Vertical => Coord::new(self.config.axis_pos, pos),
        }
    }

    /// Extent along the axis: every slot plus padding on both ends.
    pub fn axis_length(&self) -> f64 {
        let slots = self.node_count.saturating_sub(1) as f64;
        self.config.space * slots + 2.0 * self.config.padding
    }

    /// `(width, height)` of the drawing area.
    pub fn canvas_size(&self) -> (f64, f64) {
        match self.config.orientation {
            Orientation::Horizontal => (self.axis_length(), self.config.size),
            Orientation::Vertical => (self.config.size, self.axis_length()),
        }
    }

    pub fn arc_height(&self, pos_a: f64, pos_b: f64, dir: Direction) -> f64 {
        let relative = (pos_b - pos_a).abs() / self.max_arc_length;
        let height = relative.powf(self.config.lambda) * self.config.max_arc_height;
        self.config.axis_pos + dir.sign() * height
    }

    pub fn arc_path(&self, pos_a: f64, pos_b: f64, dir: Direction) -> ArcPath {
        let height = self.arc_height(pos_a, pos_b, dir);
        // Start and end sit just off the point so the stroke does not cross it.
        let edge = self.config.axis_pos + dir.sign() * self.config.radius / 2.0;

        match self.config.orientation {
            Orientation::Horizontal => ArcPath {
                start: Coord::new(pos_a, edge),
                control_start: Coord::new(pos_a, height),
                control_end: Coord::new(pos_b, height),
                end: Coord::new(pos_b, edge),
            },
            Orientation::Vertical => ArcPath {
                start: Coord::new(edge, pos_a),
                control_start: Coord::new(height, pos_a),
                control_end: Coord::new(height, pos_b),
                end: Coord::new(edge, pos_b),
            },
        }
    }

    /// Where a tooltip for the point at `pos` goes: pushed off the axis by the
    /// maximum arc height so it clears every curve on the positive side.
    pub fn tooltip_anchor(&self, pos: f64) -> Coord {
        let offset = self.config.axis_pos + self.config.max_arc_height;
        match self.config.orientation {
            Orientation::Horizontal => Coord::new(pos, offset),
            Orientation::Vertical => Coord::new(offset, pos),
        }
    }
}
