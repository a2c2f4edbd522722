use std::collections::HashSet;

use tracing::debug;

use crate::config::ArcPlacement;
use crate::graph::{Direction, GraphIndex};
use crate::layout::{ArcPath, Coord, LayoutEngine};
use crate::surface::DrawingSurface;

pub type ArcId = usize;

/// Which way a highlight walk travelled from its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chain {
    Descendants,
    Predecessors,
}

impl Chain {
    pub fn class_name(self, depth: usize) -> String {
        match self {
            Self::Descendants => format!("depth-{depth}"),
            Self::Predecessors => format!("depth-m{depth}"),
        }
    }

    /// Inverse of [`Chain::class_name`].
    pub fn parse_class(class: &str) -> Option<(Chain, usize)> {
        let rest = class.strip_prefix("depth-")?;
        match rest.strip_prefix('m') {
            Some(depth) => depth.parse().ok().map(|depth| (Self::Predecessors, depth)),
            None => rest.parse().ok().map(|depth| (Self::Descendants, depth)),
        }
    }
}

/// Highlight depth per chain; `None` means the element is not highlighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighlightDepths {
    pub descendant: Option<usize>,
    pub predecessor: Option<usize>,
}

impl HighlightDepths {
    pub fn get(&self, chain: Chain) -> Option<usize> {
        match chain {
            Chain::Descendants => self.descendant,
            Chain::Predecessors => self.predecessor,
        }
    }

    pub fn set(&mut self, chain: Chain, depth: Option<usize>) {
        match chain {
            Chain::Descendants => self.descendant = depth,
            Chain::Predecessors => self.predecessor = depth,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.descendant.is_none() && self.predecessor.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Point<H> {
    pub index: usize,
    pub position: f64,
    pub center: Coord,
    pub radius: f64,
    pub arcs_out: Vec<ArcId>,
    pub arcs_in: Vec<ArcId>,
    pub depths: HighlightDepths,
    pub handle: H,
}

impl<H> Point<H> {
    pub fn arcs(&self, chain: Chain) -> &[ArcId] {
        match chain {
            Chain::Descendants => &self.arcs_out,
            Chain::Predecessors => &self.arcs_in,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Arc<H> {
    pub from: usize,
    pub to: usize,
    pub dir: Direction,
    pub path: ArcPath,
    pub depths: HighlightDepths,
    pub handle: H,
}

impl<H> Arc<H> {
    /// The endpoint a walk along `chain` continues from.
    pub fn far_end(&self, chain: Chain) -> usize {
        match chain {
            Chain::Descendants => self.to,
            Chain::Predecessors => self.from,
        }
    }
}

/// Points and arcs of one draw pass. Arcs refer to points by index and
/// points list their incident arcs by index into the arc store.
#[derive(Clone, Debug)]
pub struct Scene<H> {
    points: Vec<Point<H>>,
    arcs: Vec<Arc<H>>,
    drawn_edges: HashSet<(usize, usize)>,
}

impl<H> Default for Scene<H> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            arcs: Vec::new(),
            drawn_edges: HashSet::new(),
        }
    }
}

impl<H: Copy> Scene<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point<H>] {
        &self.points
    }

    pub fn arcs(&self) -> &[Arc<H>] {
        &self.arcs
    }

    pub fn point(&self, index: usize) -> Option<&Point<H>> {
        self.points.get(index)
    }

    pub(crate) fn point_mut(&mut self, index: usize) -> Option<&mut Point<H>> {
        self.points.get_mut(index)
    }

    pub(crate) fn arc_mut(&mut self, id: ArcId) -> Option<&mut Arc<H>> {
        self.arcs.get_mut(id)
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point<H>] {
        &mut self.points
    }

    pub(crate) fn arcs_mut(&mut self) -> &mut [Arc<H>] {
        &mut self.arcs
    }

    pub fn is_drawn(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.drawn_edges.contains(&(from, to))
    }

    /// Point index whose circle contains `at`, nearest first.
    pub fn point_at(&self, at: Coord, slack: f64) -> Option<usize> {
        self.points
            .iter()
            .map(|point| (point.index, point.center.distance(at), point.radius))
            .filter(|(_, distance, radius)| *distance <= radius + slack)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _, _)| index)
    }

    pub fn add_point<S>(
        &mut self,
        surface: &mut S,
        layout: &LayoutEngine,
        index: usize,
        position: f64,
    ) -> usize
    where
        S: DrawingSurface<Handle = H>,
    {
        let center = layout.xy(position);
        let radius = layout.config().radius;
        let handle = surface.create_circle(center, radius);
        surface.add_class(handle, "point");
        surface.add_class(handle, &format!("p{index}"));

        let id = self.points.len();
        self.points.push(Point {
            index,
            position,
            center,
            radius,
            arcs_out: Vec::new(),
            arcs_in: Vec::new(),
            depths: HighlightDepths::default(),
            handle,
        });
        id
    }

    /// Draws the arc `from -> to` and wires it into both endpoints. Returns
    /// `None` without drawing when either point is missing.
    pub fn add_arc<S>(
        &mut self,
        surface: &mut S,
        layout: &LayoutEngine,
        from: usize,
        to: usize,
        dir: Direction,
    ) -> Option<ArcId>
    where
        S: DrawingSurface<Handle = H>,
    {
        let (Some(start), Some(end)) = (self.points.get(from), self.points.get(to)) else {
            return None;
        };
        let path = layout.arc_path(start.position, end.position, dir);
        let handle = surface.create_path(&path);
        surface.add_class(handle, "arc");
        surface.add_class(handle, &format!("arc-p{from}"));
        surface.add_class(handle, &format!("arc-p{to}"));

        let id = self.arcs.len();
        self.arcs.push(Arc {
            from,
            to,
            dir,
            path,
            depths: HighlightDepths::default(),
            handle,
        });
        self.points[from].arcs_out.push(id);
        self.points[to].arcs_in.push(id);
        self.drawn_edges.insert((from, to));
        Some(id)
    }

    /// Draws every arc leaving `index` on side `dir`, skipping edges that
    /// already have an arc. Returns how many arcs were added.
    pub fn draw_arcs_from_point<S>(
        &mut self,
        surface: &mut S,
        layout: &LayoutEngine,
        graph: &GraphIndex,
        index: usize,
        dir: Direction,
    ) -> usize
    where
        S: DrawingSurface<Handle = H>,
    {
        let Some(targets) = graph.adjacency().get(index) else {
            return 0;
        };

        let mut added = 0;
        for target in targets {
            if self.has_edge(index, target.index) {
                continue;
            }
            if self.add_arc(surface, layout, index, target.index, dir).is_some() {
                added += 1;
            }
        }
        added
    }

    /// Full draw pass: clears any previous scene, draws points, then arcs,
    /// then lifts every point above the arcs.
    pub fn draw_all<S>(
        &mut self,
        surface: &mut S,
        layout: &LayoutEngine,
        graph: &GraphIndex,
        placement: ArcPlacement,
    ) where
        S: DrawingSurface<Handle = H>,
    {
        self.teardown(surface);

        for index in 0..graph.len() {
            self.add_point(surface, layout, index, layout.position(index));
        }

        match placement {
            ArcPlacement::Signed => {
                for (from, target) in graph.edges() {
                    if !self.has_edge(from, target.index) {
                        self.add_arc(surface, layout, from, target.index, target.dir);
                    }
                }
            }
            ArcPlacement::Alternating => {
                let dir = Direction::Positive;
                for index in 0..graph.len() {
                    self.draw_arcs_from_point(surface, layout, graph, index, dir);
                    for target in &graph.adjacency()[index] {
                        self.draw_arcs_from_point(surface, layout, graph, target.index, dir.flipped());
                    }
                }
            }
        }

        for point in &self.points {
            surface.raise_to_front(point.handle);
        }

        debug!(
            points = self.points.len(),
            arcs = self.arcs.len(),
            ?placement,
            "scene drawn"
        );
    }

    /// Removes every element of this scene from the surface.
    pub fn teardown<S>(&mut self, surface: &mut S)
    where
        S: DrawingSurface<Handle = H>,
    {
        for arc in self.arcs.drain(..) {
            surface.remove(arc.handle);
        }
        for point in self.points.drain(..) {
            surface.remove(point.handle);
        }
        self.drawn_edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::surface::{RetainedSurface, Shape};

    fn fixture(links: &[Vec<i64>]) -> (GraphIndex, LayoutEngine, RetainedSurface) {
        let graph = GraphIndex::from_signed(links).unwrap();
        let layout = LayoutEngine::new(LayoutConfig::default(), &graph);
        (graph, layout, RetainedSurface::new())
    }

    #[test]
    fn draw_wires_arcs_into_points() {
        let (graph, layout, mut surface) = fixture(&[vec![1, -2], vec![2], vec![]]);
        let mut scene = Scene::new();
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Signed);

        assert_eq!(scene.points().len(), 3);
        assert_eq!(scene.arcs().len(), 3);
        assert_eq!(scene.points()[0].arcs_out, vec![0, 1]);
        assert_eq!(scene.points()[2].arcs_in, vec![1, 2]);
        assert_eq!(scene.arcs()[1].dir, Direction::Negative);
        assert!(surface.has_class(scene.arcs()[1].handle, "arc-p2"));
        assert!(surface.has_class(scene.points()[1].handle, "p1"));
    }

    #[test]
    fn points_stack_above_arcs() {
        let (graph, layout, mut surface) = fixture(&[vec![1], vec![2], vec![]]);
        let mut scene = Scene::new();
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Signed);

        let shapes = surface
            .iter()
            .map(|(_, element)| matches!(element.shape, Shape::Circle))
            .collect::<Vec<_>>();
        assert_eq!(shapes, vec![false, false, true, true, true]);
    }

    #[test]
    fn redraw_does_not_duplicate() {
        let (graph, layout, mut surface) = fixture(&[vec![1], vec![2], vec![]]);
        let mut scene = Scene::new();
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Signed);
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Signed);
        assert_eq!(scene.points().len(), 3);
        assert_eq!(scene.arcs().len(), 2);
        assert_eq!(surface.len(), 5);
    }

    #[test]
    fn arcs_from_point_are_idempotent() {
        let (graph, layout, mut surface) = fixture(&[vec![1, 2], vec![], vec![]]);
        let mut scene = Scene::new();
        for index in 0..3 {
            scene.add_point(&mut surface, &layout, index, layout.position(index));
        }
        assert_eq!(
            scene.draw_arcs_from_point(&mut surface, &layout, &graph, 0, Direction::Positive),
            2
        );
        assert_eq!(
            scene.draw_arcs_from_point(&mut surface, &layout, &graph, 0, Direction::Negative),
            0
        );
        assert_eq!(scene.arcs().len(), 2);
        assert!(scene.arcs().iter().all(|arc| arc.dir == Direction::Positive));
    }

    #[test]
    fn arcs_need_both_points() {
        let (graph, layout, mut surface) = fixture(&[vec![1], vec![]]);
        let mut scene = Scene::new();
        assert_eq!(
            scene.draw_arcs_from_point(&mut surface, &layout, &graph, 0, Direction::Positive),
            0
        );

        scene.add_point(&mut surface, &layout, 0, layout.position(0));
        assert_eq!(
            scene.add_arc(&mut surface, &layout, 0, 1, Direction::Positive),
            None
        );
        assert!(scene.arcs().is_empty());
        assert!(!scene.has_edge(0, 1));
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn alternating_placement_flips_grandchildren() {
        // 0 -> 1 -> 2
        let (graph, layout, mut surface) = fixture(&[vec![1], vec![2], vec![]]);
        let mut scene = Scene::new();
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Alternating);
        let dirs = scene.arcs().iter().map(|arc| (arc.from, arc.dir)).collect::<Vec<_>>();
        assert_eq!(
            dirs,
            vec![(0, Direction::Positive), (1, Direction::Negative)]
        );
    }

    #[test]
    fn depth_classes_round_trip() {
        assert_eq!(Chain::Descendants.class_name(2), "depth-2");
        assert_eq!(Chain::Predecessors.class_name(0), "depth-m0");
        assert_eq!(Chain::parse_class("depth-m3"), Some((Chain::Predecessors, 3)));
        assert_eq!(Chain::parse_class("depth-1"), Some((Chain::Descendants, 1)));
        assert_eq!(Chain::parse_class("point"), None);
    }

    #[test]
    fn finds_point_under_cursor() {
        let (graph, layout, mut surface) = fixture(&[vec![1], vec![]]);
        let mut scene = Scene::new();
        scene.draw_all(&mut surface, &layout, &graph, ArcPlacement::Signed);
        assert_eq!(scene.point_at(Coord::new(61.0, 101.0), 0.0), Some(1));
        assert_eq!(scene.point_at(Coord::new(40.0, 100.0), 0.0), None);
    }
}
