use tracing::warn;

use crate::scene::{Chain, HighlightDepths, Scene};
use crate::surface::DrawingSurface;

/// Walks `chain` away from `origin`, tagging each arc and the point at its
/// far end with the distance from the origin. A tag is only replaced by a
/// strictly smaller one, and the walk only continues past arcs it improved.
pub(super) fn tag_chain<S: DrawingSurface>(
    scene: &mut Scene<S::Handle>,
    surface: &mut S,
    origin: usize,
    chain: Chain,
) {
    // No simple path is longer than the arc count.
    let bound = scene.arcs().len();
    let mut stack = vec![(origin, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if depth > bound {
            warn!(origin, node, depth, ?chain, "highlight walk exceeded arc count, graph has a cycle");
            continue;
        }

        let Some(point) = scene.point(node) else {
            continue;
        };
        let arc_ids = point.arcs(chain).to_vec();

        for arc_id in arc_ids {
            let Some(arc) = scene.arc_mut(arc_id) else {
                continue;
            };
            if improves(&arc.depths, chain, depth) {
                retag(surface, arc.handle, &mut arc.depths, chain, depth);
            } else {
                continue;
            }

            let next = arc.far_end(chain);
            if let Some(point) = scene.point_mut(next)
                && improves(&point.depths, chain, depth)
            {
                retag(surface, point.handle, &mut point.depths, chain, depth);
            }
            stack.push((next, depth + 1));
        }
    }
}

/// Drops every depth tag and the focal `highlight` class.
pub(super) fn clear_all<S: DrawingSurface>(scene: &mut Scene<S::Handle>, surface: &mut S) {
    for arc in scene.arcs_mut() {
        clear(surface, arc.handle, &mut arc.depths);
    }
    for point in scene.points_mut() {
        surface.remove_class(point.handle, "highlight");
        clear(surface, point.handle, &mut point.depths);
    }
}

fn improves(depths: &HighlightDepths, chain: Chain, depth: usize) -> bool {
    depths.get(chain).is_none_or(|current| depth < current)
}

fn retag<S: DrawingSurface>(
    surface: &mut S,
    handle: S::Handle,
    depths: &mut HighlightDepths,
    chain: Chain,
    depth: usize,
) {
    if let Some(previous) = depths.get(chain) {
        surface.remove_class(handle, &chain.class_name(previous));
    }
    depths.set(chain, Some(depth));
    surface.add_class(handle, &chain.class_name(depth));
}

fn clear<S: DrawingSurface>(surface: &mut S, handle: S::Handle, depths: &mut HighlightDepths) {
    for chain in [Chain::Descendants, Chain::Predecessors] {
        if let Some(previous) = depths.get(chain) {
            surface.remove_class(handle, &chain.class_name(previous));
        }
        depths.set(chain, None);
    }
}
