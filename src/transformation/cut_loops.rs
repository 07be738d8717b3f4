//! Reconstruction of closed polygonal loops from the unordered segments
//! produced where a plane cuts a triangle mesh.

use crate::math::{Point, Real};
use crate::utils::hashmap::HashMap;
use crate::utils::{SortedPair, VertexWelder};
use smallvec::SmallVec;

/// A directed segment generated where one triangle straddles the cutting plane.
///
/// Raw edges are not welded: the endpoints shared by edges of adjacent
/// triangles may differ by floating-point noise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RawEdge {
    /// The first endpoint.
    pub a: Point<Real>,
    /// The second endpoint.
    pub b: Point<Real>,
}

impl RawEdge {
    /// Creates a new raw edge from `a` to `b`.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>) -> Self {
        RawEdge { a, b }
    }
}

/// A closed polygon lying on the cutting plane.
///
/// The last point connects back to the first one: `points[0]` is not repeated.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CutLoop {
    /// The welded vertices of the loop, in traversal order.
    pub points: Vec<Point<Real>>,
    /// `true` if this loop was obtained by closing an open chain.
    pub forced_closed: bool,
}

impl CutLoop {
    /// The number of vertices of this loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this loop have no vertex?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates through the edges of this loop, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (Point<Real>, Point<Real>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Options of [`extract_loops`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LoopExtractionOptions {
    /// Endpoints closer than this distance are welded together.
    pub weld_tolerance: Real,
    /// Close chains that could not be closed by walking the edges (keeping
    /// chains with at least three vertices) instead of discarding them.
    pub close_open_chains: bool,
}

impl Default for LoopExtractionOptions {
    fn default() -> Self {
        LoopExtractionOptions {
            weld_tolerance: crate::slicing::EPSILON,
            close_open_chains: false,
        }
    }
}

/// Welds the endpoints of `edges` and walks them into closed loops.
///
/// Edges collapsing to a single point after welding are ignored, and pairs of
/// opposite edges cancel out (they are shared by two faces lying in the plane).
/// The walk follows the direction of the edges and only falls back to reversed
/// edges when no forward edge is available. Chains that cannot be closed are
/// discarded unless `options.close_open_chains` is set.
pub fn extract_loops(edges: &[RawEdge], options: &LoopExtractionOptions) -> Vec<CutLoop> {
    let mut welder = VertexWelder::new(options.weld_tolerance);
    let mut directed: HashMap<(u32, u32), usize> = HashMap::default();
    let mut welded_edges: Vec<[u32; 2]> = Vec::with_capacity(edges.len());

    for edge in edges {
        let a = welder.weld(edge.a);
        let b = welder.weld(edge.b);
        if a == b || directed.contains_key(&(a, b)) {
            continue;
        }

        if let Some(opposite) = directed.remove(&(b, a)) {
            // Mark the opposite edge as removed.
            welded_edges[opposite] = [u32::MAX, u32::MAX];
            continue;
        }

        let _ = directed.insert((a, b), welded_edges.len());
        welded_edges.push([a, b]);
    }

    let mut outgoing: HashMap<u32, SmallVec<[usize; 2]>> = HashMap::default();
    let mut incoming: HashMap<u32, SmallVec<[usize; 2]>> = HashMap::default();
    let mut used = vec![false; welded_edges.len()];

    for (i, [a, b]) in welded_edges.iter().enumerate() {
        if *a == u32::MAX {
            used[i] = true;
            continue;
        }
        outgoing.entry(*a).or_default().push(i);
        incoming.entry(*b).or_default().push(i);
    }

    let take_next = |from: u32, used: &mut [bool]| -> Option<u32> {
        if let Some(ids) = outgoing.get(&from) {
            if let Some(&e) = ids.iter().find(|e| !used[**e]) {
                used[e] = true;
                return Some(welded_edges[e][1]);
            }
        }
        // Walk an edge backward if the winding is inconsistent.
        if let Some(ids) = incoming.get(&from) {
            if let Some(&e) = ids.iter().find(|e| !used[**e]) {
                used[e] = true;
                return Some(welded_edges[e][0]);
            }
        }
        None
    };

    let take_prev = |to: u32, used: &mut [bool]| -> Option<u32> {
        if let Some(ids) = incoming.get(&to) {
            if let Some(&e) = ids.iter().find(|e| !used[**e]) {
                used[e] = true;
                return Some(welded_edges[e][0]);
            }
        }
        if let Some(ids) = outgoing.get(&to) {
            if let Some(&e) = ids.iter().find(|e| !used[**e]) {
                used[e] = true;
                return Some(welded_edges[e][1]);
            }
        }
        None
    };

    let mut loops = Vec::new();
    let mut discarded = 0;

    for start_edge in 0..welded_edges.len() {
        if used[start_edge] {
            continue;
        }

        used[start_edge] = true;
        let [start, mut current] = welded_edges[start_edge];
        let mut chain = vec![start];
        let mut closed = false;

        // Each step consumes one edge so the walk terminates.
        loop {
            if current == start {
                closed = true;
                break;
            }
            chain.push(current);
            match take_next(current, &mut used) {
                Some(next) => current = next,
                None => break,
            }
        }

        if !closed {
            // The walk did not start at the beginning of the chain: extend it backward.
            let mut prefix = Vec::new();
            let mut first = start;
            while let Some(prev) = take_prev(first, &mut used) {
                if chain.contains(&prev) || prefix.contains(&prev) {
                    break;
                }
                prefix.push(prev);
                first = prev;
            }
            prefix.reverse();
            prefix.append(&mut chain);
            chain = prefix;
        }

        let chain = remove_revisits(chain);

        if chain.len() < 3 {
            discarded += 1;
            continue;
        }

        if closed || options.close_open_chains {
            let points = chain.iter().map(|id| welder.point(*id)).collect();
            loops.push(CutLoop {
                points: remove_collinear(points, options.weld_tolerance),
                forced_closed: !closed,
            });
        } else {
            discarded += 1;
        }
    }

    if discarded > 0 {
        log::debug!(
            "discarded {} open or degenerate cut chain(s) out of {} raw edges",
            discarded,
            edges.len()
        );
    }

    loops
}

/// Removes the spikes created when a walk goes back and forth on the same vertices.
fn remove_revisits(chain: Vec<u32>) -> Vec<u32> {
    let mut result: Vec<u32> = Vec::with_capacity(chain.len());
    let mut seen: HashMap<SortedPair<u32>, ()> = HashMap::default();

    for id in chain {
        if let Some(last) = result.last() {
            if *last == id {
                continue;
            }
            if seen.insert(SortedPair::new(*last, id), ()).is_some() {
                // The edge was already walked in the other direction.
                let _ = result.pop();
                continue;
            }
        }
        result.push(id);
    }

    result
}

/// Removes the vertices lying on the line through their two neighbors.
///
/// A plane crossing a triangulated face yields one cut vertex per crossed
/// edge, most of them in the middle of a straight side of the loop.
fn remove_collinear(mut points: Vec<Point<Real>>, tolerance: Real) -> Vec<Point<Real>> {
    loop {
        let mut removed = false;
        let mut i = 0;

        while i < points.len() && points.len() > 3 {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let dir = next - prev;
            let len = dir.norm();
            let dist = if len > tolerance {
                (points[i] - prev).cross(&dir).norm() / len
            } else {
                (points[i] - prev).norm()
            };

            if dist <= tolerance {
                let _ = points.remove(i);
                removed = true;
            } else {
                i += 1;
            }
        }

        if !removed || points.len() <= 3 {
            return points;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(offset: Real) -> Vec<Point<Real>> {
        vec![
            Point::new(-1.0, 0.0, -1.0 + offset),
            Point::new(1.0, 0.0, -1.0 + offset),
            Point::new(1.0, 0.0, 1.0 + offset),
            Point::new(-1.0, 0.0, 1.0 + offset),
        ]
    }

    fn edges_of(points: &[Point<Real>]) -> Vec<RawEdge> {
        (0..points.len())
            .map(|i| RawEdge::new(points[i], points[(i + 1) % points.len()]))
            .collect()
    }

    #[test]
    fn shuffled_noisy_square_gives_one_loop() {
        let pts = square(0.0);
        let mut edges = edges_of(&pts);
        edges.swap(0, 2);
        // Noise below the weld tolerance.
        edges[1].b.x += 2.0e-5;

        let loops = extract_loops(&edges, &LoopExtractionOptions::default());
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
        assert!(!loops[0].forced_closed);
    }

    #[test]
    fn collinear_vertices_are_dropped() {
        let pts = square(0.0);
        let mut with_midpoints = Vec::new();
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[(i + 1) % pts.len()]);
            with_midpoints.push(a);
            with_midpoints.push(na::center(&a, &b));
            with_midpoints.push(a + (b - a) * 0.75);
        }

        let loops = extract_loops(&edges_of(&with_midpoints), &LoopExtractionOptions::default());
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
        for p in &loops[0].points {
            assert!(pts.iter().any(|q| na::distance(p, q) < 1.0e-5));
        }
    }

    #[test]
    fn two_disjoint_loops() {
        let mut edges = edges_of(&square(0.0));
        edges.extend(edges_of(&square(10.0)));
        let loops = extract_loops(&edges, &LoopExtractionOptions::default());
        assert_eq!(loops.len(), 2);
    }

    #[test]
    fn open_chain_policy() {
        let pts = square(0.0);
        let mut edges = edges_of(&pts);
        let _ = edges.pop();
        // Start the walk in the middle of the chain.
        edges.swap(0, 1);

        let discard = extract_loops(&edges, &LoopExtractionOptions::default());
        assert!(discard.is_empty());

        let options = LoopExtractionOptions {
            close_open_chains: true,
            ..Default::default()
        };
        let closed = extract_loops(&edges, &options);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].len(), 4);
        assert!(closed[0].forced_closed);
    }

    #[test]
    fn inconsistent_winding_is_still_closed() {
        let pts = square(0.0);
        let mut edges = edges_of(&pts);
        edges[2] = RawEdge::new(edges[2].b, edges[2].a);
        let loops = extract_loops(&edges, &LoopExtractionOptions::default());
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
    }
}
