use crate::math::{Point, Real};
use crate::utils::hashmap::HashMap;
use smallvec::SmallVec;

/// Merges points closer than a tolerance into a single welded point.
///
/// Points are bucketed into a uniform grid whose cells are as large as the
/// tolerance, so a lookup only visits the 27 neighboring cells.
#[derive(Clone, Debug)]
pub struct VertexWelder {
    tolerance: Real,
    points: Vec<Point<Real>>,
    cells: HashMap<[i64; 3], SmallVec<[u32; 2]>>,
}

impl VertexWelder {
    /// Creates an empty welder merging points closer than `tolerance`.
    pub fn new(tolerance: Real) -> Self {
        VertexWelder {
            tolerance: tolerance.max(crate::math::DEFAULT_EPSILON),
            points: Vec::new(),
            cells: HashMap::default(),
        }
    }

    fn cell(&self, pt: &Point<Real>) -> [i64; 3] {
        [
            (pt.x / self.tolerance).floor() as i64,
            (pt.y / self.tolerance).floor() as i64,
            (pt.z / self.tolerance).floor() as i64,
        ]
    }

    /// Returns the id of the welded point matching `pt`, inserting it if there is none.
    pub fn weld(&mut self, pt: Point<Real>) -> u32 {
        let cell = self.cell(&pt);
        let sq_tol = self.tolerance * self.tolerance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                    if let Some(ids) = self.cells.get(&key) {
                        for id in ids.iter() {
                            if na::distance_squared(&self.points[*id as usize], &pt) <= sq_tol {
                                return *id;
                            }
                        }
                    }
                }
            }
        }

        let id = self.points.len() as u32;
        self.points.push(pt);
        self.cells.entry(cell).or_default().push(id);
        id
    }

    /// The welded point with the given id.
    #[inline]
    pub fn point(&self, id: u32) -> Point<Real> {
        self.points[id as usize]
    }

    /// All the welded points, indexed by their id.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The number of distinct welded points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is this welder empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
