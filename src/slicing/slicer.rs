use crate::math::{Real, Vector4};
use crate::mesh::{MeshData, Model, ModelTransform, Vertex};
use crate::query::{PlaneSide, SplitResult};
use crate::shape::Plane;
use crate::slicing::{build_cap, CapUvMode, SliceError, EPSILON};
use crate::transformation::{extract_loops, CutLoop, LoopExtractionOptions, RawEdge};
use crate::utils::hashmap::{Entry, HashMap};
use crate::utils::SortedPair;
use arrayvec::ArrayVec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Options controlling how models are sliced.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SliceOptions {
    /// Vertices closer than this distance to the plane are considered on the plane.
    /// Also used as the welding tolerance of the cut loops.
    pub epsilon: Real,
    /// Project the vertices within `epsilon` of the plane onto it before
    /// classifying the triangles. This avoids sliver triangles along the cut.
    pub snap_to_plane: bool,
    /// Close the cut chains that do not form a loop instead of discarding them.
    pub close_open_chains: bool,
    /// Generate the faces sealing the cross-section.
    pub generate_caps: bool,
    /// How the texture coordinates of the caps are computed.
    pub cap_uv_mode: CapUvMode,
    /// The material of the caps. Defaults to the material of the first sub-mesh.
    pub cap_material: Option<u32>,
    /// The vertex color of the caps.
    pub cap_color: Vector4<Real>,
}

impl Default for SliceOptions {
    fn default() -> Self {
        SliceOptions {
            epsilon: EPSILON,
            snap_to_plane: true,
            close_open_chains: false,
            generate_caps: true,
            cap_uv_mode: CapUvMode::default(),
            cap_material: None,
            cap_color: Vector4::repeat(1.0),
        }
    }
}

/// The result of splitting a single mesh, before capping.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSplit {
    /// The triangles on the positive side of the plane.
    pub front: MeshData,
    /// The triangles on the negative side of the plane.
    pub back: MeshData,
    /// The boundary of the cut, oriented counter-clockwise around the plane normal.
    pub raw_edges: Vec<RawEdge>,
}

/// The two halves of a sliced model.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceOutput {
    /// The sub-meshes on the positive side of the plane, cap included.
    pub front: Vec<MeshData>,
    /// The sub-meshes on the negative side of the plane, cap included.
    pub back: Vec<MeshData>,
    /// The local-space cutting plane.
    pub plane: Plane,
    /// The closed loops of the cross-section.
    pub loops: Vec<CutLoop>,
}

impl SliceOutput {
    /// Wraps both halves into models.
    pub fn into_models(self) -> (Model, Model) {
        (Model::new(self.front), Model::new(self.back))
    }
}

/// Creates the render-side resources of a mesh.
///
/// The slicer calls it from [`Slicer::slice`] only, so that the worker threads
/// never touch the renderer.
pub trait MeshUploader {
    /// The renderer handle of an uploaded mesh.
    type Handle;

    /// Uploads `mesh` to the renderer.
    fn upload(&mut self, mesh: &MeshData) -> Self::Handle;
}

/// The result of [`Slicer::slice`]: the CPU-side meshes and their render handles.
#[derive(Debug)]
pub struct SlicedUpload<H> {
    /// The CPU-side output.
    pub output: SliceOutput,
    /// One handle per mesh of `output.front`.
    pub front_handles: Vec<H>,
    /// One handle per mesh of `output.back`.
    pub back_handles: Vec<H>,
}

/// Bisects models along planes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Slicer {
    /// The slicing options.
    pub options: SliceOptions,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum PolyVertex {
    Source(u32),
    Cut(SortedPair<u32>),
}

impl PolyVertex {
    fn is_on_plane(&self, classes: &[PlaneSide]) -> bool {
        match self {
            PolyVertex::Source(i) => classes[*i as usize] == PlaneSide::Crossing,
            PolyVertex::Cut(_) => true,
        }
    }
}

struct SideBuilder {
    mesh: MeshData,
    remap: HashMap<PolyVertex, u32>,
}

impl SideBuilder {
    fn new(material_index: u32) -> Self {
        SideBuilder {
            mesh: MeshData::empty(material_index),
            remap: HashMap::default(),
        }
    }

    fn vertex_id(&mut self, key: PolyVertex, vertex: &Vertex) -> u32 {
        match self.remap.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let id = self.mesh.vertices.len() as u32;
                self.mesh.vertices.push(*vertex);
                *e.insert(id)
            }
        }
    }

    /// Adds a convex polygon as a triangle fan.
    fn push_polygon(&mut self, polygon: &[PolyVertex], vertices: impl Fn(&PolyVertex) -> Vertex) {
        if polygon.len() < 3 {
            return;
        }

        let ids: ArrayVec<u32, 4> = polygon
            .iter()
            .map(|key| self.vertex_id(*key, &vertices(key)))
            .collect();

        for k in 1..ids.len() - 1 {
            self.mesh
                .indices
                .extend_from_slice(&[ids[0], ids[k], ids[k + 1]]);
        }
    }
}

impl Slicer {
    /// Creates a slicer with the given options.
    pub fn new(options: SliceOptions) -> Self {
        Slicer { options }
    }

    /// Splits one mesh along `plane`, without capping the cross-section.
    ///
    /// Every triangle ends up either whole on one side, or split into one or
    /// two triangles on each side. Triangles lying in the plane go to the side
    /// their normal points away from, so they are never duplicated.
    /// Triangles referencing missing vertices are skipped; see [`MeshData::validate`].
    pub fn slice_mesh(&self, mesh: &MeshData, plane: &Plane) -> MeshSplit {
        let epsilon = if self.options.snap_to_plane {
            self.options.epsilon
        } else {
            0.0
        };

        let mut vertices = mesh.vertices.clone();
        let mut dists = Vec::with_capacity(vertices.len());
        let mut classes = Vec::with_capacity(vertices.len());

        for v in &mut vertices {
            let dist = plane.signed_distance(&v.position);
            let class = PlaneSide::from_signed_distance(dist, epsilon);
            if class == PlaneSide::Crossing {
                v.position = plane.project_point(&v.position);
            }
            dists.push(dist);
            classes.push(class);
        }

        let mut front = SideBuilder::new(mesh.material_index);
        let mut back = SideBuilder::new(mesh.material_index);
        let mut cuts: HashMap<SortedPair<u32>, Vertex> = HashMap::default();
        let mut raw_edges = Vec::new();

        for tri in mesh.indices.chunks_exact(3) {
            let idx = [tri[0], tri[1], tri[2]];
            if idx.iter().any(|i| *i as usize >= vertices.len()) {
                continue;
            }
            let cls = idx.map(|i| classes[i as usize]);

            if !cls.contains(&PlaneSide::Negative) && !cls.contains(&PlaneSide::Positive) {
                // The whole triangle lies in the plane.
                let [a, b, c] = idx.map(|i| vertices[i as usize].position);
                let key = idx.map(PolyVertex::Source);
                if (b - a).cross(&(c - a)).dot(&plane.normal) > 0.0 {
                    back.push_polygon(&key, |k| resolve(k, &vertices, &cuts));
                } else {
                    front.push_polygon(&key, |k| resolve(k, &vertices, &cuts));
                }
                continue;
            }

            let mut front_poly = ArrayVec::<PolyVertex, 4>::new();
            let mut back_poly = ArrayVec::<PolyVertex, 4>::new();

            for k in 0..3 {
                let (i, j) = (idx[k], idx[(k + 1) % 3]);
                let key = PolyVertex::Source(i);

                if cls[k] != PlaneSide::Negative {
                    front_poly.push(key);
                }
                if cls[k] != PlaneSide::Positive {
                    back_poly.push(key);
                }

                let crosses = matches!(
                    (cls[k], cls[(k + 1) % 3]),
                    (PlaneSide::Positive, PlaneSide::Negative)
                        | (PlaneSide::Negative, PlaneSide::Positive)
                );

                if crosses {
                    let edge = SortedPair::new(i, j);
                    let _ = cuts.entry(edge).or_insert_with(|| {
                        // Interpolate from the smallest index so both triangles
                        // sharing this edge get the exact same vertex.
                        let [lo, hi] = edge.into_inner();
                        let (d_lo, d_hi) = (dists[lo as usize], dists[hi as usize]);
                        let t = d_lo / (d_lo - d_hi);
                        let mut v = vertices[lo as usize].interpolate(&vertices[hi as usize], t);
                        v.position = plane.project_point(&v.position);
                        v
                    });
                    front_poly.push(PolyVertex::Cut(edge));
                    back_poly.push(PolyVertex::Cut(edge));
                }
            }

            if front_poly.len() >= 3 {
                let n = front_poly.len();
                for k in 0..n {
                    let (p, q) = (front_poly[k], front_poly[(k + 1) % n]);
                    if p.is_on_plane(&classes) && q.is_on_plane(&classes) {
                        let pa = resolve(&p, &vertices, &cuts).position;
                        let pb = resolve(&q, &vertices, &cuts).position;
                        raw_edges.push(RawEdge::new(pa, pb));
                    }
                }
            }

            front.push_polygon(&front_poly, |k| resolve(k, &vertices, &cuts));
            back.push_polygon(&back_poly, |k| resolve(k, &vertices, &cuts));
        }

        MeshSplit {
            front: front.mesh,
            back: back.mesh,
            raw_edges,
        }
    }

    /// Slices a model along a plane expressed in the model's local space.
    ///
    /// This only produces CPU-side data and is safe to call from any thread.
    /// Sub-meshes whose bounding box lies entirely on one side of the plane are
    /// passed through unmodified.
    pub fn slice_cpu_only(&self, model: &Model, plane: &Plane) -> Result<SliceOutput, SliceError> {
        if model.is_empty() {
            return Err(SliceError::EmptyModel);
        }

        for mesh in &model.meshes {
            mesh.validate()?;
        }

        let split_one = |mesh: &MeshData| -> MeshSplit {
            match mesh.aabb().plane_side(plane, self.options.epsilon) {
                PlaneSide::Positive => MeshSplit {
                    front: mesh.clone(),
                    back: MeshData::empty(mesh.material_index),
                    raw_edges: Vec::new(),
                },
                PlaneSide::Negative => MeshSplit {
                    front: MeshData::empty(mesh.material_index),
                    back: mesh.clone(),
                    raw_edges: Vec::new(),
                },
                PlaneSide::Crossing => self.slice_mesh(mesh, plane),
            }
        };

        #[cfg(feature = "parallel")]
        let splits: Vec<MeshSplit> = model.meshes.par_iter().map(split_one).collect();
        #[cfg(not(feature = "parallel"))]
        let splits: Vec<MeshSplit> = model.meshes.iter().map(split_one).collect();

        let mut front = Vec::new();
        let mut back = Vec::new();
        let mut raw_edges = Vec::new();

        for split in splits {
            raw_edges.extend(split.raw_edges);
            if !split.front.is_empty() {
                front.push(split.front);
            }
            if !split.back.is_empty() {
                back.push(split.back);
            }
        }

        if back.is_empty() {
            return Err(SliceError::NotCrossed {
                side: PlaneSide::Positive,
            });
        }
        if front.is_empty() {
            return Err(SliceError::NotCrossed {
                side: PlaneSide::Negative,
            });
        }

        let loop_options = LoopExtractionOptions {
            weld_tolerance: self.options.epsilon,
            close_open_chains: self.options.close_open_chains,
        };
        let loops = extract_loops(&raw_edges, &loop_options);

        if self.options.generate_caps && !loops.is_empty() {
            let material = self
                .options
                .cap_material
                .or_else(|| model.meshes.first().map(|m| m.material_index))
                .unwrap_or(0);
            let back_cap = build_cap(
                &loops,
                plane,
                self.options.cap_uv_mode,
                self.options.cap_color,
                material,
            );
            let mut front_cap = back_cap.clone();
            front_cap.flip();

            if !back_cap.is_empty() {
                front.push(front_cap);
                back.push(back_cap);
            }
        }

        Ok(SliceOutput {
            front,
            back,
            plane: *plane,
            loops,
        })
    }

    /// Splits a model along a local-space plane, without reporting the cut loops.
    ///
    /// Models lying on one side of the plane yield `Negative` or `Positive`.
    /// A successful split yields the negative half first.
    pub fn split(&self, model: &Model, plane: &Plane) -> Result<SplitResult<Model>, SliceError> {
        match self.slice_cpu_only(model, plane) {
            Ok(output) => {
                let (front, back) = output.into_models();
                Ok(SplitResult::Pair(back, front))
            }
            Err(SliceError::NotCrossed { side: PlaneSide::Positive }) => Ok(SplitResult::Positive),
            Err(SliceError::NotCrossed { side: PlaneSide::Negative }) => Ok(SplitResult::Negative),
            Err(e) => Err(e),
        }
    }

    /// Slices a placed model along a world-space plane.
    pub fn slice_world(
        &self,
        model: &Model,
        transform: &ModelTransform,
        world_plane: &Plane,
    ) -> Result<SliceOutput, SliceError> {
        let local_plane = transform
            .world_plane_to_local(world_plane)
            .ok_or(SliceError::DegeneratePlane)?;
        self.slice_cpu_only(model, &local_plane)
    }

    /// Slices a model and uploads every resulting mesh through `uploader`.
    ///
    /// This is the synchronous path, meant for the thread owning the renderer.
    pub fn slice<U: MeshUploader>(
        &self,
        model: &Model,
        plane: &Plane,
        uploader: &mut U,
    ) -> Result<SlicedUpload<U::Handle>, SliceError> {
        let output = self.slice_cpu_only(model, plane)?;
        let front_handles = output.front.iter().map(|m| uploader.upload(m)).collect();
        let back_handles = output.back.iter().map(|m| uploader.upload(m)).collect();

        Ok(SlicedUpload {
            output,
            front_handles,
            back_handles,
        })
    }
}

fn resolve(key: &PolyVertex, vertices: &[Vertex], cuts: &HashMap<SortedPair<u32>, Vertex>) -> Vertex {
    match key {
        PolyVertex::Source(i) => vertices[*i as usize],
        // Cut vertices are always inserted before being referenced.
        PolyVertex::Cut(edge) => cuts.get(edge).copied().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Vector};
    use crate::mesh::MeshDataError;
    use crate::mesh::primitives::{cuboid_mesh, uv_sphere_mesh};

    fn y_plane(y: Real) -> Plane {
        Plane::from_point_normal(&Point::new(0.0, y, 0.0), &Vector::y()).unwrap()
    }

    #[test]
    fn cube_halves_stay_on_their_side() {
        let model = Model::from_mesh(cuboid_mesh(&Vector::repeat(1.0), 0));
        let output = Slicer::default().slice_cpu_only(&model, &y_plane(0.0)).unwrap();

        for mesh in &output.front {
            assert!(mesh.vertices.iter().all(|v| v.position.y >= -EPSILON));
        }
        for mesh in &output.back {
            assert!(mesh.vertices.iter().all(|v| v.position.y <= EPSILON));
        }

        assert_eq!(output.loops.len(), 1);
        let (front, back) = output.into_models();
        assert_relative_eq!(front.volume(), 4.0, epsilon = 1.0e-3);
        assert_relative_eq!(back.volume(), 4.0, epsilon = 1.0e-3);
    }

    #[test]
    fn split_triangles_are_not_duplicated() {
        let mesh = cuboid_mesh(&Vector::repeat(1.0), 0);
        let split = Slicer::default().slice_mesh(&mesh, &y_plane(0.3));
        let area = |m: &MeshData| m.triangles().map(|t| t.area()).sum::<Real>();
        assert_relative_eq!(area(&split.front) + area(&split.back), area(&mesh), epsilon = 1.0e-3);
    }

    #[test]
    fn near_plane_vertices_are_snapped() {
        let mesh = cuboid_mesh(&Vector::repeat(1.0), 0);
        let plane = y_plane(1.0 - EPSILON / 2.0);
        let split = Slicer::default().slice_mesh(&mesh, &plane);
        // The top face is snapped onto the plane: nothing is left in front of it
        // and no sliver is created behind it.
        assert!(split.front.is_empty());
        assert!(split.raw_edges.is_empty());
        assert_eq!(split.back.triangle_count(), 12);
        assert!(split.back.triangles().all(|t| t.area() > 1.0e-3));
        assert!(split
            .back
            .vertices
            .iter()
            .all(|v| v.position.y <= plane.bias + 1.0e-6));
    }

    #[test]
    fn untouched_model_is_reported() {
        let model = Model::from_mesh(cuboid_mesh(&Vector::repeat(1.0), 0));
        let slicer = Slicer::default();
        assert_eq!(
            slicer.slice_cpu_only(&model, &y_plane(5.0)),
            Err(SliceError::NotCrossed {
                side: PlaneSide::Negative
            })
        );
        assert_eq!(
            slicer.slice_cpu_only(&model, &y_plane(-5.0)),
            Err(SliceError::NotCrossed {
                side: PlaneSide::Positive
            })
        );
        assert_eq!(
            slicer.slice_cpu_only(&Model::new(Vec::new()), &y_plane(0.0)),
            Err(SliceError::EmptyModel)
        );

        assert!(matches!(
            slicer.split(&model, &y_plane(5.0)),
            Ok(SplitResult::Negative)
        ));
        let (neg, pos) = slicer.split(&model, &y_plane(0.5)).unwrap().into_pair().unwrap();
        assert!(neg.local_aabb.maxs.y <= 0.5 + 1.0e-5);
        assert!(pos.local_aabb.mins.y >= 0.5 - 1.0e-5);
    }

    #[test]
    fn malformed_meshes_are_rejected() {
        let mut mesh = cuboid_mesh(&Vector::repeat(1.0), 0);
        mesh.indices.extend_from_slice(&[0, 1, 999]);
        let model = Model::new(vec![mesh.clone()]);

        assert_eq!(
            Slicer::default().slice_cpu_only(&model, &y_plane(0.0)),
            Err(SliceError::InvalidMesh(MeshDataError::IndexOutOfBounds {
                index: 999,
                vertex_count: 24
            }))
        );

        // The bare mesh split ignores the faulty triangle.
        let split = Slicer::default().slice_mesh(&mesh, &y_plane(0.0));
        let clean = Slicer::default().slice_mesh(&cuboid_mesh(&Vector::repeat(1.0), 0), &y_plane(0.0));
        assert_eq!(split, clean);
    }

    #[test]
    fn sphere_slice_conserves_volume() {
        let model = Model::from_mesh(uv_sphere_mesh(1.0, 32, 16, 0));
        let plane = Plane::from_point_normal(&Point::new(0.1, 0.2, 0.0), &Vector::new(0.3, 1.0, -0.2))
            .unwrap();
        let total = model.volume();
        let output = Slicer::default().slice_cpu_only(&model, &plane).unwrap();
        assert_eq!(output.loops.len(), 1);

        let (front, back) = output.into_models();
        assert_relative_eq!(front.volume() + back.volume(), total, epsilon = 1.0e-3);
    }

    #[test]
    fn synchronous_slice_uploads_every_mesh() {
        struct Counter(usize);
        impl MeshUploader for Counter {
            type Handle = usize;
            fn upload(&mut self, _: &MeshData) -> usize {
                self.0 += 1;
                self.0
            }
        }

        let model = Model::from_mesh(cuboid_mesh(&Vector::repeat(1.0), 2));
        let mut uploader = Counter(0);
        let sliced = Slicer::default()
            .slice(&model, &y_plane(0.0), &mut uploader)
            .unwrap();
        assert_eq!(sliced.front_handles.len(), sliced.output.front.len());
        assert_eq!(sliced.back_handles.len(), sliced.output.back.len());
        assert_eq!(uploader.0, sliced.output.front.len() + sliced.output.back.len());
    }
}
