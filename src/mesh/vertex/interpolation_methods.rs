use crate::{
    float_types::Real,
    mesh::{plane::Plane, vertex::Vertex},
};

impl Vertex {
    /// Linear interpolation between `v0` (`t = 0`) and `v1` (`t = 1`).
    ///
    /// - **Position**: p(t) = p₀ + t·(p₁ - p₀)
    /// - **Normal**: n(t) = normalize(n₀ + t·(n₁ - n₀))
    /// - **Colors / UVs**: every pass's direct and illumination color and
    ///   every pass/stage texture coordinate, component-wise.
    ///
    /// `t` is clamped to `[0, 1]`, so intersection parameters that land a hair
    /// outside the segment through rounding still produce an on-segment vertex.
    pub fn lerp(v0: &Vertex, v1: &Vertex, t: Real) -> Vertex {
        debug_assert_eq!(v0.pass_count, v1.pass_count);
        let t = t.clamp(0.0, 1.0);

        let mut res = *v0;
        res.pos = v0.pos + (v1.pos - v0.pos) * t;

        let normal = v0.normal + (v1.normal - v0.normal) * t;
        res.normal = normal.try_normalize(Real::EPSILON).unwrap_or(v0.normal);

        for pass in 0..v0.pass_count {
            res.dcg[pass] = v0.dcg[pass].lerp(&v1.dcg[pass], t);
            res.dig[pass] = v0.dig[pass].lerp(&v1.dig[pass], t);
            for (stage, uv) in res.uv[pass].iter_mut().enumerate() {
                *uv = v0.uv[pass][stage].lerp(&v1.uv[pass][stage], t);
            }
        }
        res
    }

    /// The vertex where the edge `p0 → p1` crosses `plane`, with all
    /// attributes interpolated.
    pub fn intersect_plane(p0: &Vertex, p1: &Vertex, plane: &Plane) -> Vertex {
        let t = plane.intersection_parameter(&p0.pos, &p1.pos).unwrap_or(0.0);
        Vertex::lerp(p0, p1, t)
    }
}
