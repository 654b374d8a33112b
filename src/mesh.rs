// mesh.rs - inward-facing UV sphere for the panorama

/// GPU vertex: position plus equirectangular texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Latitude/longitude grid sphere. X is mirrored so the texture faces the
/// inside, where the camera lives.
pub fn build_sphere(radius: f32, lat_segments: u32, lon_segments: u32) -> SphereMesh {
    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);

    for i in 0..=lat_segments {
        // polar angle from the top pole
        let theta = std::f32::consts::PI * i as f32 / lat_segments as f32;
        let y = radius * theta.cos();
        let sin_t = theta.sin();

        for j in 0..=lon_segments {
            let phi = 2.0 * std::f32::consts::PI * j as f32 / lon_segments as f32;

            let x = -radius * phi.cos() * sin_t;
            let z = radius * phi.sin() * sin_t;

            let u = j as f32 / lon_segments as f32;
            let v = i as f32 / lat_segments as f32;

            vertices.push(Vertex {
                position: [x, y, z],
                uv: [u, v],
            });
        }
    }

    for i in 0..lat_segments {
        for j in 0..lon_segments {
            let a = i * (lon_segments + 1) + j;
            let b = a + lon_segments + 1;

            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_match_segments() {
        let mesh = build_sphere(500.0, 16, 32);
        assert_eq!(mesh.vertices.len(), 17 * 33);
        assert_eq!(mesh.indices.len(), 16 * 32 * 6);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = build_sphere(500.0, 16, 32);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let radius = 500.0;
        let mesh = build_sphere(radius, 8, 12);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - radius).abs() < 1e-2);
        }
    }

    #[test]
    fn uvs_span_the_unit_square() {
        let mesh = build_sphere(500.0, 8, 12);
        for v in &mesh.vertices {
            let [u, w] = v.uv;
            assert!((0.0..=1.0).contains(&u));
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn x_axis_is_mirrored_for_inward_faces() {
        let lat = 16;
        let lon = 32;
        let mesh = build_sphere(500.0, lat, lon);
        // equator vertex at the texture seam points down -X
        let seam = mesh.vertices[((lat / 2) * (lon + 1)) as usize];
        assert!((seam.position[0] + 500.0).abs() < 1e-2);
    }
}
