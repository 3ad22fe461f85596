use cgmath::InnerSpace;

use crate::data_structures::model;

/**
 * Converts the meshes of a parsed obj file into vertex/index data.
 *
 * Obj files don't have to come with normals. When a mesh has none they are calculated
 * from the triangles so lighting still works.
 */
pub fn load_meshes(models: &[tobj::Model], file_name: &str) -> Vec<model::MeshData> {
    models
        .iter()
        .map(|m| {
            let mut vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| model::ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        // wgpu puts the texture origin at the top left
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            let indices = m
                .mesh
                .indices
                .chunks_exact(3)
                .filter(|c| c.iter().all(|&i| (i as usize) < vertices.len()))
                .flatten()
                .copied()
                .collect::<Vec<u32>>();
            if indices.len() != m.mesh.indices.len() {
                log::warn!(
                    "Mesh {} in {} references vertices that don't exist, dropping those faces.",
                    m.name,
                    file_name
                );
            }

            if m.mesh.normals.is_empty() {
                compute_normals(&mut vertices, &indices);
            }

            model::MeshData {
                name: if m.name.is_empty() {
                    file_name.to_string()
                } else {
                    format!("{}/{}", file_name, m.name)
                },
                vertices,
                indices,
                material: m.mesh.material_id,
            }
        })
        .collect()
}

/// Smooth normals: every vertex gets the average of the face normals of the triangles it is part of.
fn compute_normals(vertices: &mut [model::ModelVertex], indices: &[u32]) {
    let mut accumulated = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];

    for c in indices.chunks_exact(3) {
        let pos0: cgmath::Vector3<_> = vertices[c[0] as usize].position.into();
        let pos1: cgmath::Vector3<_> = vertices[c[1] as usize].position.into();
        let pos2: cgmath::Vector3<_> = vertices[c[2] as usize].position.into();

        // Unnormalized so larger triangles weigh more
        let face_normal = (pos1 - pos0).cross(pos2 - pos0);
        for &i in c {
            accumulated[i as usize] += face_normal;
        }
    }

    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        if normal.magnitude2() > f32::EPSILON {
            vertex.normal = normal.normalize().into();
        }
    }
}
