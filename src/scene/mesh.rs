//! Meshes whose texture coordinates match the synthesized maps.
//!
//! Body maps are equirectangular with the poles on ±y; ring strips run
//! outwards along u. Both builders lay their UVs out to match.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Latitude/longitude sphere with poles on ±y.
///
/// u follows longitude eastwards from +x and v runs from the north pole (0)
/// to the south pole (1), the same layout as the star field renderer.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let vertex_count = ((sectors + 1) * (stacks + 1)) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut tangents = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let lat = FRAC_PI_2 - v * PI;
        let (sin_lat, cos_lat) = lat.sin_cos();
        for j in 0..=sectors {
            let u = j as f32 / sectors as f32;
            let (sin_lon, cos_lon) = (u * TAU).sin_cos();
            let normal = Vec3::new(cos_lat * cos_lon, sin_lat, -cos_lat * sin_lon);
            positions.push((normal * radius).to_array());
            normals.push(normal.to_array());
            tangents.push([-sin_lon, 0.0, -cos_lon, 1.0]);
            uvs.push([u, v]);
        }
    }

    let row = sectors + 1;
    let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * row + j;
            let b = a + row;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_TANGENT, tangents)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// Flat annulus in the xz plane facing +y.
///
/// u runs from 0 at `inner` to 1 at `outer`, v goes once around.
pub fn annulus(inner: f32, outer: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let vertex_count = ((segments + 1) * 2) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    for k in 0..=segments {
        let v = k as f32 / segments as f32;
        let (sin, cos) = (v * TAU).sin_cos();
        positions.push([inner * cos, 0.0, inner * sin]);
        positions.push([outer * cos, 0.0, outer * sin]);
        uvs.push([0.0, v]);
        uvs.push([1.0, v]);
    }
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for k in 0..segments {
        let inner_a = 2 * k;
        let outer_a = inner_a + 1;
        let inner_b = inner_a + 2;
        let outer_b = inner_a + 3;
        indices.extend_from_slice(&[inner_a, inner_b, outer_a, outer_a, inner_b, outer_b]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}
