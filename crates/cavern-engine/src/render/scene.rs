//! Fixed reference scene drawn into every capture.
//!
//! A line grid below the floor screen, a wire cube hovering in the room and
//! the three world axes. Scene authoring is out of scope; this only makes the
//! captured images meaningful.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub pos: [f32; 3],
    pub color: [f32; 4],
}

impl SceneVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x4  // color
    ];

    #[inline]
    pub fn new(pos: Vec3, color: [f32; 4]) -> Self {
        Self {
            pos: pos.to_array(),
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const GRID_COLOR: [f32; 4] = [0.35, 0.4, 0.45, 1.0];
const CUBE_COLOR: [f32; 4] = [1.0, 0.75, 0.2, 1.0];

/// Line-list vertices of the whole scene.
pub fn reference_scene() -> Vec<SceneVertex> {
    let mut lines = Vec::new();
    grid(&mut lines, -0.5, 4.0, 16, GRID_COLOR);
    wire_cube(&mut lines, Vec3::new(0.0, 0.6, 0.3), 0.15, CUBE_COLOR);
    axes(&mut lines, Vec3::new(0.0, 0.01, 0.0), 0.5);
    lines
}

/// Square grid in the plane `y = height`, spanning `[-half, half]` on X and Z.
fn grid(out: &mut Vec<SceneVertex>, height: f32, half: f32, divisions: u32, color: [f32; 4]) {
    let step = 2.0 * half / divisions as f32;
    for i in 0..=divisions {
        let t = -half + step * i as f32;
        out.push(SceneVertex::new(Vec3::new(t, height, -half), color));
        out.push(SceneVertex::new(Vec3::new(t, height, half), color));
        out.push(SceneVertex::new(Vec3::new(-half, height, t), color));
        out.push(SceneVertex::new(Vec3::new(half, height, t), color));
    }
}

fn wire_cube(out: &mut Vec<SceneVertex>, center: Vec3, half: f32, color: [f32; 4]) {
    let corner = |i: u32| {
        let sign = |bit: u32| if i & bit == 0 { -1.0 } else { 1.0 };
        center + Vec3::new(sign(1), sign(2), sign(4)) * half
    };
    // Edges join corners that differ in exactly one bit.
    for i in 0..8u32 {
        for bit in [1u32, 2, 4] {
            if i & bit == 0 {
                out.push(SceneVertex::new(corner(i), color));
                out.push(SceneVertex::new(corner(i | bit), color));
            }
        }
    }
}

fn axes(out: &mut Vec<SceneVertex>, origin: Vec3, length: f32) {
    let axes = [
        (Vec3::X, [1.0, 0.2, 0.2, 1.0]),
        (Vec3::Y, [0.2, 1.0, 0.2, 1.0]),
        (Vec3::Z, [0.2, 0.4, 1.0, 1.0]),
    ];
    for (dir, color) in axes {
        out.push(SceneVertex::new(origin, color));
        out.push(SceneVertex::new(origin + dir * length, color));
    }
}
