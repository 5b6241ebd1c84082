use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::capture::{CaptureBindings, CapturedFrame, RenderTarget, Renderer, TargetId};
use crate::device::HeadlessGpu;
use crate::error::RenderError;
use crate::projection::DepthRange;
use crate::viewpoint::EyeViewpoint;

use super::scene::{reference_scene, SceneVertex};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const BYTES_PER_PIXEL: u32 = 4;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    /// xyz = eye position, w = far plane.
    eye: [f32; 4],
}

/// Per-binding GPU resources.
struct TargetSlot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    staging: wgpu::Buffer,
    camera_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

/// wgpu implementation of [`Renderer`].
///
/// Each capture binding owns a colour texture and a staging buffer, allocated
/// once up front. `render` draws the reference scene, copies the texture into
/// the staging buffer and blocks until the pixels are mapped.
pub struct OffscreenRenderer<'g> {
    gpu: &'g HeadlessGpu,
    pipeline: wgpu::RenderPipeline,
    scene_vbo: wgpu::Buffer,
    scene_vertex_count: u32,
    slots: HashMap<TargetId, TargetSlot>,
    active: Option<TargetId>,
}

impl<'g> OffscreenRenderer<'g> {
    /// Clip depth convention the pipeline expects from projection matrices.
    pub const DEPTH_RANGE: DepthRange = DepthRange::ZeroToOne;

    pub fn new(gpu: &'g HeadlessGpu, bindings: &CaptureBindings) -> Self {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cavern scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cavern camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cavern scene pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cavern scene pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SceneVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let scene = reference_scene();
        let scene_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cavern scene vbo"),
            contents: bytemuck::cast_slice(&scene),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let slots: HashMap<TargetId, TargetSlot> = bindings
            .all()
            .map(|target| (target.id, create_slot(device, &bind_group_layout, target)))
            .collect();

        log::debug!("offscreen renderer: {} capture slots allocated", slots.len());

        Self {
            gpu,
            pipeline,
            scene_vbo,
            scene_vertex_count: scene.len() as u32,
            slots,
            active: None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn read_back(&self, slot: &TargetSlot) -> Result<Vec<u8>, RenderError> {
        let slice = slot.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let waited = self
            .gpu
            .device()
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::Readback(e.to_string()))
            .and_then(|_| rx.recv().map_err(|e| RenderError::Readback(e.to_string())));

        // A map still pending would make the next copy into this slot invalid.
        cancel_on_error(waited, || slot.staging.unmap())?
            .map_err(|e| RenderError::Readback(e.to_string()))?;

        let pixels = {
            let data = slice.get_mapped_range();
            strip_row_padding(
                &data,
                (slot.width * BYTES_PER_PIXEL) as usize,
                slot.padded_bytes_per_row as usize,
                slot.height as usize,
            )
        };
        slot.staging.unmap();
        Ok(pixels)
    }
}

impl Renderer for OffscreenRenderer<'_> {
    fn active_destination(&self) -> Option<TargetId> {
        self.active
    }

    fn set_active_destination(&mut self, destination: Option<TargetId>) {
        self.active = destination;
    }

    fn render(
        &mut self,
        target: &RenderTarget,
        eye: &EyeViewpoint,
        projection: &Mat4,
    ) -> Result<CapturedFrame, RenderError> {
        let slot = self
            .slots
            .get(&target.id)
            .ok_or(RenderError::UnknownTarget(target.id))?;

        let camera = CameraUniform {
            view_proj: projection.to_cols_array_2d(),
            eye: eye.position.extend(eye.far).to_array(),
        };
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        // Validation failures of this binding are captured here instead of
        // reaching the device-wide handler.
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        queue.write_buffer(&slot.camera_ubo, 0, bytemuck::bytes_of(&camera));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cavern capture encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cavern capture pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &slot.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &slot.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.scene_vbo.slice(..));
            rpass.draw(0..self.scene_vertex_count, 0..1);
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &slot.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &slot.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(slot.padded_bytes_per_row),
                    rows_per_image: Some(slot.height),
                },
            },
            wgpu::Extent3d {
                width: slot.width,
                height: slot.height,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));
        scope_result(pollster::block_on(error_scope.pop()))?;

        let pixels = self.read_back(slot)?;
        log::trace!("captured {} ({} bytes)", target.id, pixels.len());

        Ok(CapturedFrame {
            target: target.id,
            width: slot.width,
            height: slot.height,
            pixels,
        })
    }
}

fn create_slot(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    target: &RenderTarget,
) -> TargetSlot {
    let width = target.width.max(1);
    let height = target.height.max(1);
    let label = target.id.to_string();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let padded_bytes_per_row = padded_bytes_per_row(width);
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cavern capture staging"),
        size: u64::from(padded_bytes_per_row) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cavern camera ubo"),
        size: std::mem::size_of::<CameraUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cavern camera bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera_ubo.as_entire_binding(),
        }],
    });

    TargetSlot {
        texture,
        view,
        staging,
        camera_ubo,
        bind_group,
        width,
        height,
        padded_bytes_per_row,
    }
}

/// Maps the outcome of a popped error scope.
fn scope_result(error: Option<wgpu::Error>) -> Result<(), RenderError> {
    match error {
        Some(err) => Err(RenderError::Gpu(err.to_string())),
        None => Ok(()),
    }
}

/// Runs `cancel` before passing an error through.
fn cancel_on_error<T>(
    result: Result<T, RenderError>,
    cancel: impl FnOnce(),
) -> Result<T, RenderError> {
    if result.is_err() {
        cancel();
    }
    result
}

/// Row pitch accepted by texture-to-buffer copies.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn strip_row_padding(data: &[u8], unpadded: usize, padded: usize, rows: usize) -> Vec<u8> {
    if unpadded == padded {
        return data[..unpadded * rows].to_vec();
    }
    let mut out = Vec::with_capacity(unpadded * rows);
    for row in data.chunks(padded).take(rows) {
        out.extend_from_slice(&row[..unpadded]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn padding_is_stripped_per_row() {
        // 2 rows of 3 payload bytes, padded to 5.
        let data = [1, 2, 3, 0, 0, 4, 5, 6, 0, 0];
        assert_eq!(strip_row_padding(&data, 3, 5, 2), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(strip_row_padding(&data[..6], 3, 3, 2), vec![1, 2, 3, 0, 0, 4]);
    }

    #[test]
    fn popped_validation_error_becomes_a_gpu_failure() {
        assert_eq!(scope_result(None), Ok(()));

        let err = wgpu::Error::Validation {
            source: Box::new(std::fmt::Error),
            description: "copy extent exceeds texture".into(),
        };
        match scope_result(Some(err)) {
            Err(RenderError::Gpu(message)) => assert!(message.contains("copy extent")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn failed_wait_cancels_the_pending_map() {
        let cancelled = std::cell::Cell::new(false);
        let result: Result<(), _> = cancel_on_error(
            Err(RenderError::Readback("device lost".into())),
            || cancelled.set(true),
        );
        assert!(result.is_err());
        assert!(cancelled.get());

        let cancelled = std::cell::Cell::new(false);
        assert_eq!(cancel_on_error(Ok(3), || cancelled.set(true)), Ok(3));
        assert!(!cancelled.get());
    }

    #[test]
    fn camera_uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }
}
