// ============================================
// Overlay Preview - Кадр оверлея в offscreen текстуру
// ============================================
//
// Минимальный бэкенд для демо: облако точек, затем плоскости
// от дальних к ближним с premultiplied alpha. Uniform каждого
// draw call лежит в своём 256-байтном слоте (динамическое смещение).

use bytemuck::{Pod, Zeroable};
use ultraviolet::Mat4;

use ar_overlay::overlay::buffer::{GpuStreamBuffer, GrowableBuffer};
use ar_overlay::overlay::plane::PlaneVertex;
use ar_overlay::overlay::points::CloudPoint;
use ar_overlay::overlay::render::{
    plane_primitive_state, point_primitive_state, GpuUploadStats, OverlayFrame, OverlayGpu, PlaneGpuDraw, PLANE_BLEND,
};
use ar_overlay::overlay::tracking::Pose;
use ar_overlay::overlay::OverlayConfig;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const TARGET_SIZE: u32 = 256;

const FOV_Y: f32 = 1.0;
const Z_NEAR: f32 = 0.05;
const Z_FAR: f32 = 50.0;

/// Uniform одного draw call
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal: [f32; 4],
    uv: [f32; 4],
    /// До 256 байт: шаг динамического смещения
    _padding: [f32; 24],
}

const UNIFORM_STRIDE: u64 = std::mem::size_of::<DrawUniforms>() as u64;
/// Сколько байт слота читает шейдер
const UNIFORM_BINDING_SIZE: u64 = 160;

pub struct OverlayPreview {
    gpu: OverlayGpu,
    plane_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: GrowableBuffer<DrawUniforms>,
    uniform_buffer: GpuStreamBuffer,
    bind_group: wgpu::BindGroup,
    target: wgpu::TextureView,
}

impl OverlayPreview {
    pub fn new(device: &wgpu::Device, config: &OverlayConfig) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Preview Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Preview Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_BINDING_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Preview Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let plane_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "Plane Pipeline",
            ("vs_plane", "fs_plane"),
            PlaneVertex::desc(),
            plane_primitive_state(),
            PLANE_BLEND,
        );
        let point_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "Point Cloud Pipeline",
            ("vs_point", "fs_point"),
            CloudPoint::desc(),
            point_primitive_state(),
            wgpu::BlendState::REPLACE,
        );

        let uniform_buffer = GpuStreamBuffer::new(
            device,
            "Overlay Preview Uniforms",
            wgpu::BufferUsages::UNIFORM,
            UNIFORM_STRIDE * 16,
        );
        let bind_group = create_bind_group(device, &bind_group_layout, uniform_buffer.buffer());

        let target = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Overlay Preview Target"),
                size: wgpu::Extent3d {
                    width: TARGET_SIZE,
                    height: TARGET_SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            gpu: OverlayGpu::new(device, config),
            plane_pipeline,
            point_pipeline,
            bind_group_layout,
            uniforms: GrowableBuffer::new(16),
            uniform_buffer,
            bind_group,
            target,
        }
    }

    /// Загрузить кадр и нарисовать его
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &OverlayFrame,
        camera: &Pose,
    ) -> GpuUploadStats {
        let stats = self.gpu.upload(device, queue, frame);

        let projection = ultraviolet::projection::perspective_wgpu_dx(FOV_Y, 1.0, Z_NEAR, Z_FAR);
        let base = DrawUniforms {
            view_proj: (projection * camera.inverse().to_matrix()).into(),
            model: Mat4::identity().into(),
            normal: [0.0, 1.0, 0.0, 0.0],
            uv: [0.0; 4],
            _padding: [0.0; 24],
        };

        // Слот 0 - облако точек, дальше плоскости в порядке отрисовки
        let draws: Vec<PlaneGpuDraw<'_>> = self.gpu.iter_planes(frame).collect();
        let slots = self.uniforms.rewrite(draws.len() + 1);
        slots[0] = base;
        for (slot, draw) in slots[1..].iter_mut().zip(&draws) {
            let [nx, ny, nz] = draw.draw.normal;
            *slot = DrawUniforms {
                model: draw.draw.model_matrix,
                normal: [nx, ny, nz, 0.0],
                uv: draw.draw.uv_matrix,
                ..base
            };
        }
        if self.uniform_buffer.upload(device, queue, &self.uniforms) {
            self.bind_group = create_bind_group(device, &self.bind_group_layout, self.uniform_buffer.buffer());
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Preview Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Preview Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let (points, point_count) = self.gpu.points();
            if point_count > 0 {
                render_pass.set_pipeline(&self.point_pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[0]);
                render_pass.set_vertex_buffer(0, points.slice(..));
                render_pass.draw(0..point_count, 0..1);
            }

            render_pass.set_pipeline(&self.plane_pipeline);
            for (slot, draw) in draws.iter().enumerate() {
                let offset = (slot as u64 + 1) * UNIFORM_STRIDE;
                render_pass.set_bind_group(0, &self.bind_group, &[offset as u32]);
                render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                render_pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));

        stats
    }

    #[inline]
    pub fn plane_count(&self) -> usize {
        self.gpu.plane_count()
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    (vs_entry, fs_entry): (&str, &str),
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    primitive: wgpu::PrimitiveState,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive,
        depth_stencil: None, // порядок задаёт сортировка, не depth test
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Overlay Preview Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(UNIFORM_BINDING_SIZE),
            }),
        }],
    })
}
