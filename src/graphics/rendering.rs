use wgpu::util::DeviceExt;

use super::camera::CameraBundle;
use super::gpu_interface::GPUInterface;
use super::lines::LineVertex;

/// Room for this many vertices is allocated up front; the buffer grows when a frame needs more.
const INITIAL_VERTEX_CAPACITY: usize = 4096;

pub fn create_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    topology: wgpu::PrimitiveTopology,
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: vertex_layouts,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState {
                    alpha: wgpu::BlendComponent::REPLACE,
                    color: wgpu::BlendComponent::REPLACE,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Lines have no faces to cull.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            // Requires Features::DEPTH_CLIP_CONTROL
            unclipped_depth: false,
            // Requires Features::CONSERVATIVE_RASTERIZATION
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

pub fn create_line_render_pipeline(
    gpu: &GPUInterface,
    camera_bundle: &CameraBundle,
) -> wgpu::RenderPipeline {
    let layout = gpu
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&camera_bundle.camera_bind_group_layout],
            push_constant_ranges: &[],
        });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/line.wgsl").into()),
    };
    create_render_pipeline(
        &gpu.device,
        &layout,
        gpu.config.format,
        &[LineVertex::desc()],
        wgpu::PrimitiveTopology::LineList,
        shader,
    )
}

/// Draws a line list that is rebuilt every frame.
pub struct LineRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    num_vertices: u32,
}

impl LineRenderer {
    pub fn new(gpu: &GPUInterface, camera_bundle: &CameraBundle) -> LineRenderer {
        let pipeline = create_line_render_pipeline(gpu, camera_bundle);
        LineRenderer {
            pipeline,
            vertex_buffer: create_vertex_buffer(gpu, INITIAL_VERTEX_CAPACITY),
            capacity: INITIAL_VERTEX_CAPACITY,
            num_vertices: 0,
        }
    }

    pub fn upload(&mut self, gpu: &GPUInterface, vertices: &[LineVertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            log::debug!("growing line buffer to {} vertices", self.capacity);
            self.vertex_buffer = create_vertex_buffer(gpu, self.capacity);
        }
        gpu.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        self.num_vertices = vertices.len() as u32;
    }

    pub fn render(
        &self,
        gpu: &GPUInterface,
        camera_bundle: &CameraBundle,
        output: &wgpu::SurfaceTexture,
        background: [f32; 3],
    ) -> wgpu::CommandBuffer {
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // begin_render_pass borrows encoder mutably, so the pass lives in its own block.
        {
            let [r, g, b] = background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            if self.num_vertices > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &camera_bundle.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.num_vertices, 0..1);
            }
        }

        encoder.finish()
    }
}

fn create_vertex_buffer(gpu: &GPUInterface, capacity: usize) -> wgpu::Buffer {
    let zeroes = vec![LineVertex::new(cgmath::Vector3::new(0.0, 0.0, 0.0), [0.0; 3]); capacity];
    gpu.device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(&zeroes),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
}
