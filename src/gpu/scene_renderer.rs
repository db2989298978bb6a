//! Draws a [`Scene`]: line segments as a line list, spheres as lit
//! billboard impostors, both depth tested against one depth buffer.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{create_depth_texture, DynamicBuffer, GpuContext, DEPTH_FORMAT};
use crate::scene::{OrbitCamera, Scene};

const SPHERE_SHADER: &str = include_str!("shaders/sphere.wgsl");
const LINE_SHADER: &str = include_str!("shaders/line.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
    /// xyz = light direction, w = ambient
    light: [f32; 4],
}

impl SceneUniforms {
    fn new(scene: &Scene, camera: &OrbitCamera) -> Self {
        let (right, up) = camera.basis();
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            light: scene.light.direction.extend(scene.light.ambient).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct SphereInstance {
    center: [f32; 3],
    radius: f32,
    color: [f32; 4],
}

impl SphereInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn sphere_instances(scene: &Scene, out: &mut Vec<SphereInstance>) {
    out.clear();
    out.extend(scene.spheres().iter().map(|s| SphereInstance {
        center: s.center.to_array(),
        radius: s.radius,
        color: s.color.to_array(),
    }));
}

fn line_vertices(scene: &Scene, out: &mut Vec<LineVertex>) {
    out.clear();
    for line in scene.lines() {
        let color = line.color.to_array();
        out.push(LineVertex {
            position: line.start().to_array(),
            color,
        });
        out.push(LineVertex {
            position: line.end().to_array(),
            color,
        });
    }
}

pub struct SceneRenderer {
    sphere_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    spheres: DynamicBuffer,
    lines: DynamicBuffer,
    sphere_scratch: Vec<SphereInstance>,
    line_scratch: Vec<LineVertex>,
    line_vertex_count: u32,
    depth_view: wgpu::TextureView,
}

impl SceneRenderer {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;
        let (width, height) = gpu.size();
        let format = gpu.format();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let sphere_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Shader"),
            source: wgpu::ShaderSource::Wgsl(SPHERE_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER.into()),
        });

        let sphere_pipeline = create_pipeline(
            device,
            "Sphere Pipeline",
            &pipeline_layout,
            &sphere_shader,
            SphereInstance::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            format,
        );
        let line_pipeline = create_pipeline(
            device,
            "Line Pipeline",
            &pipeline_layout,
            &line_shader,
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            format,
        );

        Self {
            sphere_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            spheres: DynamicBuffer::new(device, "Sphere Instance Buffer", wgpu::BufferUsages::VERTEX),
            lines: DynamicBuffer::new(device, "Line Vertex Buffer", wgpu::BufferUsages::VERTEX),
            sphere_scratch: Vec::new(),
            line_scratch: Vec::new(),
            line_vertex_count: 0,
            depth_view: create_depth_texture(device, width, height),
        }
    }

    pub fn resize(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.size();
        self.depth_view = create_depth_texture(&gpu.device, width, height);
    }

    /// Upload what changed and draw one frame.
    ///
    /// Spheres move every frame and are always re-uploaded. Line vertices
    /// are only re-uploaded when some line is flagged, after which the
    /// flags are cleared.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &mut Scene,
        camera: &OrbitCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        gpu.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::new(scene, camera)),
        );

        sphere_instances(scene, &mut self.sphere_scratch);
        self.spheres.write(
            &gpu.device,
            &gpu.queue,
            bytemuck::cast_slice(&self.sphere_scratch),
        );

        if scene.lines_need_update() {
            line_vertices(scene, &mut self.line_scratch);
            self.lines
                .write(&gpu.device, &gpu.queue, bytemuck::cast_slice(&self.line_scratch));
            self.line_vertex_count = self.line_scratch.len() as u32;
            scene.mark_lines_uploaded();
        }

        let output = gpu.current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if self.line_vertex_count > 0 {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.lines.buffer().slice(..));
                pass.draw(0..self.line_vertex_count, 0..1);
            }

            if !self.sphere_scratch.is_empty() {
                pass.set_pipeline(&self.sphere_pipeline);
                pass.set_vertex_buffer(0, self.spheres.buffer().slice(..));
                pass.draw(0..6, 0..self.sphere_scratch.len() as u32);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
