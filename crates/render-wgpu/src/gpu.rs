use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use meadowrun_render::{DrawItem, FrameScene, RenderView};
use wgpu::util::DeviceExt;

/// Direction the white directional light shines in.
const SUN_DIRECTION: Vec3 = Vec3::new(-0.2, -1.0, -0.3);

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_pos: [[f32; 4]; 4],
    light_color: [[f32; 4]; 4],
    sun_dir: [f32; 4],
}

impl Uniforms {
    fn new(frame: &FrameScene, view: &RenderView) -> Self {
        let mut light_pos = [[0.0; 4]; 4];
        let mut light_color = [[0.0; 4]; 4];
        for (i, light) in frame.lights.iter().take(4).enumerate() {
            light_pos[i] = light.position.extend(1.0).to_array();
            let [r, g, b] = light.color;
            light_color[i] = [r, g, b, 1.0];
        }
        Self {
            view_proj: view.view_projection().to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
            light_pos,
            light_color,
            sun_dir: SUN_DIRECTION.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl From<&DrawItem> for InstanceData {
    fn from(item: &DrawItem) -> Self {
        let cols = item.model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: item.color,
        }
    }
}

/// Unit cube centred on the origin.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Upright unit quad standing on the origin, facing +Z.
fn grass_quad() -> (Vec<QuadVertex>, Vec<u16>) {
    #[rustfmt::skip]
    let vertices = vec![
        QuadVertex { position: [-0.5, -0.5, 0.0], uv: [0.0, 0.0] },
        QuadVertex { position: [ 0.5, -0.5, 0.0], uv: [1.0, 0.0] },
        QuadVertex { position: [ 0.5,  0.5, 0.0], uv: [1.0, 1.0] },
        QuadVertex { position: [-0.5,  0.5, 0.0], uv: [0.0, 1.0] },
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceData>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRS,
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    vs: &'a str,
    fs: &'a str,
    vertex: wgpu::VertexBufferLayout<'a>,
    blend: wgpu::BlendState,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: spec.module,
            entry_point: Some(spec.vs),
            compilation_options: Default::default(),
            buffers: &[spec.vertex, instance_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.module,
            entry_point: Some(spec.fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu backend for a [`FrameScene`]: lit boxes, flat light markers, then
/// blended grass billboards in the order the scene lists them.
pub struct WgpuRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    grass_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    quad_index_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
                light_pos: [[0.0; 4]; 4],
                light_color: [[0.0; 4]; 4],
                sun_dir: SUN_DIRECTION.extend(0.0).to_array(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let grass_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grass_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRASS_SHADER.into()),
        });

        let cube_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        };
        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x2,
            ],
        };

        let lit_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "lit_pipeline",
                module: &scene_shader,
                vs: "vs_main",
                fs: "fs_lit",
                vertex: cube_layout.clone(),
                blend: wgpu::BlendState::REPLACE,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
            },
        );
        let marker_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "marker_pipeline",
                module: &scene_shader,
                vs: "vs_main",
                fs: "fs_unlit",
                vertex: cube_layout,
                blend: wgpu::BlendState::REPLACE,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
            },
        );
        // Depth test on, depth write off: grass must not hide grass drawn after it.
        let grass_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "grass_pipeline",
                module: &grass_shader,
                vs: "vs_grass",
                fs: "fs_grass",
                vertex: quad_layout,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull_mode: None,
                depth_write: false,
            },
        );

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let (quad_verts, quad_indices) = grass_quad();
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let max_instances = 4_096u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);
        tracing::debug!(?surface_format, width, height, "wgpu renderer ready");

        Self {
            lit_pipeline,
            marker_pipeline,
            grass_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            quad_vertex_buffer,
            quad_index_buffer,
            quad_index_count: quad_indices.len() as u32,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Draw one frame into `target`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameScene,
        view: &RenderView,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(frame, view)),
        );

        // One buffer, three contiguous ranges.
        let budget = self.max_instances as usize;
        let mut instances: Vec<InstanceData> = Vec::with_capacity(frame.draw_count().min(budget));
        let mut ranges = [0u32..0u32, 0..0, 0..0];
        for (range, items) in ranges
            .iter_mut()
            .zip([&frame.opaque, &frame.markers, &frame.billboards])
        {
            let start = instances.len();
            let room = budget - start;
            if items.len() > room {
                tracing::warn!(dropped = items.len() - room, "instance budget exceeded");
            }
            instances.extend(items.iter().take(room).map(InstanceData::from));
            *range = start as u32..instances.len() as u32;
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let [r, g, b, a] = frame.clear_color.map(f64::from);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let [opaque, markers, grass] = ranges;
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            if !opaque.is_empty() {
                pass.set_pipeline(&self.lit_pipeline);
                pass.draw_indexed(0..self.cube_index_count, 0, opaque);
            }
            if !markers.is_empty() {
                pass.set_pipeline(&self.marker_pipeline);
                pass.draw_indexed(0..self.cube_index_count, 0, markers);
            }

            if !grass.is_empty() {
                pass.set_pipeline(&self.grass_pipeline);
                pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.quad_index_count, 0, grass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadowrun_render::SceneLayout;

    #[test]
    fn uniforms_carry_lights_and_eye() {
        let view = RenderView::default();
        let frame = FrameScene::build(&SceneLayout::default(), view.eye, [], 0.0);
        let u = Uniforms::new(&frame, &view);
        assert_eq!(u.eye, [0.0, 1.0, 6.0, 1.0]);
        assert_eq!(u.light_pos[1], [2.3, 3.0, -4.0, 1.0]);
        assert_eq!(u.light_color[2], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(u.sun_dir[3], 0.0);
    }

    #[test]
    fn instance_data_copies_model_columns() {
        let item = DrawItem::new(
            meadowrun_render::DrawKind::Lit,
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            [0.5; 4],
        );
        let data = InstanceData::from(&item);
        assert_eq!(data.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(data.color, [0.5; 4]);
    }

    #[test]
    fn uniform_size_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }
}
