// SPDX-License-Identifier: MPL-2.0
//! wgpu pipeline for the backpack model.
//!
//! Geometry is uploaded once per [`ModelKey`] and textures once per
//! [`TextureKey`]. Per-mesh uniforms are rewritten every frame since a
//! material change only touches a few floats. A mesh whose textures are not
//! on the GPU yet samples 1x1 neutral fallbacks, so the tint shows while
//! the images are still loading.

use super::camera::OrbitCamera;
use super::{lighting, DrawMesh, ModelKey, ViewerContent};
use crate::material::{TextureChannel, TextureImage, TextureKey};
use glam::Mat4;
use iced::widget::shader::{self, Viewport};
use iced::Rectangle;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_dirs: [[f32; 4]; 3],
    light_colors: [[f32; 4]; 3],
}

impl FrameUniforms {
    fn new(camera: &OrbitCamera, aspect: f32) -> Self {
        let mut light_dirs = [[0.0; 4]; 3];
        let mut light_colors = [[0.0; 4]; 3];
        for (i, light) in lighting::DIRECTIONAL.iter().enumerate() {
            let dir = light.position.normalize_or_zero();
            light_dirs[i] = [dir.x, dir.y, dir.z, 0.0];
            light_colors[i] = [light.intensity, light.intensity, light.intensity, 0.0];
        }
        let eye = camera.eye();
        let ambient = lighting::AMBIENT_INTENSITY;
        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
            ambient: [ambient, ambient, ambient, 0.0],
            light_dirs,
            light_colors,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    tint: [f32; 4],
    /// metalness, roughness, normal scale x, normal scale y
    params: [f32; 4],
}

impl MeshUniforms {
    fn new(mesh: &DrawMesh, model_offset: Mat4) -> Self {
        let model = model_offset * mesh.world;
        let normal = model.inverse().transpose();
        let s = &mesh.surface;
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            tint: [s.tint[0], s.tint[1], s.tint[2], 1.0],
            params: [s.metalness, s.roughness, s.normal_scale[0], s.normal_scale[1]],
        }
    }
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Textures currently bound; `None` means the channel fallback.
    bound: [Option<TextureKey>; 3],
}

pub struct Pipeline {
    pipeline: wgpu::RenderPipeline,
    frame_uniforms: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    mesh_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallbacks: [wgpu::TextureView; 3],
    textures: HashMap<TextureKey, wgpu::TextureView>,
    texture_revision: Option<u64>,
    model: Option<ModelKey>,
    meshes: Vec<GpuMesh>,
    depth: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
    // Physical widget bounds, captured in prepare() for render().
    last_bounds: (f32, f32, f32, f32),
}

impl shader::Pipeline for Pipeline {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(MODEL_SHADER.into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Model Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Frame Bind Group Layout"),
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

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Mesh Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &mesh_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Model Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // glTF materials may be double sided; the backpack has open edges.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let frame_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniforms.as_entire_binding(),
            }],
        });

        let fallbacks = TextureChannel::ALL.map(|channel| {
            upload_texture(
                device,
                queue,
                "Model Fallback Texture",
                channel,
                &TextureImage::solid(fallback_texel(channel)),
            )
        });

        Self {
            pipeline,
            frame_uniforms,
            frame_bind_group,
            mesh_layout,
            sampler,
            fallbacks,
            textures: HashMap::new(),
            texture_revision: None,
            model: None,
            meshes: Vec::new(),
            depth: None,
            depth_size: (0, 0),
            last_bounds: (0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// Texel that leaves the material parameters unchanged.
fn fallback_texel(channel: TextureChannel) -> [u8; 4] {
    match channel {
        TextureChannel::BaseColor => [255, 255, 255, 255],
        TextureChannel::Normal => [128, 128, 255, 255],
        TextureChannel::OcclusionRoughnessMetallic => [255, 255, 255, 255],
    }
}

fn channel_index(channel: TextureChannel) -> usize {
    match channel {
        TextureChannel::BaseColor => 0,
        TextureChannel::Normal => 1,
        TextureChannel::OcclusionRoughnessMetallic => 2,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    channel: TextureChannel,
    image: &TextureImage,
) -> wgpu::TextureView {
    // Base color is authored in sRGB; normal and ORM data are linear.
    let format = if channel.is_color() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.width * 4),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

impl Pipeline {
    fn ensure_depth(&mut self, device: &wgpu::Device, viewport: &Viewport) {
        let physical = viewport.physical_size();
        let size = (physical.width.max(1), physical.height.max(1));
        if self.depth.is_some() && self.depth_size == size {
            return;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Model Depth Texture"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth24Plus,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        self.depth = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.depth_size = size;
    }

    fn sync_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, content: &ViewerContent) {
        if self.texture_revision == Some(content.texture_revision) {
            return;
        }
        for (key, image) in content.textures.iter() {
            if self.textures.contains_key(key) {
                continue;
            }
            let label = key.to_string();
            let view = upload_texture(device, queue, &label, key.channel, image);
            tracing::debug!(texture = %key, width = image.width, height = image.height, "uploaded texture");
            self.textures.insert(*key, view);
        }
        self.texture_revision = Some(content.texture_revision);
    }

    fn sync_geometry(&mut self, device: &wgpu::Device, content: &ViewerContent) {
        if self.model == Some(content.model.key) {
            return;
        }
        self.meshes = content
            .model
            .meshes
            .iter()
            .map(|mesh| self.create_mesh(device, mesh))
            .collect();
        self.model = Some(content.model.key);
    }

    fn create_mesh(&self, device: &wgpu::Device, mesh: &DrawMesh) -> GpuMesh {
        let g = &mesh.geometry;
        let vertices: Vec<Vertex> = (0..g.vertex_count())
            .map(|i| Vertex {
                position: g.positions[i],
                normal: g.normals[i],
                uv: g.uvs[i],
            })
            .collect();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Indices"),
            contents: bytemuck::cast_slice(&g.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Mesh Uniforms"),
            size: std::mem::size_of::<MeshUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bound = [None; 3];
        let bind_group = self.mesh_bind_group(device, &uniforms, &bound);
        GpuMesh {
            vertices,
            indices,
            index_count: g.indices.len() as u32,
            uniforms,
            bind_group,
            bound,
        }
    }

    fn mesh_bind_group(
        &self,
        device: &wgpu::Device,
        uniforms: &wgpu::Buffer,
        bound: &[Option<TextureKey>; 3],
    ) -> wgpu::BindGroup {
        let view = |slot: usize| {
            bound[slot]
                .and_then(|key| self.textures.get(&key))
                .unwrap_or(&self.fallbacks[slot])
        };
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Mesh Bind Group"),
            layout: &self.mesh_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view(0)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(view(1)),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(view(2)),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Writes per-mesh uniforms and rebinds textures that became available
    /// or that the latest material swapped out.
    fn sync_materials(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, content: &ViewerContent) {
        let offset = content.model.transform();
        for i in 0..self.meshes.len().min(content.model.meshes.len()) {
            let mesh = &content.model.meshes[i];
            let mut wanted = [None; 3];
            if let Some(keys) = mesh.surface.textures {
                for key in keys {
                    if self.textures.contains_key(&key) {
                        wanted[channel_index(key.channel)] = Some(key);
                    }
                }
            }
            if self.meshes[i].bound != wanted {
                let bind_group = self.mesh_bind_group(device, &self.meshes[i].uniforms, &wanted);
                self.meshes[i].bind_group = bind_group;
                self.meshes[i].bound = wanted;
            }
            queue.write_buffer(
                &self.meshes[i].uniforms,
                0,
                bytemuck::bytes_of(&MeshUniforms::new(mesh, offset)),
            );
        }
    }
}

/// One frame of the model viewer.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub(super) camera: OrbitCamera,
    pub(super) content: ViewerContent,
}

impl shader::Primitive for Primitive {
    type Pipeline = Pipeline;

    fn prepare(
        &self,
        pipeline: &mut Self::Pipeline,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bounds: &Rectangle,
        viewport: &Viewport,
    ) {
        pipeline.ensure_depth(device, viewport);

        let scale = viewport.scale_factor();
        pipeline.last_bounds = (
            bounds.x * scale,
            bounds.y * scale,
            (bounds.width * scale).max(1.0),
            (bounds.height * scale).max(1.0),
        );

        let aspect = bounds.width / bounds.height.max(1.0);
        let frame = FrameUniforms::new(&self.camera, aspect);
        queue.write_buffer(&pipeline.frame_uniforms, 0, bytemuck::bytes_of(&frame));

        pipeline.sync_textures(device, queue, &self.content);
        pipeline.sync_geometry(device, &self.content);
        pipeline.sync_materials(device, queue, &self.content);
    }

    fn draw(&self, _pipeline: &Self::Pipeline, _render_pass: &mut wgpu::RenderPass<'_>) -> bool {
        // Drawn in `render`, which owns the depth attachment.
        false
    }

    fn render(
        &self,
        pipeline: &Self::Pipeline,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        let Some(depth) = pipeline.depth.as_ref() else {
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Model Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let (bx, by, bw, bh) = pipeline.last_bounds;
        render_pass.set_viewport(bx, by, bw, bh, 0.0, 1.0);
        render_pass.set_scissor_rect(
            clip_bounds.x,
            clip_bounds.y,
            clip_bounds.width,
            clip_bounds.height,
        );

        render_pass.set_pipeline(&pipeline.pipeline);
        render_pass.set_bind_group(0, &pipeline.frame_bind_group, &[]);
        for mesh in pipeline.meshes.iter().filter(|mesh| mesh.index_count > 0) {
            render_pass.set_bind_group(1, &mesh.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));
            render_pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

/// Metallic-roughness shading with one ambient term and three directional
/// lights. Normal maps use a derivative-based tangent frame since the model
/// ships without tangents.
const MODEL_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    light_dirs: array<vec4<f32>, 3>,
    light_colors: array<vec4<f32>, 3>,
}

struct Mesh {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    tint: vec4<f32>,
    params: vec4<f32>,
}

@group(0) @binding(0) var<uniform> frame: Frame;
@group(1) @binding(0) var<uniform> surface: Mesh;
@group(1) @binding(1) var base_color_map: texture_2d<f32>;
@group(1) @binding(2) var normal_map: texture_2d<f32>;
@group(1) @binding(3) var orm_map: texture_2d<f32>;
@group(1) @binding(4) var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = surface.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip = frame.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (surface.normal * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

const PI: f32 = 3.14159265;

fn perturb_normal(n: vec3<f32>, pos: vec3<f32>, uv: vec2<f32>, encoded: vec3<f32>) -> vec3<f32> {
    let dp1 = dpdx(pos);
    let dp2 = dpdy(pos);
    let duv1 = dpdx(uv);
    let duv2 = dpdy(uv);
    let dp2perp = cross(dp2, n);
    let dp1perp = cross(n, dp1);
    let t = dp2perp * duv1.x + dp1perp * duv2.x;
    let b = dp2perp * duv1.y + dp1perp * duv2.y;
    let inv_max = inverseSqrt(max(max(dot(t, t), dot(b, b)), 1e-12));
    let tangent_normal = vec3<f32>((encoded.xy * 2.0 - 1.0) * surface.params.zw, encoded.z * 2.0 - 1.0);
    return normalize(t * inv_max * tangent_normal.x + b * inv_max * tangent_normal.y + n * tangent_normal.z);
}

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / max(PI * d * d, 1e-6);
}

fn visibility_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    let gv = n_dot_v / (n_dot_v * (1.0 - k) + k);
    let gl = n_dot_l / (n_dot_l * (1.0 - k) + k);
    return gv * gl / max(4.0 * n_dot_v * n_dot_l, 1e-4);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(base_color_map, material_sampler, in.uv);
    let orm = textureSample(orm_map, material_sampler, in.uv).rgb;
    let normal_sample = textureSample(normal_map, material_sampler, in.uv).rgb;

    let albedo = base.rgb * surface.tint.rgb;
    let occlusion = orm.r;
    let roughness = clamp(surface.params.y * orm.g, 0.04, 1.0);
    let metalness = clamp(surface.params.x * orm.b, 0.0, 1.0);

    var n = normalize(in.normal);
    let v = normalize(frame.camera_pos.xyz - in.world_pos);
    if (dot(n, v) < 0.0) {
        n = -n;
    }
    n = perturb_normal(n, in.world_pos, in.uv, normal_sample);

    let f0 = mix(vec3<f32>(0.04), albedo, metalness);
    let diffuse = albedo * (1.0 - metalness);
    let n_dot_v = max(dot(n, v), 1e-4);

    var color = frame.ambient.rgb * diffuse * occlusion / PI;
    for (var i = 0u; i < 3u; i = i + 1u) {
        let l = normalize(frame.light_dirs[i].xyz);
        let n_dot_l = max(dot(n, l), 0.0);
        if (n_dot_l <= 0.0) {
            continue;
        }
        let h = normalize(l + v);
        let n_dot_h = max(dot(n, h), 0.0);
        let v_dot_h = max(dot(v, h), 0.0);
        let fresnel = f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - v_dot_h, 5.0);
        let specular = fresnel * distribution_ggx(n_dot_h, roughness) * visibility_smith(n_dot_v, n_dot_l, roughness);
        let kd = (vec3<f32>(1.0) - fresnel) * diffuse / PI;
        color = color + (kd + specular) * frame.light_colors[i].rgb * n_dot_l;
    }

    return vec4<f32>(min(color, vec3<f32>(1.0)), 1.0);
}
"#;
