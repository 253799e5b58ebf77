use crate::error::RenderError;
use crate::shaders;
use crate::textures::{GpuTextures, TexelSpace};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use sketchbook_assets::{AssetId, FallbackKind, TextureCache};
use sketchbook_common::{CanvasSize, Color};
use sketchbook_render::{
    DrawItem, DrawList2d, Frame, LineStrip, Material, MeshData, SceneAssets, SceneFrame, Shape2d,
    tessellate,
};
use wgpu::util::DeviceExt;

/// Color outside a letterboxed canvas.
const LETTERBOX: Color = Color::BLACK;

const INITIAL_INSTANCES: u64 = 256;
const INITIAL_CANVAS_VERTICES: u64 = 1024;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    ambient: [f32; 4],
    /// w is 1 when a point light is present.
    light_position: [f32; 4],
    light_color: [f32; 4],
    canvas_size: [f32; 4],
}

impl FrameUniforms {
    fn for_scene(scene: &SceneFrame) -> Self {
        let lighting = &scene.lighting;
        let [ar, ag, ab, _] = lighting.ambient.to_linear_array();
        let k = lighting.ambient_intensity;
        let (light_position, light_color) = match lighting.point {
            Some(light) => {
                let [r, g, b, _] = light.color.to_linear_array();
                let i = light.intensity;
                (light.position.extend(1.0).to_array(), [r * i, g * i, b * i, 1.0])
            }
            None => ([0.0; 4], [0.0; 4]),
        };
        Self {
            view_proj: scene.view_proj.to_cols_array_2d(),
            camera_position: scene.camera_position.extend(1.0).to_array(),
            ambient: [ar * k, ag * k, ab * k, 1.0],
            light_position,
            light_color,
            canvas_size: [0.0; 4],
        }
    }

    fn for_canvas(size: CanvasSize) -> Self {
        let mut uniforms = Self::zeroed();
        uniforms.canvas_size = [size.width, size.height, 0.0, 0.0];
        uniforms
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct MaterialUniforms {
    specular: [f32; 4],
    params: [f32; 4],
}

impl MaterialUniforms {
    fn new(material: &Material) -> Self {
        let [r, g, b, _] = material.specular_color.to_linear_array();
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        let bump_scale = if material.bump.is_some() {
            material.bump_scale
        } else {
            0.0
        };
        Self {
            specular: [r, g, b, material.shininess],
            params: [
                bump_scale,
                material.opacity,
                flag(material.unlit),
                flag(material.specular.is_some()),
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Line-list vertices for every strip, two per segment.
fn line_vertices(lines: &[LineStrip]) -> Vec<LineVertex> {
    lines
        .iter()
        .flat_map(|strip| {
            let color = strip.color.to_linear_array();
            strip.segments().flat_map(move |(a, b)| {
                [
                    LineVertex {
                        position: a.to_array(),
                        color,
                    },
                    LineVertex {
                        position: b.to_array(),
                        color,
                    },
                ]
            })
        })
        .collect()
}

/// Pixel rectangle of the surface a canvas is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Largest centred rectangle with the canvas's aspect that fits the surface.
pub fn letterbox(surface_width: u32, surface_height: u32, canvas: CanvasSize) -> Viewport {
    let (w, h) = (surface_width.max(1) as f32, surface_height.max(1) as f32);
    let scale = (w / canvas.width).min(h / canvas.height);
    let (width, height) = (canvas.width * scale, canvas.height * scale);
    Viewport {
        x: (w - width) / 2.0,
        y: (h - height) / 2.0,
        width,
        height,
    }
}

/// Split draws into opaque (submission order) and transparent (far to near).
fn partition_draws(
    draws: &[DrawItem],
    eye: Vec3,
    is_transparent: impl Fn(&DrawItem) -> bool,
) -> (Vec<usize>, Vec<usize>) {
    let (mut transparent, opaque): (Vec<usize>, Vec<usize>) =
        (0..draws.len()).partition(|&i| is_transparent(&draws[i]));
    let distance = |i: usize| draws[i].model.w_axis.truncate().distance_squared(eye);
    transparent.sort_by(|&a, &b| distance(b).total_cmp(&distance(a)));
    (opaque, transparent)
}

fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.to_linear_array();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    lit: bool,
}

struct GpuMaterial {
    bind_group: wgpu::BindGroup,
    transparent: bool,
}

struct Pipelines {
    canvas: wgpu::RenderPipeline,
    colored: wgpu::RenderPipeline,
    lit: wgpu::RenderPipeline,
    lit_transparent: wgpu::RenderPipeline,
    line: wgpu::RenderPipeline,
    background: wgpu::RenderPipeline,
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    module: &'a wgpu::ShaderModule,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    /// Depth write and compare; `None` for passes without a depth buffer.
    depth: Option<(bool, wgpu::CompareFunction)>,
}

const CANVAS_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
const COLOR_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
const LIT_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
const COLORED_INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];
const LIT_INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

fn vertex_layout<V>(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<V>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

fn instance_layout(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

/// Compile WGSL inside a validation scope so errors come back as values.
fn create_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::ShaderCompile {
            label: label.to_string(),
            message: error.to_string(),
        });
    }
    Ok(module)
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.module,
            entry_point: Some("vs_main"),
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: spec.depth.map(|(write, compare)| wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// wgpu backend for canvas and scene frames.
pub struct WgpuRenderer {
    pipelines: Pipelines,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    background_layout: wgpu::BindGroupLayout,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    canvas_buffer: wgpu::Buffer,
    canvas_capacity: u64,
    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
    default_material: GpuMaterial,
    lines: Option<(wgpu::Buffer, u32)>,
    background: Option<wgpu::BindGroup>,
    textures: GpuTextures,
    depth_texture: wgpu::TextureView,
    size: (u32, u32),
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let canvas_shader = create_shader(device, "canvas_shader", shaders::CANVAS_SHADER)?;
        let colored_shader = create_shader(device, "colored_shader", shaders::COLORED_SHADER)?;
        let lit_shader = create_shader(device, "lit_shader", shaders::LIT_SHADER)?;
        let line_shader = create_shader(device, "line_shader", shaders::LINE_SHADER)?;
        let background_shader =
            create_shader(device, "background_shader", shaders::BACKGROUND_SHADER)?;

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                sampler_entry(4),
            ],
        });
        let background_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("background_bind_group_layout"),
                entries: &[texture_entry(0), sampler_entry(1)],
            });

        let frame_only = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("background_pipeline_layout"),
                bind_group_layouts: &[&background_layout],
                push_constant_ranges: &[],
            });

        let lit_buffers = [
            vertex_layout::<sketchbook_render::LitVertex>(&LIT_ATTRS),
            instance_layout(&LIT_INSTANCE_ATTRS),
        ];
        let pipelines = Pipelines {
            canvas: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "canvas_pipeline",
                    layout: &frame_only,
                    module: &canvas_shader,
                    buffers: &[vertex_layout::<sketchbook_render::CanvasVertex>(&CANVAS_ATTRS)],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    depth: None,
                },
            ),
            colored: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "colored_pipeline",
                    layout: &frame_only,
                    module: &colored_shader,
                    buffers: &[
                        vertex_layout::<sketchbook_render::ColorVertex>(&COLOR_ATTRS),
                        instance_layout(&COLORED_INSTANCE_ATTRS),
                    ],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    depth: Some((true, wgpu::CompareFunction::Less)),
                },
            ),
            lit: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "lit_pipeline",
                    layout: &lit_layout,
                    module: &lit_shader,
                    buffers: &lit_buffers,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    depth: Some((true, wgpu::CompareFunction::Less)),
                },
            ),
            lit_transparent: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "lit_transparent_pipeline",
                    layout: &lit_layout,
                    module: &lit_shader,
                    buffers: &lit_buffers,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    depth: Some((false, wgpu::CompareFunction::Less)),
                },
            ),
            line: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "line_pipeline",
                    layout: &frame_only,
                    module: &line_shader,
                    buffers: &[vertex_layout::<LineVertex>(&COLOR_ATTRS)],
                    topology: wgpu::PrimitiveTopology::LineList,
                    cull_mode: None,
                    depth: Some((true, wgpu::CompareFunction::Less)),
                },
            ),
            background: create_pipeline(
                device,
                surface_format,
                PipelineSpec {
                    label: "background_pipeline",
                    layout: &background_pipeline_layout,
                    module: &background_shader,
                    buffers: &[],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    depth: Some((false, wgpu::CompareFunction::Always)),
                },
            ),
        };

        let instance_capacity = INITIAL_INSTANCES;
        let instance_buffer = Self::create_vertex_buffer(
            device,
            "instance_buffer",
            instance_capacity * std::mem::size_of::<InstanceRaw>() as u64,
        );
        let canvas_capacity = INITIAL_CANVAS_VERTICES;
        let canvas_buffer = Self::create_vertex_buffer(
            device,
            "canvas_vertex_buffer",
            canvas_capacity * std::mem::size_of::<sketchbook_render::CanvasVertex>() as u64,
        );

        let textures = GpuTextures::new(device, queue);
        let default_material = Self::create_material(
            device,
            &material_layout,
            &textures,
            &Material::default(),
            [textures.white(); 3],
        );
        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::info!(format = ?surface_format, width, height, "wgpu renderer ready");
        Ok(Self {
            pipelines,
            frame_buffer,
            frame_bind_group,
            material_layout,
            background_layout,
            instance_buffer,
            instance_capacity,
            canvas_buffer,
            canvas_capacity,
            meshes: Vec::new(),
            materials: Vec::new(),
            default_material,
            lines: None,
            background: None,
            textures,
            depth_texture,
            size: (width.max(1), height.max(1)),
            surface_format,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
        self.size = (width.max(1), height.max(1));
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Upload a sketch's static meshes, materials, lines and background,
    /// replacing whatever scene was uploaded before.
    pub fn upload_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets: &SceneAssets,
        cache: &mut TextureCache,
    ) -> Result<(), RenderError> {
        assets
            .validate()
            .map_err(|(key, source)| RenderError::Mesh { key: key.0, source })?;

        self.meshes = assets
            .meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| Self::create_mesh(device, i, mesh))
            .collect();

        let mut materials = Vec::with_capacity(assets.materials.len());
        for material in &assets.materials {
            let albedo = material
                .albedo
                .as_deref()
                .map(|p| {
                    self.textures
                        .resolve(device, queue, cache, Some(p), FallbackKind::Albedo)
                })
                .transpose()?;
            let bump = self.textures.resolve(
                device,
                queue,
                cache,
                material.bump.as_deref(),
                FallbackKind::Bump,
            )?;
            let specular = self.textures.resolve(
                device,
                queue,
                cache,
                material.specular.as_deref(),
                FallbackKind::Specular,
            )?;
            let views = [
                self.texture_view(albedo),
                self.texture_view(Some(bump)),
                self.texture_view(Some(specular)),
            ];
            materials.push(Self::create_material(
                device,
                &self.material_layout,
                &self.textures,
                material,
                views,
            ));
        }
        self.materials = materials;

        let vertices = line_vertices(&assets.lines);
        self.lines = (!vertices.is_empty()).then(|| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("line_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            (buffer, vertices.len() as u32)
        });

        self.background = match assets.background.as_deref() {
            Some(path) => {
                let key = self.textures.resolve(
                    device,
                    queue,
                    cache,
                    Some(path),
                    FallbackKind::Albedo,
                )?;
                let view = self.texture_view(Some(key));
                Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("background_bind_group"),
                    layout: &self.background_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(self.textures.sampler()),
                        },
                    ],
                }))
            }
            None => None,
        };

        tracing::info!(
            meshes = self.meshes.len(),
            materials = self.materials.len(),
            textures = self.textures.len(),
            line_vertices = vertices.len(),
            "scene uploaded"
        );
        Ok(())
    }

    /// Draw one frame into `view` and submit it.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        match frame {
            Frame::Canvas(list) => {
                self.render_canvas(device, queue, view, list);
                Ok(())
            }
            Frame::Scene(scene) => self.render_scene(device, queue, view, scene),
        }
    }

    fn render_canvas(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        list: &DrawList2d,
    ) {
        let mut backdrop = DrawList2d::new(list.size, list.clear);
        backdrop.push(Shape2d::Rect {
            x: 0.0,
            y: 0.0,
            width: list.size.width,
            height: list.size.height,
            color: list.clear,
        });
        let mut vertices = tessellate(&backdrop);
        vertices.extend(tessellate(list));

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::for_canvas(list.size)),
        );
        let needed = vertices.len() as u64;
        if needed > self.canvas_capacity {
            self.canvas_capacity = needed.next_power_of_two();
            self.canvas_buffer = Self::create_vertex_buffer(
                device,
                "canvas_vertex_buffer",
                self.canvas_capacity * std::mem::size_of::<sketchbook_render::CanvasVertex>() as u64,
            );
        }
        queue.write_buffer(&self.canvas_buffer, 0, bytemuck::cast_slice(&vertices));

        let viewport = letterbox(self.size.0, self.size.1, list.size);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("canvas_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("canvas_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(LETTERBOX)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_viewport(
                viewport.x,
                viewport.y,
                viewport.width,
                viewport.height,
                0.0,
                1.0,
            );
            pass.set_pipeline(&self.pipelines.canvas);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.canvas_buffer.slice(..));
            pass.draw(0..vertices.len() as u32, 0..1);
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn render_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &SceneFrame,
    ) -> Result<(), RenderError> {
        if let Some(bad) = scene
            .draws
            .iter()
            .find(|d| d.mesh.0 as usize >= self.meshes.len())
        {
            return Err(RenderError::UnknownMesh(bad.mesh.0));
        }

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::for_scene(scene)),
        );

        let instances: Vec<InstanceRaw> = scene
            .draws
            .iter()
            .map(|d| InstanceRaw {
                model: d.model.to_cols_array_2d(),
            })
            .collect();
        let needed = instances.len() as u64;
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer = Self::create_vertex_buffer(
                device,
                "instance_buffer",
                self.instance_capacity * std::mem::size_of::<InstanceRaw>() as u64,
            );
            tracing::debug!(capacity = self.instance_capacity, "instance buffer grown");
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let (opaque, transparent) = partition_draws(&scene.draws, scene.camera_position, |d| {
            self.meshes[d.mesh.0 as usize].lit && self.material_for(d).transparent
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.clear)),
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

            if let Some(background) = &self.background {
                pass.set_pipeline(&self.pipelines.background);
                pass.set_bind_group(0, background, &[]);
                pass.draw(0..3, 0..1);
            }

            if let Some((buffer, count)) = &self.lines {
                pass.set_pipeline(&self.pipelines.line);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..*count, 0..1);
            }

            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (i, transparent) in opaque
                .iter()
                .map(|&i| (i, false))
                .chain(transparent.iter().map(|&i| (i, true)))
            {
                let draw = &scene.draws[i];
                let mesh = &self.meshes[draw.mesh.0 as usize];
                if mesh.lit {
                    let pipeline = if transparent {
                        &self.pipelines.lit_transparent
                    } else {
                        &self.pipelines.lit
                    };
                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(1, &self.material_for(draw).bind_group, &[]);
                } else {
                    pass.set_pipeline(&self.pipelines.colored);
                }
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                let instance = i as u32;
                pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn material_for(&self, draw: &DrawItem) -> &GpuMaterial {
        draw.material
            .and_then(|key| self.materials.get(key.0 as usize))
            .unwrap_or(&self.default_material)
    }

    fn texture_view(&self, key: Option<(AssetId, TexelSpace)>) -> &wgpu::TextureView {
        key.and_then(|k| self.textures.view(k))
            .unwrap_or(self.textures.white())
    }

    fn create_mesh(device: &wgpu::Device, index: usize, mesh: &MeshData) -> GpuMesh {
        let (vertex_bytes, indices, lit): (&[u8], &[u16], bool) = match mesh {
            MeshData::Colored(m) => (bytemuck::cast_slice(&m.vertices), m.indices.as_slice(), false),
            MeshData::Lit(m) => (bytemuck::cast_slice(&m.vertices), m.indices.as_slice(), true),
        };
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("mesh_{index}_vertices")),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("mesh_{index}_indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            lit,
        }
    }

    fn create_material(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        textures: &GpuTextures,
        material: &Material,
        [albedo, bump, specular]: [&wgpu::TextureView; 3],
    ) -> GpuMaterial {
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("material_{}", material.name)),
            contents: bytemuck::bytes_of(&MaterialUniforms::new(material)),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&material.name),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(albedo),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(bump),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(specular),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(textures.sampler()),
                },
            ],
        });
        GpuMaterial {
            bind_group,
            transparent: material.transparent,
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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
    use glam::Mat4;
    use sketchbook_render::{Lighting, MaterialKey, MeshKey, PointLight};

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 144);
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 32);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    }

    #[test]
    fn letterbox_keeps_canvas_aspect() {
        let canvas = CanvasSize::new(600.0, 300.0);
        let wide = letterbox(1200, 300, canvas);
        assert_eq!(
            wide,
            Viewport {
                x: 300.0,
                y: 0.0,
                width: 600.0,
                height: 300.0
            }
        );
        let tall = letterbox(600, 600, canvas);
        assert_eq!(tall.y, 150.0);
        assert_eq!(tall.width, 600.0);
        let exact = letterbox(1200, 600, canvas);
        assert_eq!((exact.x, exact.y, exact.width), (0.0, 0.0, 1200.0));
    }

    #[test]
    fn letterbox_survives_zero_sized_surface() {
        let vp = letterbox(0, 0, CanvasSize::new(600.0, 300.0));
        assert!(vp.width > 0.0 && vp.width <= 1.0);
    }

    #[test]
    fn lines_become_segment_pairs() {
        let strips = [
            LineStrip {
                points: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                color: Color::WHITE,
            },
            LineStrip {
                points: vec![Vec3::Z],
                color: Color::WHITE,
            },
        ];
        let vertices = line_vertices(&strips);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2], vertices[1]);
    }

    #[test]
    fn transparent_draws_sort_far_to_near() {
        let at = |x: f32, transparent: bool| DrawItem {
            mesh: MeshKey(0),
            material: transparent.then_some(MaterialKey(1)),
            model: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
        };
        let draws = [at(1.0, true), at(2.0, false), at(5.0, true), at(3.0, true)];
        let (opaque, transparent) =
            partition_draws(&draws, Vec3::ZERO, |d| d.material.is_some());
        assert_eq!(opaque, vec![1]);
        assert_eq!(transparent, vec![2, 3, 0]);
    }

    #[test]
    fn material_uniforms_flags() {
        let plain = MaterialUniforms::new(&Material::default());
        assert_eq!(plain.params, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(plain.specular[3], 30.0);

        let ring = MaterialUniforms::new(&Material {
            bump: Some("b.jpg".into()),
            bump_scale: 0.05,
            specular: Some("s.jpg".into()),
            opacity: 0.8,
            unlit: true,
            ..Material::default()
        });
        assert_eq!(ring.params, [0.05, 0.8, 1.0, 1.0]);
    }

    #[test]
    fn scene_uniforms_scale_light_by_intensity() {
        let scene = SceneFrame {
            clear: Color::BLACK,
            view_proj: Mat4::IDENTITY,
            camera_position: Vec3::new(5.0, 2.0, -1.3),
            lighting: Lighting {
                ambient: Color::WHITE,
                ambient_intensity: 0.4,
                point: Some(PointLight {
                    position: Vec3::ZERO,
                    color: Color::WHITE,
                    intensity: 2.0,
                }),
            },
            draws: Vec::new(),
        };
        let u = FrameUniforms::for_scene(&scene);
        assert_eq!(u.light_position[3], 1.0);
        assert_eq!(u.light_color, [2.0, 2.0, 2.0, 1.0]);
        assert!((u.ambient[0] - 0.4).abs() < 1e-6);
        assert_eq!(u.camera_position, [5.0, 2.0, -1.3, 1.0]);

        let dark = FrameUniforms::for_scene(&SceneFrame {
            lighting: Lighting::default(),
            ..scene
        });
        assert_eq!(dark.light_position[3], 0.0);
    }

    #[test]
    fn canvas_uniforms_carry_size_only() {
        let u = FrameUniforms::for_canvas(CanvasSize::new(600.0, 300.0));
        assert_eq!(u.canvas_size, [600.0, 300.0, 0.0, 0.0]);
        assert_eq!(u.view_proj, [[0.0; 4]; 4]);
    }
}
