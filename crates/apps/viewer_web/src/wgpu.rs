#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use std::collections::HashMap;

    use foundation::ids::{BufferId, TextureId};
    use foundation::math::sphere_point;
    use gpu::{
        DecodedImage, GpuError, GpuResources, RenderCommand, RenderFrame, Residency,
        ResidencyLedger,
    };
    use scene::components::Rgb;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::camera::Mat4;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;
    const GLOBE_SEGMENTS: u32 = 128;

    #[derive(Debug)]
    struct GpuTexture {
        texture: ::wgpu::Texture,
        bind_group: ::wgpu::BindGroup,
    }

    /// Browser GPU backend. Owns every buffer and texture the session
    /// allocates and destroys them eagerly on release.
    #[derive(Debug)]
    pub struct WgpuGpu {
        _instance: &'static ::wgpu::Instance,
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        _canvas: web_sys::HtmlCanvasElement,
        globe_pipeline: ::wgpu::RenderPipeline,
        lines_pipeline: ::wgpu::RenderPipeline,
        points_pipeline: ::wgpu::RenderPipeline,
        globals_buffer: ::wgpu::Buffer,
        globals_bind_group: ::wgpu::BindGroup,
        texture_layout: ::wgpu::BindGroupLayout,
        sampler: ::wgpu::Sampler,
        placeholder: GpuTexture,
        depth_view: ::wgpu::TextureView,
        sphere_vertices: ::wgpu::Buffer,
        sphere_indices: ::wgpu::Buffer,
        sphere_index_count: u32,
        buffers: HashMap<BufferId, ::wgpu::Buffer>,
        textures: HashMap<TextureId, GpuTexture>,
        ledger: ResidencyLedger,
    }

    const GLOBE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    line_color: vec4<f32>,
    point_color: vec4<f32>,
    globe: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var surface_tex: texture_2d<f32>;
@group(1) @binding(1)
var surface_sampler: sampler;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position * globals.globe.x, 1.0), uv);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    // Unlit: the covering is shown as authored.
    return textureSample(surface_tex, surface_sampler, fs_in.uv);
}
"#;

    const LINES_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    line_color: vec4<f32>,
    point_color: vec4<f32>,
    globe: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.view_proj * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return globals.line_color;
}
"#;

    const POINTS_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    line_color: vec4<f32>,
    point_color: vec4<f32>,
    globe: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.view_proj * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return globals.point_color;
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct GlobeVertex {
        position: [f32; 3],
        uv: [f32; 2],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        line_color: [f32; 4],
        point_color: [f32; 4],
        /// `x` is the globe radius.
        globe: [f32; 4],
    }

    fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Material colors are authored in sRGB; the surface is an sRGB target.
    fn linear_rgba(color: Rgb, alpha: f32) -> [f32; 4] {
        let [r, g, b, a] = color.to_rgba(alpha);
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere with equirectangular UVs: `u = 0` at -180° longitude,
    /// `v = 0` at the north pole. Positions use the same lat/lon mapping as
    /// the point grid so textures and points line up.
    fn generate_globe_mesh(segments: u32) -> (Vec<GlobeVertex>, Vec<u16>) {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
        for row in 0..=segments {
            let v = row as f64 / segments as f64;
            let lat = std::f64::consts::FRAC_PI_2 - v * std::f64::consts::PI;
            let (sin_lat, cos_lat) = lat.sin_cos();
            for col in 0..=segments {
                let u = col as f64 / segments as f64;
                let lon = -std::f64::consts::PI + u * std::f64::consts::TAU;
                vertices.push(GlobeVertex {
                    position: sphere_point(cos_lat, sin_lat, lon, 1.0).to_f32_array(),
                    uv: [u as f32, v as f32],
                });
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for row in 0..segments {
            for col in 0..segments {
                let i0 = row * stride + col;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                indices.extend([i0, i2, i1, i1, i2, i3].map(|i| i as u16));
            }
        }
        (vertices, indices)
    }

    fn overlay_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        source: &'static str,
        format: ::wgpu::TextureFormat,
        topology: ::wgpu::PrimitiveTopology,
        label: &str,
    ) -> ::wgpu::RenderPipeline {
        let shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
        });
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: (3 * std::mem::size_of::<f32>()) as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[::wgpu::VertexAttribute {
                        format: ::wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Tested against the globe so the far side stays hidden, but
            // translucent overlays never write depth.
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn upload_texture(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        layout: &::wgpu::BindGroupLayout,
        sampler: &::wgpu::Sampler,
        label: &str,
        image: &DecodedImage,
    ) -> GpuTexture {
        let size = ::wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            ::wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: ::wgpu::Origin3d::ZERO,
                aspect: ::wgpu::TextureAspect::All,
            },
            image.pixels(),
            ::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            size,
        );
        let view = texture.create_view(&::wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ::wgpu::BindingResource::TextureView(&view),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        GpuTexture {
            texture,
            bind_group,
        }
    }

    pub async fn init_wgpu_from_canvas_id(canvas_id: &str) -> Result<WgpuGpu, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // The surface must not outlive its instance, so the instance lives
        // for the whole page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().cloned())
            .ok_or_else(|| JsValue::from_str("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .cloned()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-globals-bgl"),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &globals_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-texture-bgl"),
            entries: &[
                ::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: ::wgpu::AddressMode::Repeat,
            address_mode_v: ::wgpu::AddressMode::ClampToEdge,
            mag_filter: ::wgpu::FilterMode::Linear,
            min_filter: ::wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let globe_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            immediate_size: 0,
        });
        let overlay_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("overlay-pipeline-layout"),
            bind_group_layouts: &[&globals_layout],
            immediate_size: 0,
        });

        let globe_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(GLOBE_SHADER)),
        });

        let globe_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-pipeline"),
            layout: Some(&globe_layout),
            vertex: ::wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GlobeVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x2,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::REPLACE),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let lines_pipeline = overlay_pipeline(
            &device,
            &overlay_layout,
            LINES_SHADER,
            config.format,
            ::wgpu::PrimitiveTopology::LineList,
            "graticule-pipeline",
        );
        // WebGPU point primitives are always one pixel wide.
        let points_pipeline = overlay_pipeline(
            &device,
            &overlay_layout,
            POINTS_SHADER,
            config.format,
            ::wgpu::PrimitiveTopology::PointList,
            "grid-points-pipeline",
        );

        let (vertices, indices) = generate_globe_mesh(GLOBE_SEGMENTS);
        let sphere_vertices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let sphere_indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        // Mid-grey until the first covering arrives.
        let placeholder_image = DecodedImage::solid(1, 1, [128, 128, 128, 255])
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let placeholder = upload_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            "globe-placeholder",
            &placeholder_image,
        );

        Ok(WgpuGpu {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            globe_pipeline,
            lines_pipeline,
            points_pipeline,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            sampler,
            placeholder,
            depth_view,
            sphere_vertices,
            sphere_indices,
            sphere_index_count: indices.len() as u32,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            ledger: ResidencyLedger::new(),
        })
    }

    impl WgpuGpu {
        pub fn resize(&mut self, width: u32, height: u32) {
            self.config.width = width.max(1);
            self.config.height = height.max(1);
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }

        pub fn max_texture_dimension(&self) -> u32 {
            self.device.limits().max_texture_dimension_2d
        }

        /// Encodes one frame: clear, then each command in order.
        pub fn render(
            &self,
            frame: &RenderFrame,
            view_proj: Mat4,
            background: Rgb,
        ) -> Result<(), JsValue> {
            let mut globals = Globals {
                view_proj,
                line_color: [0.0; 4],
                point_color: [0.0; 4],
                globe: [1.0, 0.0, 0.0, 0.0],
            };
            for command in &frame.commands {
                match command {
                    RenderCommand::Globe { radius, .. } => globals.globe[0] = *radius as f32,
                    RenderCommand::Lines { material, .. } => {
                        globals.line_color = linear_rgba(material.color, material.opacity)
                    }
                    RenderCommand::Points { material, .. } => {
                        globals.point_color = linear_rgba(material.color, material.opacity)
                    }
                }
            }
            self.queue
                .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

            let surface_texture = self
                .surface
                .get_current_texture()
                .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
            let view = surface_texture
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            let mut encoder = self
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("globe-frame-encoder"),
                });

            let [r, g, b, _] = linear_rgba(background, 1.0);
            {
                let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                    label: Some("globe-frame-pass"),
                    color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        depth_slice: None,
                        ops: ::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                                r: r as f64,
                                g: g as f64,
                                b: b as f64,
                                a: 1.0,
                            }),
                            store: ::wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(1.0),
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });
                rpass.set_bind_group(0, &self.globals_bind_group, &[]);

                for command in &frame.commands {
                    match command {
                        RenderCommand::Globe { texture, .. } => {
                            let covering = texture
                                .and_then(|id| self.textures.get(&id))
                                .unwrap_or(&self.placeholder);
                            rpass.set_pipeline(&self.globe_pipeline);
                            rpass.set_bind_group(1, &covering.bind_group, &[]);
                            rpass.set_vertex_buffer(0, self.sphere_vertices.slice(..));
                            rpass.set_index_buffer(
                                self.sphere_indices.slice(..),
                                ::wgpu::IndexFormat::Uint16,
                            );
                            rpass.draw_indexed(0..self.sphere_index_count, 0, 0..1);
                        }
                        RenderCommand::Lines {
                            buffer,
                            vertex_count,
                            ..
                        } => {
                            if let Some(buf) = self.buffers.get(buffer) {
                                rpass.set_pipeline(&self.lines_pipeline);
                                rpass.set_vertex_buffer(0, buf.slice(..));
                                rpass.draw(0..*vertex_count, 0..1);
                            }
                        }
                        RenderCommand::Points { buffer, count, .. } => {
                            if let Some(buf) = self.buffers.get(buffer) {
                                rpass.set_pipeline(&self.points_pipeline);
                                rpass.set_vertex_buffer(0, buf.slice(..));
                                rpass.draw(0..*count, 0..1);
                            }
                        }
                    }
                }
            }

            self.queue.submit(std::iter::once(encoder.finish()));
            surface_texture.present();
            Ok(())
        }
    }

    impl GpuResources for WgpuGpu {
        fn create_vertex_buffer(
            &mut self,
            label: &str,
            data: &[f32],
        ) -> Result<BufferId, GpuError> {
            if data.is_empty() {
                return Err(GpuError::EmptyBuffer {
                    label: label.to_string(),
                });
            }
            let bytes = std::mem::size_of_val(data);
            let limit = self.device.limits().max_buffer_size;
            if bytes as u64 > limit {
                return Err(GpuError::OutOfMemory {
                    requested: bytes,
                    resident: self.ledger.residency().total_bytes(),
                    limit: usize::try_from(limit).unwrap_or(usize::MAX),
                });
            }
            let buffer = self
                .device
                .create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(data),
                    usage: ::wgpu::BufferUsages::VERTEX,
                });
            let id = self.ledger.track_buffer(bytes);
            self.buffers.insert(id, buffer);
            Ok(id)
        }

        fn create_texture(
            &mut self,
            label: &str,
            image: &DecodedImage,
        ) -> Result<TextureId, GpuError> {
            let max = self.max_texture_dimension();
            if image.width() > max || image.height() > max {
                return Err(GpuError::Backend(format!(
                    "texture {label:?} is {}x{}, device limit is {max}",
                    image.width(),
                    image.height()
                )));
            }
            let texture = upload_texture(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                label,
                image,
            );
            let id = self.ledger.track_texture(image.byte_size());
            self.textures.insert(id, texture);
            Ok(id)
        }

        fn release_buffer(&mut self, id: BufferId) -> Result<(), GpuError> {
            self.ledger.untrack_buffer(id)?;
            if let Some(buffer) = self.buffers.remove(&id) {
                buffer.destroy();
            }
            Ok(())
        }

        fn release_texture(&mut self, id: TextureId) -> Result<(), GpuError> {
            self.ledger.untrack_texture(id)?;
            if let Some(texture) = self.textures.remove(&id) {
                texture.texture.destroy();
            }
            Ok(())
        }

        fn residency(&self) -> Residency {
            self.ledger.residency()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use foundation::ids::{BufferId, TextureId};
    use gpu::{DecodedImage, GpuError, GpuResources, HeadlessGpu, RenderFrame, Residency};
    use scene::components::Rgb;
    use wasm_bindgen::prelude::JsValue;

    use crate::camera::Mat4;

    /// Native stand-in: accounts resources like the browser backend but
    /// draws nothing.
    #[derive(Debug, Default)]
    pub struct WgpuGpu {
        inner: HeadlessGpu,
    }

    pub async fn init_wgpu_from_canvas_id(_canvas_id: &str) -> Result<WgpuGpu, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    impl WgpuGpu {
        pub fn resize(&mut self, _width: u32, _height: u32) {}

        pub fn max_texture_dimension(&self) -> u32 {
            2048
        }

        pub fn render(
            &self,
            _frame: &RenderFrame,
            _view_proj: Mat4,
            _background: Rgb,
        ) -> Result<(), JsValue> {
            Err(JsValue::from_str(
                "wgpu rendering is only available on wasm32 targets",
            ))
        }
    }

    impl GpuResources for WgpuGpu {
        fn create_vertex_buffer(
            &mut self,
            label: &str,
            data: &[f32],
        ) -> Result<BufferId, GpuError> {
            self.inner.create_vertex_buffer(label, data)
        }

        fn create_texture(
            &mut self,
            label: &str,
            image: &DecodedImage,
        ) -> Result<TextureId, GpuError> {
            self.inner.create_texture(label, image)
        }

        fn release_buffer(&mut self, id: BufferId) -> Result<(), GpuError> {
            self.inner.release_buffer(id)
        }

        fn release_texture(&mut self, id: TextureId) -> Result<(), GpuError> {
            self.inner.release_texture(id)
        }

        fn residency(&self) -> Residency {
            self.inner.residency()
        }
    }
}

pub use imp::{WgpuGpu, init_wgpu_from_canvas_id};
