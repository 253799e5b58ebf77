/// 2D canvas triangles in pixel coordinates (origin top-left, y down).
pub const CANVAS_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    canvas_size: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct CanvasVertex {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct CanvasOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: CanvasVertex) -> CanvasOutput {
    let ndc = vec2<f32>(
        vertex.position.x / frame.canvas_size.x * 2.0 - 1.0,
        1.0 - vertex.position.y / frame.canvas_size.y * 2.0,
    );
    var out: CanvasOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: CanvasOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Per-vertex colored meshes. Colors arrive as display values and are shaded
/// to 80% before conversion to linear.
pub const COLORED_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    canvas_size: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    let low = c / 12.92;
    let high = pow((c + vec3<f32>(0.055)) / 1.055, vec3<f32>(2.4));
    return select(high, low, c <= vec3<f32>(0.04045));
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: VertexOutput;
    out.clip_position = frame.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = vec4<f32>(srgb_to_linear(vertex.color.rgb * 0.8), vertex.color.a);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Textured Blinn-Phong surfaces with optional bump and specular maps.
///
/// Bump mapping perturbs the interpolated normal with screen-space height
/// derivatives, so meshes need no tangents.
pub const LIT_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    canvas_size: vec4<f32>,
};

struct Material {
    // rgb: specular color (linear), a: shininess
    specular: vec4<f32>,
    // x: bump scale, y: opacity, z: unlit, w: use specular map
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> material: Material;
@group(1) @binding(1)
var albedo_map: texture_2d<f32>;
@group(1) @binding(2)
var bump_map: texture_2d<f32>;
@group(1) @binding(3)
var specular_map: texture_2d<f32>;
@group(1) @binding(4)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

fn height_gradient(uv: vec2<f32>) -> vec2<f32> {
    let scale = material.params.x;
    let duv_dx = dpdx(uv);
    let duv_dy = dpdy(uv);
    let h = scale * textureSample(bump_map, material_sampler, uv).x;
    let hx = scale * textureSample(bump_map, material_sampler, uv + duv_dx).x;
    let hy = scale * textureSample(bump_map, material_sampler, uv + duv_dy).x;
    return vec2<f32>(hx - h, hy - h);
}

fn perturb_normal(position: vec3<f32>, normal: vec3<f32>, gradient: vec2<f32>, face: f32) -> vec3<f32> {
    let sigma_x = dpdx(position);
    let sigma_y = dpdy(position);
    let r1 = cross(sigma_y, normal);
    let r2 = cross(normal, sigma_x);
    let det = dot(sigma_x, r1) * face;
    let grad = sign(det) * (gradient.x * r1 + gradient.y * r2);
    return normalize(abs(det) * normal - grad);
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let face = select(-1.0, 1.0, front);
    let albedo = textureSample(albedo_map, material_sampler, in.uv);
    let spec_sample = textureSample(specular_map, material_sampler, in.uv).x;
    let gradient = height_gradient(in.uv);

    let base_normal = normalize(in.world_normal) * face;
    let bumped = perturb_normal(in.world_position, base_normal, gradient, face);
    let normal = select(base_normal, bumped, material.params.x != 0.0);

    let to_light = normalize(frame.light_position.xyz - in.world_position);
    let to_eye = normalize(frame.camera_position.xyz - in.world_position);
    let half_dir = normalize(to_light + to_eye);
    let n_dot_l = max(dot(normal, to_light), 0.0) * frame.light_position.w;
    let n_dot_h = max(dot(normal, half_dir), 0.0);

    let shininess = material.specular.a;
    let spec_strength = select(1.0, spec_sample, material.params.w > 0.5);
    let specular = material.specular.rgb * spec_strength
        * pow(n_dot_h, shininess) * (shininess + 2.0) / 8.0 * n_dot_l;
    let diffuse = albedo.rgb * (frame.ambient.rgb + frame.light_color.rgb * n_dot_l);
    let lit = diffuse + specular * frame.light_color.rgb;

    let rgb = select(lit, albedo.rgb, material.params.z > 0.5);
    return vec4<f32>(rgb, albedo.a * material.params.y);
}
"#;

/// World-space line list with linear per-vertex colors.
pub const LINE_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    canvas_size: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = frame.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Full-screen triangle sampling the background texture.
pub const BACKGROUND_SHADER: &str = r#"
@group(0) @binding(0)
var background: texture_2d<f32>;
@group(0) @binding(1)
var background_sampler: sampler;

struct BackgroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> BackgroundOutput {
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: BackgroundOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 1.0, 1.0);
    out.uv = vec2<f32>(x, y);
    return out;
}

@fragment
fn fs_main(in: BackgroundOutput) -> @location(0) vec4<f32> {
    return textureSample(background, background_sampler, in.uv);
}
"#;
