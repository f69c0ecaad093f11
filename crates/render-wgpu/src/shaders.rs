/// Instanced unit-cube shader. `fs_lit` shades with the scene lights, `fs_unlit`
/// returns the flat instance colour for the light markers.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    light_pos: array<vec4<f32>, 4>,
    light_color: array<vec4<f32>, 4>,
    sun_dir: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_lit(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let sun = normalize(-uniforms.sun_dir.xyz);
    var light = vec3<f32>(0.15) + vec3<f32>(0.4) * max(dot(n, sun), 0.0);

    for (var i = 0u; i < 4u; i = i + 1u) {
        let to_light = uniforms.light_pos[i].xyz - in.world_pos;
        let dist = length(to_light);
        let atten = 1.0 / (1.0 + 0.09 * dist + 0.032 * dist * dist);
        let diffuse = max(dot(n, to_light / dist), 0.0);
        light = light + uniforms.light_color[i].rgb * diffuse * atten;
    }
    return vec4<f32>(in.color.rgb * light, in.color.a);
}

@fragment
fn fs_unlit(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Alpha-blended grass quad. Blade coverage is procedural so no texture is needed.
pub const GRASS_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    light_pos: array<vec4<f32>, 4>,
    light_color: array<vec4<f32>, 4>,
    sun_dir: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct QuadVertex {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct GrassOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_grass(vertex: QuadVertex, instance: InstanceInput) -> GrassOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: GrassOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_grass(in: GrassOutput) -> @location(0) vec4<f32> {
    // Five tapering blades across the quad.
    let cell = fract(in.uv.x * 5.0) - 0.5;
    let width = 0.45 * (1.0 - in.uv.y);
    let blade = 1.0 - smoothstep(width - 0.05, width, abs(cell));
    let alpha = blade * in.color.a;
    if (alpha < 0.1) {
        discard;
    }
    let shade = mix(0.6, 1.1, in.uv.y);
    return vec4<f32>(in.color.rgb * shade, alpha);
}
"#;
