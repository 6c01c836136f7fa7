use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use crate::types::ShaderCompiler;

/// Diagnostics longer than this are cut at the nearest character boundary.
pub const MAX_LOG_BYTES: usize = 512;

/// The two programmable stages of the fractal program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Stage::Vertex => VERTEX_SHADER_GLSL,
            Stage::Fragment => FRAGMENT_SHADER_GLSL,
        }
    }

    fn naga_stage(self) -> ShaderStage {
        match self {
            Stage::Vertex => ShaderStage::Vertex,
            Stage::Fragment => ShaderStage::Fragment,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile or link failure, carrying a bounded diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: Stage, log: String },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    pub fn compile(stage: Stage, message: &str) -> Self {
        ShaderError::Compile {
            stage,
            log: bounded_log(message),
        }
    }

    pub fn link(message: &str) -> Self {
        ShaderError::Link {
            log: bounded_log(message),
        }
    }
}

/// Truncates a diagnostic to at most [`MAX_LOG_BYTES`] bytes.
pub fn bounded_log(message: &str) -> String {
    let trimmed = message.trim_end();
    if trimmed.len() <= MAX_LOG_BYTES {
        return trimmed.to_string();
    }
    let mut end = MAX_LOG_BYTES;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Compiles one stage with the requested backend.
///
/// Module creation runs inside a validation error scope so a bad shader is
/// reported as a [`ShaderError`] instead of tripping the device's uncaptured
/// error handler.
pub(crate) fn compile_stage(
    device: &wgpu::Device,
    compiler: ShaderCompiler,
    stage: Stage,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let label = format!("fractal {stage}");
    let source = match compiler {
        ShaderCompiler::NagaGlsl => wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(stage.source()),
            stage: stage.naga_stage(),
            defines: &[],
        },
        ShaderCompiler::Shaderc => {
            wgpu::ShaderSource::SpirV(Cow::Owned(compile_spirv(stage)?))
        }
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source,
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::compile(stage, &error.to_string())),
        None => Ok(module),
    }
}

#[cfg(feature = "shaderc")]
fn compile_spirv(stage: Stage) -> Result<Vec<u32>, ShaderError> {
    let compiler = shaderc::Compiler::new()
        .map_err(|err| ShaderError::compile(stage, &format!("shaderc unavailable: {err}")))?;
    let mut options = shaderc::CompileOptions::new()
        .map_err(|err| ShaderError::compile(stage, &format!("shaderc options: {err}")))?;
    options.set_target_env(
        shaderc::TargetEnv::Vulkan,
        shaderc::EnvVersion::Vulkan1_0 as u32,
    );
    let kind = match stage {
        Stage::Vertex => shaderc::ShaderKind::Vertex,
        Stage::Fragment => shaderc::ShaderKind::Fragment,
    };
    let file_name = format!("fractal.{}", &stage.name()[..4]);
    let artifact = compiler
        .compile_into_spirv(stage.source(), kind, &file_name, "main", Some(&options))
        .map_err(|err| ShaderError::compile(stage, &err.to_string()))?;
    if artifact.get_num_warnings() > 0 {
        tracing::warn!(
            %stage,
            warnings = %artifact.get_warning_messages(),
            "shaderc reported warnings"
        );
    }
    Ok(artifact.as_binary().to_vec())
}

#[cfg(not(feature = "shaderc"))]
fn compile_spirv(stage: Stage) -> Result<Vec<u32>, ShaderError> {
    Err(ShaderError::compile(
        stage,
        "shaderc support is not enabled in this build",
    ))
}

/// Screen-quad vertex stage: forwards position and texture coordinate.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_texcoord;

layout(location = 0) out vec2 v_texcoord;

void main() {
    gl_Position = vec4(a_position, 1.0);
    v_texcoord = a_texcoord;
}
";

/// Escape-time fragment stage.
///
/// The uniform block layout must match `FractalUniforms` in `gpu/uniforms.rs`,
/// and the arithmetic mirrors the CPU reference in the `fractal` crate
/// operation for operation.
pub const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform FractalParams {
    vec2 center;
    vec2 screen_size;
    float screen_ratio;
    float zoom;
    int itr;
    int pwr;
    int mode;
} params;

layout(set = 1, binding = 0) uniform texture2D overlay_texture;
layout(set = 1, binding = 1) uniform sampler overlay_sampler;

const vec2 JULIA_CONSTANT = vec2(0.6, 0.55);
const float OVERLAY_THRESHOLD = 0.1;

vec4 map_to_color(float t) {
    float s = 1.0 - t;
    float r = 9.0 * s * t * t * t;
    float g = 15.0 * s * s * t * t;
    float b = 8.5 * s * s * s * t;
    return vec4(r, g, b, 1.0);
}

void main() {
    // Sample before the escape loop so the lookup stays in uniform control flow.
    vec4 overlay = texture(sampler2D(overlay_texture, overlay_sampler), v_texcoord);

    // wgpu puts the origin at the top-left; measure y from the bottom edge.
    vec2 frag = vec2(gl_FragCoord.x, params.screen_size.y - gl_FragCoord.y);

    vec2 c = vec2(
        params.screen_ratio * (frag.x / params.screen_size.x - 0.5),
        frag.y / params.screen_size.y - 0.5
    );
    c = c / params.zoom + params.center;

    // mode is a 0/1 selector: z0 = m*c, k = (1-m)*c + m*JULIA_CONSTANT.
    float m = float(params.mode);
    vec2 z = c * m;
    vec2 k = c * (1.0 - m) + JULIA_CONSTANT * m;

    int i;
    for (i = 0; i < params.itr; i++) {
        vec2 w = z;
        for (int p = 1; p < params.pwr; p++) {
            w = vec2(w.x * z.x - w.y * z.y, w.x * z.y + w.y * z.x);
        }
        w += k;
        if (w.x * w.x + w.y * w.y > 4.0) {
            break;
        }
        z = w;
    }

    float t = float(i) / float(params.itr);

    if (overlay.x > OVERLAY_THRESHOLD) {
        out_color = overlay;
    } else {
        out_color = map_to_color(t);
    }
}
";

/// Parses `stage` with naga's GLSL frontend and validates the module.
#[cfg(test)]
pub(crate) fn validated_module(stage: Stage) -> wgpu::naga::Module {
    use wgpu::naga::front::glsl::{Frontend, Options};
    use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

    let module = Frontend::default()
        .parse(&Options::from(stage.naga_stage()), stage.source())
        .unwrap_or_else(|err| panic!("{stage} stage failed to parse: {err:?}"));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|err| panic!("{stage} stage failed validation: {err:?}"));
    module
}
