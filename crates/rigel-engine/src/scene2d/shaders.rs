//! Builtin GLSL 330 sources for the 2D quad techniques.
//!
//! Both vertex stages expand the unit-quad template by the per-instance
//! bounds: `position = bounds.xy + bounds.zw * corner`.

/// Uniform block both techniques read the scene transform from.
pub(crate) const SCENE_CONSTANTS_BLOCK: &str = "cbScene2D";

/// Sampler uniform of the textured technique.
pub(crate) const SCENE_SAMPLER: &str = "sTexture";

pub(crate) const QUAD_SOLID_VERT: &str = r#"#version 330 core

layout(std140) uniform cbScene2D {
    mat4 uTransform;
};

layout(location = 0) in vec2 avCorner;
layout(location = 1) in vec4 aiBounds;
layout(location = 2) in vec4 aiColor;

out vec4 vColor;

void main() {
    vec2 position = aiBounds.xy + aiBounds.zw * avCorner;
    gl_Position = uTransform * vec4(position, 0.0, 1.0);
    vColor = aiColor;
}
"#;

pub(crate) const QUAD_SOLID_FRAG: &str = r#"#version 330 core

in vec4 vColor;
out vec4 oColor;

void main() {
    oColor = vColor;
}
"#;

pub(crate) const QUAD_TEXTURED_VERT: &str = r#"#version 330 core

layout(std140) uniform cbScene2D {
    mat4 uTransform;
};

layout(location = 0) in vec2 avCorner;
layout(location = 1) in vec4 aiBounds;
layout(location = 2) in vec4 aiColor;
layout(location = 3) in vec4 aiUvBounds;
layout(location = 4) in uint aiLayer;

out vec4 vColor;
out vec3 vUv;

void main() {
    vec2 position = aiBounds.xy + aiBounds.zw * avCorner;
    gl_Position = uTransform * vec4(position, 0.0, 1.0);
    vColor = aiColor;
    vUv = vec3(aiUvBounds.xy + aiUvBounds.zw * avCorner, float(aiLayer));
}
"#;

pub(crate) const QUAD_TEXTURED_FRAG: &str = r#"#version 330 core

uniform sampler2DArray sTexture;

in vec4 vColor;
in vec3 vUv;
out vec4 oColor;

void main() {
    oColor = texture(sTexture, vUv) * vColor;
}
"#;
