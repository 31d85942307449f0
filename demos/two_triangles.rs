//! Two triangles sharing one quad's vertex buffer.
//!
//! Four vertices and six indices go up once; every frame issues two
//! indexed draws into different slices of the same index buffer while the
//! quad slowly tips over about the X axis.

use glam::Vec3;
use render_harness::{
    Draw, GlWindow, GlowBackend, Harness, HarnessConfig, HarnessError, InstanceSet, MeshData,
    Scene, ShaderSource, SpinAnimation,
};

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

void main() {
    gl_Position = projection * view * model * vec4(aPos, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
out vec4 FragColor;

void main() {
    FragColor = vec4(1.0, 0.0, 0.0, 1.0);
}
"#;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("startup failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), HarnessError> {
    let config = HarnessConfig {
        title: "two triangles".to_string(),
        ..Default::default()
    };

    let window = GlWindow::new(&config)?;
    let driver = GlowBackend::new(window.load_gl());

    let mesh = MeshData::quad();
    let scene = Scene {
        vertex_shader: ShaderSource::vertex(VERTEX_SHADER),
        fragment_shader: ShaderSource::fragment(FRAGMENT_SHADER),
        mesh,
        // One triangle per draw call; the second starts three indices
        // (twelve bytes) into the shared index buffer.
        draws: vec![
            Draw::Indexed {
                count: 3,
                byte_offset: 0,
            },
            Draw::Indexed {
                count: 3,
                byte_offset: 12,
            },
        ],
        instances: InstanceSet::single(),
        animation: SpinAnimation::new(Vec3::X, 0.0, 30.0),
        depth_test: false,
    };

    Harness::new(window, driver, config).run(scene)
}
