//! Ten spinning cubes from one vertex buffer.
//!
//! A single 36-vertex colored cube is uploaded once; each frame draws it
//! ten times with a per-instance model matrix: a fixed 20 degree offset
//! per instance plus 50 degrees per second of wall-clock spin.

use glam::Vec3;
use render_harness::{
    Draw, GlWindow, GlowBackend, Harness, HarnessConfig, HarnessError, InstanceSet, MeshData,
    Scene, ShaderSource, SpinAnimation,
};

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;

out vec3 ourColor;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

void main() {
    gl_Position = projection * view * model * vec4(aPos, 1.0);
    ourColor = aColor;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
in vec3 ourColor;

out vec4 FragColor;

void main() {
    FragColor = vec4(ourColor, 1.0);
}
"#;

fn cube_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 5.0, -15.0),
        Vec3::new(-1.5, -2.2, -2.5),
        Vec3::new(-3.8, -2.0, -12.3),
        Vec3::new(2.4, -0.4, -3.5),
        Vec3::new(-1.7, 3.0, -7.5),
        Vec3::new(1.3, -2.0, -2.5),
        Vec3::new(1.5, 2.0, -2.5),
        Vec3::new(1.5, 0.2, -1.5),
        Vec3::new(-1.3, 1.0, -1.5),
    ]
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("startup failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), HarnessError> {
    let config = HarnessConfig {
        title: "spinning cubes".to_string(),
        clear_color: [0.1, 0.1, 0.12, 1.0],
        ..Default::default()
    };

    let window = GlWindow::new(&config)?;
    let driver = GlowBackend::new(window.load_gl());

    let mesh = MeshData::colored_cube();
    let draws = Draw::whole_mesh(&mesh);
    let scene = Scene {
        vertex_shader: ShaderSource::vertex(VERTEX_SHADER),
        fragment_shader: ShaderSource::fragment(FRAGMENT_SHADER),
        mesh,
        draws,
        instances: InstanceSet::new(cube_positions()),
        animation: SpinAnimation::new(Vec3::new(1.0, 0.3, 0.5), 20.0, 50.0),
        depth_test: true,
    };

    Harness::new(window, driver, config).run(scene)
}
