//! Shared fixtures: shader sources and a scripted window for loop tests.
#![allow(dead_code)]

use render_harness::window::{WindowError, WindowSystem};
use winit::keyboard::KeyCode;

/// Vertex stage declaring the full transform chain and a color varying.
pub const VALID_VERT: &str = "\
#version 330 core
layout (location = 0) in vec3 aPos;

out vec3 ourColor;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

void main() { }
";

/// Fragment stage consuming the color varying.
pub const VALID_FRAG: &str = "\
#version 330 core
in vec3 ourColor;

out vec4 FragColor;

void main() { }
";

/// Fails compilation via a `#error` directive.
pub const BROKEN_FRAG: &str = "\
#version 330 core
#error deliberately broken
void main() { }
";

/// Compiles, but its input varying matches nothing the vertex stage emits.
pub const MISMATCHED_FRAG: &str = "\
#version 330 core
in vec3 vertexTint;

out vec4 FragColor;

void main() { }
";

/// Vertex stage without a `model` uniform.
pub const NO_MODEL_VERT: &str = "\
#version 330 core
layout (location = 0) in vec3 aPos;

uniform mat4 view;
uniform mat4 projection;

void main() { }
";

/// Fragment stage with no inputs at all.
pub const PLAIN_FRAG: &str = "\
#version 330 core
out vec4 FragColor;

void main() { }
";

/// Window whose exit key "goes down" on a chosen frame.
///
/// A frame is one loop iteration: the harness checks the key, renders,
/// swaps, then polls. `swaps()` therefore counts completed frames.
pub struct ScriptedWindow {
    frame: u32,
    press_exit_at_frame: Option<u32>,
    close_requested: bool,
    swaps: u32,
    seconds_per_frame: f32,
}

impl ScriptedWindow {
    pub fn new(press_exit_at_frame: Option<u32>) -> Self {
        Self {
            frame: 0,
            press_exit_at_frame,
            close_requested: false,
            swaps: 0,
            seconds_per_frame: 1.0 / 60.0,
        }
    }

    pub fn swaps(&self) -> u32 {
        self.swaps
    }
}

impl WindowSystem for ScriptedWindow {
    fn size(&self) -> (u32, u32) {
        (800, 640)
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn set_should_close(&mut self, close: bool) {
        self.close_requested = close;
    }

    fn key_pressed(&self, _key: KeyCode) -> bool {
        self.press_exit_at_frame == Some(self.frame)
    }

    fn poll_events(&mut self) {
        self.frame += 1;
    }

    fn swap_buffers(&mut self) -> Result<(), WindowError> {
        self.swaps += 1;
        Ok(())
    }

    fn time(&self) -> f32 {
        self.frame as f32 * self.seconds_per_frame
    }
}
