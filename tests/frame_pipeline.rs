//! Frame pipeline and harness behavior against the in-memory driver:
//! upload-once geometry, per-frame uniform traffic, sub-range draws, and
//! the cooperative close of the loop.

mod common;

use common::*;
use glam::Vec3;
use render_harness::driver::BufferKind;
use render_harness::pipeline::TransformLocations;
use render_harness::scene::Camera;
use render_harness::{
    Draw, FramePipeline, GeometryBuffer, Harness, HarnessConfig, HeadlessBackend, InstanceSet,
    MeshData, ProgramBuilder, Scene, ShaderSource, SpinAnimation,
};

fn test_camera() -> Camera {
    Camera::new(3.0, 45.0, 800.0 / 640.0, 0.1, 100.0)
}

fn quad_sub_draws() -> Vec<Draw> {
    vec![
        Draw::Indexed {
            count: 3,
            byte_offset: 0,
        },
        Draw::Indexed {
            count: 3,
            byte_offset: 12,
        },
    ]
}

#[test]
fn quad_renders_as_two_sub_draws_of_one_upload() {
    let mut driver = HeadlessBackend::new();
    let program = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(VALID_VERT),
        &ShaderSource::fragment(VALID_FRAG),
    )
    .unwrap();

    let mesh = MeshData::quad();
    let geometry = GeometryBuffer::upload(&mut driver, &mesh, quad_sub_draws()).unwrap();
    let locations = TransformLocations::resolve(&mut driver, &program);

    let pipeline = FramePipeline::new(
        test_camera(),
        [0.0, 1.0, 0.0, 1.0],
        false,
        InstanceSet::single(),
        SpinAnimation::new(Vec3::X, 0.0, 30.0),
    );

    pipeline.render_frame(&mut driver, &program, &geometry, &locations, 0.0);
    pipeline.render_frame(&mut driver, &program, &geometry, &locations, 0.016);

    // Four positions and six indices went up exactly once.
    let uploads = driver.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].kind, BufferKind::Vertex);
    assert_eq!(uploads[0].byte_len, 4 * 12);
    assert_eq!(uploads[1].kind, BufferKind::Index);
    assert_eq!(uploads[1].byte_len, 6 * 4);

    // Two indexed draws per frame, each addressing its own slice.
    let draws = driver.draw_calls();
    assert_eq!(draws.len(), 4);
    for frame in draws.chunks(2) {
        assert_eq!(
            frame[0].draw,
            Draw::Indexed {
                count: 3,
                byte_offset: 0
            }
        );
        assert_eq!(
            frame[1].draw,
            Draw::Indexed {
                count: 3,
                byte_offset: 12
            }
        );
    }

    geometry.destroy(&mut driver);
    program.delete(&mut driver);
}

#[test]
fn view_and_projection_upload_once_per_frame_model_per_instance() {
    let mut driver = HeadlessBackend::new();
    let program = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(VALID_VERT),
        &ShaderSource::fragment(VALID_FRAG),
    )
    .unwrap();

    let mesh = MeshData::colored_cube();
    let draws = Draw::whole_mesh(&mesh);
    let geometry = GeometryBuffer::upload(&mut driver, &mesh, draws).unwrap();
    let locations = TransformLocations::resolve(&mut driver, &program);

    let positions: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    let animation = SpinAnimation::new(Vec3::new(1.0, 0.3, 0.5), 20.0, 50.0);
    let pipeline = FramePipeline::new(
        test_camera(),
        [0.0, 0.0, 0.0, 1.0],
        true,
        InstanceSet::new(positions.clone()),
        animation,
    );

    pipeline.render_frame(&mut driver, &program, &geometry, &locations, 2.5);

    let count = |name: &str| {
        driver
            .uniform_writes()
            .iter()
            .filter(|write| write.name == name)
            .count()
    };
    assert_eq!(count("view"), 1);
    assert_eq!(count("projection"), 1);
    assert_eq!(count("model"), 10);

    // Model uploads match the per-instance transform exactly.
    let model_writes: Vec<_> = driver
        .uniform_writes()
        .iter()
        .filter(|write| write.name == "model")
        .collect();
    for (index, write) in model_writes.iter().enumerate() {
        let expected = animation.model_matrix(positions[index], index as u32, 2.5);
        assert_eq!(write.value.to_cols_array(), expected.to_cols_array());
    }

    // One non-indexed draw per instance.
    assert_eq!(driver.draw_calls().len(), 10);
    assert!(driver
        .draw_calls()
        .iter()
        .all(|call| call.draw == Draw::Arrays { first: 0, count: 36 }));

    geometry.destroy(&mut driver);
    program.delete(&mut driver);
}

#[test]
fn missing_model_uniform_is_tolerated() {
    let mut driver = HeadlessBackend::new();
    let program = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(NO_MODEL_VERT),
        &ShaderSource::fragment(PLAIN_FRAG),
    )
    .unwrap();

    let mesh = MeshData::quad();
    let geometry = GeometryBuffer::upload(&mut driver, &mesh, quad_sub_draws()).unwrap();
    let locations = TransformLocations::resolve(&mut driver, &program);
    assert!(locations.model.is_none());
    assert!(locations.view.is_some());

    let pipeline = FramePipeline::new(
        test_camera(),
        [0.0, 1.0, 0.0, 1.0],
        false,
        InstanceSet::single(),
        SpinAnimation::new(Vec3::X, 0.0, 30.0),
    );
    pipeline.render_frame(&mut driver, &program, &geometry, &locations, 1.0);

    // The model upload is skipped, the draws still happen.
    assert!(driver
        .uniform_writes()
        .iter()
        .all(|write| write.name != "model"));
    assert_eq!(driver.draw_calls().len(), 2);

    geometry.destroy(&mut driver);
    program.delete(&mut driver);
}

fn quad_scene() -> Scene {
    let mesh = MeshData::quad();
    Scene {
        vertex_shader: ShaderSource::vertex(VALID_VERT),
        fragment_shader: ShaderSource::fragment(VALID_FRAG),
        mesh,
        draws: quad_sub_draws(),
        instances: InstanceSet::single(),
        animation: SpinAnimation::new(Vec3::X, 0.0, 30.0),
        depth_test: false,
    }
}

#[test]
fn exit_key_finishes_the_current_frame_then_stops() {
    let window = ScriptedWindow::new(Some(2));
    let driver = HeadlessBackend::new();
    let mut harness = Harness::new(window, driver, HarnessConfig::default());

    harness.run(quad_scene()).unwrap();

    // Frames 0 and 1 run normally; the key lands on frame 2, which still
    // draws and swaps before the loop notices the close request.
    assert_eq!(harness.window().swaps(), 3);
    assert_eq!(harness.driver().draw_calls().len(), 3 * 2);
}

#[test]
fn shutdown_releases_every_gpu_resource() {
    let window = ScriptedWindow::new(Some(0));
    let driver = HeadlessBackend::new();
    let mut harness = Harness::new(window, driver, HarnessConfig::default());

    harness.run(quad_scene()).unwrap();

    let driver = harness.driver();
    assert_eq!(driver.live_programs(), 0);
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_buffers(), 0);
    assert_eq!(driver.live_vertex_arrays(), 0);
}

#[test]
fn harness_applies_viewport_and_depth_from_config_and_scene() {
    let window = ScriptedWindow::new(Some(0));
    let driver = HeadlessBackend::new();
    let mut harness = Harness::new(window, driver, HarnessConfig::default());

    let mesh = MeshData::colored_cube();
    let draws = Draw::whole_mesh(&mesh);
    let scene = Scene {
        vertex_shader: ShaderSource::vertex(VALID_VERT),
        fragment_shader: ShaderSource::fragment(VALID_FRAG),
        mesh,
        draws,
        instances: InstanceSet::single(),
        animation: SpinAnimation::new(Vec3::new(1.0, 0.3, 0.5), 20.0, 50.0),
        depth_test: true,
    };
    harness.run(scene).unwrap();

    assert_eq!(harness.driver().viewport(), Some((800, 640)));
    assert!(harness.driver().depth_test_enabled());
}
