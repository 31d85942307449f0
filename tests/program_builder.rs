//! Shader program lifecycle against the in-memory driver: success leaves
//! exactly one program alive, and every failure path frees what it made.

mod common;

use common::*;
use render_harness::{HeadlessBackend, ProgramBuilder, ProgramError, ShaderSource, ShaderStage};

#[test]
fn valid_pair_links_and_leaves_only_the_program() {
    let mut driver = HeadlessBackend::new();

    let program = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(VALID_VERT),
        &ShaderSource::fragment(VALID_FRAG),
    )
    .expect("valid sources must link");

    // The stage objects were scaffolding; only the program survives.
    assert_eq!(driver.live_programs(), 1);
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_buffers(), 0);

    program.delete(&mut driver);
    assert_eq!(driver.live_programs(), 0);
}

#[test]
fn compile_failure_reports_full_log_and_frees_the_stage() {
    let mut driver = HeadlessBackend::new();

    let err = ProgramBuilder::compile_stage(&mut driver, &ShaderSource::fragment(BROKEN_FRAG))
        .expect_err("#error source must not compile");

    match err {
        ProgramError::Compile { stage, log } => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
            assert!(log.contains("#error"));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }

    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
}

#[test]
fn empty_source_fails_with_nonempty_log() {
    let mut driver = HeadlessBackend::new();

    let err = ProgramBuilder::compile_stage(&mut driver, &ShaderSource::vertex(""))
        .expect_err("empty source must not compile");

    match err {
        ProgramError::Compile { log, .. } => assert!(!log.is_empty()),
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert_eq!(driver.live_shaders(), 0);
}

#[test]
fn failed_vertex_stage_skips_the_fragment_compile() {
    let mut driver = HeadlessBackend::new();

    let result = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(BROKEN_FRAG),
        &ShaderSource::fragment(VALID_FRAG),
    );

    assert!(matches!(result, Err(ProgramError::Compile { .. })));
    // Link is never attempted with a failed stage, and the fragment
    // source is never even submitted.
    assert_eq!(driver.shaders_created_total(), 1);
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
}

#[test]
fn mismatched_stages_fail_to_link_without_leaking() {
    let mut driver = HeadlessBackend::new();

    let vertex =
        ProgramBuilder::compile_stage(&mut driver, &ShaderSource::vertex(VALID_VERT)).unwrap();
    let fragment =
        ProgramBuilder::compile_stage(&mut driver, &ShaderSource::fragment(MISMATCHED_FRAG))
            .unwrap();
    assert_eq!(driver.live_shaders(), 2);

    let err = ProgramBuilder::link(&mut driver, vertex, fragment)
        .expect_err("unmatched varying must fail the link");

    match err {
        ProgramError::Link { log } => {
            assert!(!log.is_empty());
            assert!(log.contains("vertexTint"));
        }
        other => panic!("expected a link error, got {other:?}"),
    }

    // Stage objects never survive the link call, and the half-built
    // program was deleted before the error returned.
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
}

#[test]
fn build_surfaces_link_failures() {
    let mut driver = HeadlessBackend::new();

    let result = ProgramBuilder::build(
        &mut driver,
        &ShaderSource::vertex(VALID_VERT),
        &ShaderSource::fragment(MISMATCHED_FRAG),
    );

    assert!(matches!(result, Err(ProgramError::Link { .. })));
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
}
