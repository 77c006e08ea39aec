//! Validates the point-sprite shader with naga.

use morphe::render::{RenderUniforms, SHADER_SOURCE};
use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::ShaderStage;

fn parse() -> naga::Module {
    match wgsl::parse_str(SHADER_SOURCE) {
        Ok(module) => module,
        Err(err) => panic!("shader failed to parse:\n{}", err.emit_to_string(SHADER_SOURCE)),
    }
}

#[test]
fn test_shader_validates() {
    let module = parse();
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(err) = validator.validate(&module) {
        panic!("shader failed validation: {err}");
    }
}

#[test]
fn test_shader_entry_points() {
    let module = parse();
    let stages: Vec<(&str, ShaderStage)> = module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect();

    assert!(stages.contains(&("vs_main", ShaderStage::Vertex)));
    assert!(stages.contains(&("fs_main", ShaderStage::Fragment)));
}

#[test]
fn test_uniform_block_matches_rust_layout() {
    let module = parse();
    let uniforms = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
        .map(|(_, ty)| ty)
        .expect("Uniforms struct in shader");

    match &uniforms.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(*span as usize, std::mem::size_of::<RenderUniforms>());
        }
        other => panic!("Uniforms is not a struct: {other:?}"),
    }
}
