// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for `RecordingCommandBuffer` driven by `RenderState`.
//!
//! The recording backend is the validation layer of the state tracker: the
//! sequencing bugs the tracker itself does not check must show up here.

use std::sync::Arc;
use strata_core::math::{Extent2D, LinearRgba, Mat4, Vec3};
use strata_core::renderer::api::*;
use strata_core::renderer::error::ValidationError;
use strata_core::renderer::state::{
    BindComputePipeline, BindDescriptorSets, BindGraphicsPipeline, MatrixSlot, RenderState,
};
use strata_core::renderer::traits::CommandBuffer;
use strata_infra::recording::MIN_PUSH_CONSTANT_LIMIT;
use strata_infra::{RecordedCommand, RecordingCommandBuffer};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pipeline() -> Arc<BindGraphicsPipeline> {
    Arc::new(BindGraphicsPipeline::new(
        RenderPipelineId(1),
        PipelineLayoutId(1),
    ))
}

fn begin(commands: &mut RecordingCommandBuffer, render_pass: usize) {
    commands.begin_render_pass(
        RenderPassId(render_pass),
        FramebufferId(0),
        Extent2D::new(640, 480),
        LinearRgba::BLACK,
    );
}

#[test]
fn test_tracked_frame_records_cleanly() {
    init_logger();
    let mut state = RenderState::new();
    let mut commands = RecordingCommandBuffer::new();

    begin(&mut commands, 0);
    state.push_graphics_pipeline(pipeline());
    state.push_descriptor_sets(Arc::new(BindDescriptorSets::single(
        PipelineLayoutId(1),
        0,
        DescriptorSetId(2),
    )));
    state.push_matrix(MatrixSlot::Model, Mat4::from_translation(Vec3::ONE));
    state.dispatch(&mut commands);
    commands.draw(0..3, 0..1);
    commands.end_render_pass();
    let list = commands.finish();

    assert!(list.is_valid(), "unexpected errors: {:?}", list.errors);
    assert_eq!(list.state_changes(), 5);
    assert_eq!(list.work_items(), 1);
    assert_eq!(list.commands.first().map(|c| c.name()), Some("begin_render_pass"));
    assert_eq!(list.commands.last(), Some(&RecordedCommand::EndRenderPass));
}

#[test]
fn test_matrices_before_any_pipeline_are_reported() {
    init_logger();
    let mut state = RenderState::new();
    let mut commands = RecordingCommandBuffer::new();

    state.set_matrix(MatrixSlot::Projection, Mat4::IDENTITY);
    state.dispatch(&mut commands);
    let list = commands.finish();

    assert_eq!(list.commands.len(), 3);
    assert_eq!(
        list.errors,
        vec![
            ValidationError::NoPipelineLayoutBound {
                command: "push_constants"
            };
            3
        ]
    );
}

#[test]
fn test_model_matrix_exceeds_minimum_limit() {
    init_logger();
    let mut state = RenderState::new();
    let mut commands = RecordingCommandBuffer::new().with_push_constant_limit(MIN_PUSH_CONSTANT_LIMIT);

    state.push_graphics_pipeline(pipeline());
    state.dispatch(&mut commands);

    assert_eq!(
        commands.errors(),
        &[ValidationError::PushConstantRangeExceeded {
            offset: 128,
            size: 64,
            limit: 128,
        }]
    );
}

#[test]
fn test_push_constants_near_u32_max_are_reported() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(1));
    commands.push_constants(ShaderStageFlags::VERTEX, u32::MAX - 3, &[0; 64]);

    let expected = ValidationError::PushConstantRangeExceeded {
        offset: u32::MAX - 3,
        size: 64,
        limit: 256,
    };
    assert_eq!(commands.errors(), &[expected.clone()]);
    assert!(expected.to_string().contains("[4294967292, 4294967356)"));
}

#[test]
fn test_misaligned_push_constants_are_reported() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(1));
    commands.push_constants(ShaderStageFlags::FRAGMENT, 2, &[0; 6]);

    assert_eq!(
        commands.errors(),
        &[ValidationError::MisalignedPushConstants { offset: 2, size: 6 }]
    );
    assert_eq!(commands.commands().len(), 2);
}

#[test]
fn test_descriptor_bind_without_layout_is_reported() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    commands.bind_descriptor_sets_inline(
        PipelineBindPoint::Graphics,
        PipelineLayoutId(1),
        0,
        &[DescriptorSetId(1)],
        &[],
    );

    assert_eq!(
        commands.errors(),
        &[ValidationError::NoPipelineLayoutBound {
            command: "bind_descriptor_sets_inline"
        }]
    );
}

#[test]
fn test_draw_outside_render_pass_is_reported() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(1));
    commands.draw(0..3, 0..1);
    commands.draw_indexed(0..6, 0, 0..1);

    assert_eq!(
        commands.errors(),
        &[
            ValidationError::DrawOutsideRenderPass { command: "draw" },
            ValidationError::DrawOutsideRenderPass {
                command: "draw_indexed"
            },
        ]
    );
}

#[test]
fn test_render_pass_scoping_is_enforced() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();

    begin(&mut commands, 1);
    begin(&mut commands, 2);
    commands.end_render_pass();
    commands.end_render_pass();

    assert_eq!(
        commands.errors(),
        &[
            ValidationError::RenderPassAlreadyActive {
                active: RenderPassId(1)
            },
            ValidationError::NoActiveRenderPass,
        ]
    );
}

#[test]
fn test_finish_reports_open_render_pass() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    begin(&mut commands, 5);

    let list = commands.finish();

    assert!(!list.is_valid());
    assert_eq!(
        list.errors,
        vec![ValidationError::UnterminatedRenderPass {
            active: RenderPassId(5)
        }]
    );
    assert_eq!(commands.active_render_pass(), None);
}

#[test]
fn test_commands_after_finish_are_dropped() {
    init_logger();
    let mut commands = RecordingCommandBuffer::new();
    commands.finish();

    commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(1));
    commands.draw(0..3, 0..1);

    assert!(commands.commands().is_empty());
    assert_eq!(commands.current_pipeline_layout(), None);
    assert_eq!(
        commands.errors(),
        &[
            ValidationError::RecordingFinished {
                command: "bind_graphics_pipeline"
            },
            ValidationError::RecordingFinished { command: "draw" },
        ]
    );
}

#[test]
fn test_compute_work_binds_compute_pipeline_outside_pass() {
    init_logger();
    let mut state = RenderState::new();
    let mut commands = RecordingCommandBuffer::new();

    state.push_compute_pipeline(Arc::new(BindComputePipeline::new(
        ComputePipelineId(1),
        PipelineLayoutId(2),
    )));
    state.dispatch(&mut commands);
    commands.dispatch_workgroups(8, 8, 1);

    assert!(commands.errors().is_empty());
    assert_eq!(
        commands.commands().first(),
        Some(&RecordedCommand::BindComputePipeline {
            pipeline: ComputePipelineId(1),
            layout: PipelineLayoutId(2),
        })
    );

    begin(&mut commands, 0);
    commands.dispatch_workgroups(1, 1, 1);
    assert_eq!(
        commands.errors(),
        &[ValidationError::DispatchInsideRenderPass]
    );
}
