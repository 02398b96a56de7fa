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

//! A command buffer that records into memory and validates as it goes.

use super::command::{CommandList, RecordedCommand};
use std::ops::Range;
use strata_core::math::{Extent2D, LinearRgba};
use strata_core::renderer::api::{
    ComputePipelineId, DescriptorSetId, FramebufferId, PipelineBindPoint, PipelineLayoutId,
    RenderPassId, RenderPipelineId, ShaderStageFlags,
};
use strata_core::renderer::error::ValidationError;
use strata_core::renderer::traits::CommandBuffer;

/// The push-constant size every conforming device supports, in bytes.
pub const MIN_PUSH_CONSTANT_LIMIT: u32 = 128;

/// The push-constant limit a new [`RecordingCommandBuffer`] validates against, in bytes.
///
/// Large enough for the three default matrix slots plus 64 bytes of material data.
pub const DEFAULT_PUSH_CONSTANT_LIMIT: u32 = 256;

/// Records every [`CommandBuffer`] call as a [`RecordedCommand`].
///
/// The buffer doubles as a validation layer. It tracks the pipeline layout made
/// current by the last pipeline bind and the active render pass, and reports
/// contract violations as [`ValidationError`]s (also logged at `error` level).
/// Invalid commands are still recorded, so the captured stream always mirrors
/// what the caller did. The exception is anything recorded after
/// [`finish`](Self::finish), which is reported and dropped.
#[derive(Debug)]
pub struct RecordingCommandBuffer {
    commands: Vec<RecordedCommand>,
    errors: Vec<ValidationError>,
    layout: Option<PipelineLayoutId>,
    active_render_pass: Option<RenderPassId>,
    push_constant_limit: u32,
    finished: bool,
}

impl RecordingCommandBuffer {
    /// Creates an empty recording validated against [`DEFAULT_PUSH_CONSTANT_LIMIT`].
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            errors: Vec::new(),
            layout: None,
            active_render_pass: None,
            push_constant_limit: DEFAULT_PUSH_CONSTANT_LIMIT,
            finished: false,
        }
    }

    /// Sets the push-constant limit, in bytes, that uploads are validated against.
    pub fn with_push_constant_limit(mut self, limit: u32) -> Self {
        if limit < MIN_PUSH_CONSTANT_LIMIT {
            log::warn!(
                "RecordingCommandBuffer: push-constant limit {limit} is below the guaranteed minimum of {MIN_PUSH_CONSTANT_LIMIT} bytes"
            );
        }
        self.push_constant_limit = limit;
        self
    }

    /// Returns the push-constant limit in bytes.
    pub fn push_constant_limit(&self) -> u32 {
        self.push_constant_limit
    }

    /// Returns the commands recorded so far.
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Returns the validation errors reported so far.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the render pass currently open, if any.
    pub fn active_render_pass(&self) -> Option<RenderPassId> {
        self.active_render_pass
    }

    /// Returns `true` once [`finish`](Self::finish) has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ends the recording and hands over everything captured.
    ///
    /// A render pass still open at this point is reported as
    /// [`ValidationError::UnterminatedRenderPass`]. Calling `finish` again
    /// returns an empty list.
    pub fn finish(&mut self) -> CommandList {
        if let Some(active) = self.active_render_pass.take() {
            self.report(ValidationError::UnterminatedRenderPass { active });
        }
        self.finished = true;
        log::debug!(
            "RecordingCommandBuffer: finished with {} command(s), {} error(s)",
            self.commands.len(),
            self.errors.len()
        );
        CommandList {
            commands: std::mem::take(&mut self.commands),
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn report(&mut self, error: ValidationError) {
        log::error!("RecordingCommandBuffer: {error}");
        self.errors.push(error);
    }

    /// Reports and returns `true` if the recording is already finished.
    fn reject_if_finished(&mut self, command: &'static str) -> bool {
        if self.finished {
            self.report(ValidationError::RecordingFinished { command });
        }
        self.finished
    }

    fn require_layout(&mut self, command: &'static str) {
        if self.layout.is_none() {
            self.report(ValidationError::NoPipelineLayoutBound { command });
        }
    }

    fn require_render_pass(&mut self, command: &'static str) {
        if self.active_render_pass.is_none() {
            self.report(ValidationError::DrawOutsideRenderPass { command });
        }
    }

    fn record(&mut self, command: RecordedCommand) {
        log::trace!("RecordingCommandBuffer: {command:?}");
        self.commands.push(command);
    }

    fn record_descriptor_sets(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
        inline: bool,
    ) {
        let command = RecordedCommand::BindDescriptorSets {
            bind_point,
            layout,
            first_set,
            sets: sets.to_vec(),
            dynamic_offsets: dynamic_offsets.to_vec(),
            inline,
        };
        if self.reject_if_finished(command.name()) {
            return;
        }
        self.require_layout(command.name());
        if let Some(current) = self.layout.filter(|current| *current != layout) {
            log::warn!(
                "RecordingCommandBuffer: descriptor sets bound against {layout:?} while {current:?} is current"
            );
        }
        self.record(command);
    }
}

impl Default for RecordingCommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer for RecordingCommandBuffer {
    fn bind_graphics_pipeline(&mut self, pipeline: RenderPipelineId, layout: PipelineLayoutId) {
        if self.reject_if_finished("bind_graphics_pipeline") {
            return;
        }
        self.layout = Some(layout);
        self.record(RecordedCommand::BindGraphicsPipeline { pipeline, layout });
    }

    fn bind_compute_pipeline(&mut self, pipeline: ComputePipelineId, layout: PipelineLayoutId) {
        if self.reject_if_finished("bind_compute_pipeline") {
            return;
        }
        self.layout = Some(layout);
        self.record(RecordedCommand::BindComputePipeline { pipeline, layout });
    }

    fn bind_descriptor_sets(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
    ) {
        self.record_descriptor_sets(bind_point, layout, first_set, sets, dynamic_offsets, false);
    }

    fn bind_descriptor_sets_inline(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
    ) {
        self.record_descriptor_sets(bind_point, layout, first_set, sets, dynamic_offsets, true);
    }

    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) {
        if self.reject_if_finished("push_constants") {
            return;
        }
        self.require_layout("push_constants");

        let size = data.len() as u32;
        if offset % 4 != 0 || size % 4 != 0 {
            self.report(ValidationError::MisalignedPushConstants { offset, size });
        }
        if offset.saturating_add(size) > self.push_constant_limit {
            self.report(ValidationError::PushConstantRangeExceeded {
                offset,
                size,
                limit: self.push_constant_limit,
            });
        }

        self.record(RecordedCommand::PushConstants {
            stages,
            offset,
            data: data.to_vec(),
        });
    }

    fn current_pipeline_layout(&self) -> Option<PipelineLayoutId> {
        self.layout
    }

    fn begin_render_pass(
        &mut self,
        render_pass: RenderPassId,
        framebuffer: FramebufferId,
        extent: Extent2D,
        clear_color: LinearRgba,
    ) {
        if self.reject_if_finished("begin_render_pass") {
            return;
        }
        if let Some(active) = self.active_render_pass {
            self.report(ValidationError::RenderPassAlreadyActive { active });
        }
        self.active_render_pass = Some(render_pass);
        self.record(RecordedCommand::BeginRenderPass {
            render_pass,
            framebuffer,
            extent,
            clear_color,
        });
    }

    fn end_render_pass(&mut self) {
        if self.reject_if_finished("end_render_pass") {
            return;
        }
        if self.active_render_pass.take().is_none() {
            self.report(ValidationError::NoActiveRenderPass);
        }
        self.record(RecordedCommand::EndRenderPass);
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        if self.reject_if_finished("draw") {
            return;
        }
        self.require_render_pass("draw");
        self.record(RecordedCommand::Draw {
            vertices,
            instances,
        });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        if self.reject_if_finished("draw_indexed") {
            return;
        }
        self.require_render_pass("draw_indexed");
        self.record(RecordedCommand::DrawIndexed {
            indices,
            base_vertex,
            instances,
        });
    }

    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32) {
        if self.reject_if_finished("dispatch_workgroups") {
            return;
        }
        if self.active_render_pass.is_some() {
            self.report(ValidationError::DispatchInsideRenderPass);
        }
        self.record(RecordedCommand::DispatchWorkgroups { x, y, z });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_bind_makes_its_layout_current() {
        let mut commands = RecordingCommandBuffer::new();
        assert_eq!(commands.current_pipeline_layout(), None);

        commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(3));
        assert_eq!(commands.current_pipeline_layout(), Some(PipelineLayoutId(3)));

        commands.bind_compute_pipeline(ComputePipelineId(1), PipelineLayoutId(4));
        assert_eq!(commands.current_pipeline_layout(), Some(PipelineLayoutId(4)));
    }

    #[test]
    fn finish_twice_returns_empty_list() {
        let mut commands = RecordingCommandBuffer::new();
        commands.bind_graphics_pipeline(RenderPipelineId(1), PipelineLayoutId(0));

        assert_eq!(commands.finish().commands.len(), 1);
        assert_eq!(commands.finish(), CommandList::default());
        assert!(commands.is_finished());
    }

    #[test]
    fn limit_builder_overrides_default() {
        let commands = RecordingCommandBuffer::new();
        assert_eq!(commands.push_constant_limit(), DEFAULT_PUSH_CONSTANT_LIMIT);

        let commands = commands.with_push_constant_limit(MIN_PUSH_CONSTANT_LIMIT);
        assert_eq!(commands.push_constant_limit(), 128);
    }
}
