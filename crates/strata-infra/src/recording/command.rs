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

//! The captured form of every call made on a [`RecordingCommandBuffer`](super::RecordingCommandBuffer).

use std::ops::Range;
use strata_core::math::{Extent2D, LinearRgba};
use strata_core::renderer::api::{
    ComputePipelineId, DescriptorSetId, FramebufferId, PipelineBindPoint, PipelineLayoutId,
    RenderPassId, RenderPipelineId, ShaderStageFlags,
};
use strata_core::renderer::error::ValidationError;

/// One recorded command, with owned copies of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// A graphics pipeline bind.
    BindGraphicsPipeline {
        /// The pipeline that was bound.
        pipeline: RenderPipelineId,
        /// The layout it made current.
        layout: PipelineLayoutId,
    },
    /// A compute pipeline bind.
    BindComputePipeline {
        /// The pipeline that was bound.
        pipeline: ComputePipelineId,
        /// The layout it made current.
        layout: PipelineLayoutId,
    },
    /// A descriptor-set bind, in either encoding.
    BindDescriptorSets {
        /// The pipeline type the sets were bound for.
        bind_point: PipelineBindPoint,
        /// The layout the sets were bound against.
        layout: PipelineLayoutId,
        /// The first set index.
        first_set: u32,
        /// The bound sets.
        sets: Vec<DescriptorSetId>,
        /// Dynamic offsets, in binding order.
        dynamic_offsets: Vec<u32>,
        /// `true` if the inline encoding was used.
        inline: bool,
    },
    /// A push-constant upload.
    PushConstants {
        /// The stages that can read the range.
        stages: ShaderStageFlags,
        /// Byte offset of the range.
        offset: u32,
        /// The uploaded bytes.
        data: Vec<u8>,
    },
    /// The start of a render pass.
    BeginRenderPass {
        /// The render pass.
        render_pass: RenderPassId,
        /// The framebuffer rendered into.
        framebuffer: FramebufferId,
        /// The render area.
        extent: Extent2D,
        /// The clear color of the color attachment.
        clear_color: LinearRgba,
    },
    /// The end of the active render pass.
    EndRenderPass,
    /// A non-indexed draw.
    Draw {
        /// The vertex range.
        vertices: Range<u32>,
        /// The instance range.
        instances: Range<u32>,
    },
    /// An indexed draw.
    DrawIndexed {
        /// The index range.
        indices: Range<u32>,
        /// Value added to each index.
        base_vertex: i32,
        /// The instance range.
        instances: Range<u32>,
    },
    /// A compute dispatch.
    DispatchWorkgroups {
        /// Workgroups along X.
        x: u32,
        /// Workgroups along Y.
        y: u32,
        /// Workgroups along Z.
        z: u32,
    },
}

impl RecordedCommand {
    /// Returns the name of the `CommandBuffer` method that produced this command.
    pub fn name(&self) -> &'static str {
        match self {
            RecordedCommand::BindGraphicsPipeline { .. } => "bind_graphics_pipeline",
            RecordedCommand::BindComputePipeline { .. } => "bind_compute_pipeline",
            RecordedCommand::BindDescriptorSets { inline: false, .. } => "bind_descriptor_sets",
            RecordedCommand::BindDescriptorSets { inline: true, .. } => {
                "bind_descriptor_sets_inline"
            }
            RecordedCommand::PushConstants { .. } => "push_constants",
            RecordedCommand::BeginRenderPass { .. } => "begin_render_pass",
            RecordedCommand::EndRenderPass => "end_render_pass",
            RecordedCommand::Draw { .. } => "draw",
            RecordedCommand::DrawIndexed { .. } => "draw_indexed",
            RecordedCommand::DispatchWorkgroups { .. } => "dispatch_workgroups",
        }
    }

    /// Returns `true` for binds and push-constant uploads.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            RecordedCommand::BindGraphicsPipeline { .. }
                | RecordedCommand::BindComputePipeline { .. }
                | RecordedCommand::BindDescriptorSets { .. }
                | RecordedCommand::PushConstants { .. }
        )
    }

    /// Returns `true` for draws and compute dispatches.
    pub fn is_work(&self) -> bool {
        matches!(
            self,
            RecordedCommand::Draw { .. }
                | RecordedCommand::DrawIndexed { .. }
                | RecordedCommand::DispatchWorkgroups { .. }
        )
    }
}

/// The result of finishing a recording: the commands and everything the
/// validation layer reported while they were recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    /// The recorded commands, in recording order.
    pub commands: Vec<RecordedCommand>,
    /// Validation failures, in the order they were detected.
    pub errors: Vec<ValidationError>,
}

impl CommandList {
    /// Returns `true` if no validation error was reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Counts the binds and push-constant uploads in the list.
    pub fn state_changes(&self) -> usize {
        self.commands.iter().filter(|c| c.is_state_change()).count()
    }

    /// Counts the draws and compute dispatches in the list.
    pub fn work_items(&self) -> usize {
        self.commands.iter().filter(|c| c.is_work()).count()
    }
}
