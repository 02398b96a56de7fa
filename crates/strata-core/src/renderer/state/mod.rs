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

//! Tracks the GPU state a scene traversal wants active and emits only what changed.
//!
//! A traversal pushes immutable command records as it descends and pops them as it
//! ascends. Before every draw or compute dispatch it calls [`RenderState::dispatch`],
//! which walks the dirty sub-stacks in dependency order and records one command per
//! changed stack into a [`CommandBuffer`](crate::renderer::traits::CommandBuffer).
//!
//! - [`StateStack`] and [`InlineStateStack`]: dirty-tracked stacks of shared records.
//! - [`MatrixStack`]: a transform stack uploaded as a push constant.
//! - [`RenderState`]: the aggregate that orders every sub-stack.

pub mod commands;
mod matrix_stack;
mod render_state;
mod settings;
mod stack;
mod stats;

pub use self::commands::{
    BindComputePipeline, BindDescriptorSets, BindGraphicsPipeline, Dispatch, DispatchInline,
    PushConstants,
};
pub use self::matrix_stack::MatrixStack;
#[cfg(not(feature = "fixed-descriptor-sets"))]
pub use self::render_state::DESCRIPTOR_SET_LIMIT;
#[cfg(feature = "fixed-descriptor-sets")]
pub use self::render_state::MAX_DESCRIPTOR_SETS;
pub use self::render_state::{DescriptorStacks, MatrixSlot, RenderState};
pub use self::settings::StateSettings;
pub use self::stack::{Bind, Emission, Inline, InlineStateStack, StateStack};
pub use self::stats::{StateDepths, StateStats};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::math::{Extent2D, LinearRgba};
    use crate::renderer::api::{
        ComputePipelineId, DescriptorSetId, FramebufferId, PipelineBindPoint, PipelineLayoutId,
        RenderPassId, RenderPipelineId, ShaderStageFlags,
    };
    use crate::renderer::traits::CommandBuffer;
    use std::ops::Range;

    /// A command as seen by [`SpyCommandBuffer`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Emitted {
        GraphicsPipeline(RenderPipelineId),
        ComputePipeline(ComputePipelineId),
        DescriptorSets {
            first_set: u32,
            sets: Vec<DescriptorSetId>,
            inline: bool,
        },
        PushConstants {
            stages: ShaderStageFlags,
            offset: u32,
            data: Vec<u8>,
        },
        BeginRenderPass(RenderPassId),
        EndRenderPass,
        Draw,
        DispatchWorkgroups,
    }

    /// Records every call without validating anything.
    #[derive(Debug, Default)]
    pub struct SpyCommandBuffer {
        pub emitted: Vec<Emitted>,
        layout: Option<PipelineLayoutId>,
    }

    impl SpyCommandBuffer {
        /// A spy that behaves as if a pipeline had already been bound.
        pub fn with_layout() -> Self {
            Self {
                emitted: Vec::new(),
                layout: Some(PipelineLayoutId(0)),
            }
        }
    }

    impl CommandBuffer for SpyCommandBuffer {
        fn bind_graphics_pipeline(&mut self, pipeline: RenderPipelineId, layout: PipelineLayoutId) {
            self.layout = Some(layout);
            self.emitted.push(Emitted::GraphicsPipeline(pipeline));
        }

        fn bind_compute_pipeline(&mut self, pipeline: ComputePipelineId, layout: PipelineLayoutId) {
            self.layout = Some(layout);
            self.emitted.push(Emitted::ComputePipeline(pipeline));
        }

        fn bind_descriptor_sets(
            &mut self,
            _bind_point: PipelineBindPoint,
            _layout: PipelineLayoutId,
            first_set: u32,
            sets: &[DescriptorSetId],
            _dynamic_offsets: &[u32],
        ) {
            self.emitted.push(Emitted::DescriptorSets {
                first_set,
                sets: sets.to_vec(),
                inline: false,
            });
        }

        fn bind_descriptor_sets_inline(
            &mut self,
            _bind_point: PipelineBindPoint,
            _layout: PipelineLayoutId,
            first_set: u32,
            sets: &[DescriptorSetId],
            _dynamic_offsets: &[u32],
        ) {
            self.emitted.push(Emitted::DescriptorSets {
                first_set,
                sets: sets.to_vec(),
                inline: true,
            });
        }

        fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) {
            self.emitted.push(Emitted::PushConstants {
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
            _framebuffer: FramebufferId,
            _extent: Extent2D,
            _clear_color: LinearRgba,
        ) {
            self.emitted.push(Emitted::BeginRenderPass(render_pass));
        }

        fn end_render_pass(&mut self) {
            self.emitted.push(Emitted::EndRenderPass);
        }

        fn draw(&mut self, _vertices: Range<u32>, _instances: Range<u32>) {
            self.emitted.push(Emitted::Draw);
        }

        fn draw_indexed(&mut self, _indices: Range<u32>, _base_vertex: i32, _instances: Range<u32>) {
            self.emitted.push(Emitted::Draw);
        }

        fn dispatch_workgroups(&mut self, _x: u32, _y: u32, _z: u32) {
            self.emitted.push(Emitted::DispatchWorkgroups);
        }
    }
}
