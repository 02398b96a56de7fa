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

use crate::math::{Extent2D, LinearRgba};
use crate::renderer::api::{
    ComputePipelineId, DescriptorSetId, FramebufferId, PipelineBindPoint, PipelineLayoutId,
    RenderPassId, RenderPipelineId, ShaderStageFlags,
};
use std::ops::Range;

/// A trait for an object that records a sequence of GPU commands.
///
/// This is the boundary between the state tracker and a graphics backend. The
/// state tracker only ever calls the binding methods (`bind_*` and
/// [`push_constants`](Self::push_constants)); render stages use the rest.
///
/// Implementations track which pipeline layout is current: binding a graphics or
/// compute pipeline makes its layout current, and every descriptor bind or
/// push-constant upload that follows is recorded against it. Recording one of
/// those before any pipeline is bound is a caller bug that the backend is free
/// to reject through its own validation.
pub trait CommandBuffer {
    /// Binds a graphics pipeline and makes `layout` the current pipeline layout.
    fn bind_graphics_pipeline(&mut self, pipeline: RenderPipelineId, layout: PipelineLayoutId);

    /// Binds a compute pipeline and makes `layout` the current pipeline layout.
    fn bind_compute_pipeline(&mut self, pipeline: ComputePipelineId, layout: PipelineLayoutId);

    /// Binds consecutive descriptor sets starting at `first_set`.
    fn bind_descriptor_sets(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
    );

    /// Binds consecutive descriptor sets using the backend's inline encoding.
    ///
    /// The resulting GPU state is the same as [`bind_descriptor_sets`](Self::bind_descriptor_sets);
    /// only the form in which the bind is written into the command stream differs.
    /// Which form is used is chosen by the caller's resource-binding strategy.
    fn bind_descriptor_sets_inline(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
    );

    /// Uploads `data` into the push-constant range at `offset` of the current pipeline layout.
    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]);

    /// Returns the layout of the most recently bound pipeline, if any.
    fn current_pipeline_layout(&self) -> Option<PipelineLayoutId>;

    /// Begins a render pass that clears its color attachment to `clear_color`.
    fn begin_render_pass(
        &mut self,
        render_pass: RenderPassId,
        framebuffer: FramebufferId,
        extent: Extent2D,
        clear_color: LinearRgba,
    );

    /// Ends the active render pass.
    fn end_render_pass(&mut self);

    /// Records a non-indexed draw call.
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);

    /// Records an indexed draw call.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);

    /// Records a compute dispatch.
    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32);
}
