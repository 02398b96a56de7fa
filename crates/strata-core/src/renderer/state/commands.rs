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

//! Immutable state records referenced by stack frames.
//!
//! Every record is built once, wrapped in an [`Arc`](std::sync::Arc), and then
//! shared by every stack frame (and every [`RenderState`](super::RenderState))
//! that references it. Records are never mutated after construction.

use crate::renderer::api::{
    ComputePipelineId, DescriptorSetId, PipelineBindPoint, PipelineLayoutId, RenderPipelineId,
    ShaderStageFlags,
};
use crate::renderer::traits::CommandBuffer;

/// A state record that knows how to emit itself with the standard bind encoding.
pub trait Dispatch {
    /// Records the command that makes this state current.
    fn dispatch(&self, commands: &mut dyn CommandBuffer);
}

/// A state record that can also emit itself with the inline encoding.
pub trait DispatchInline {
    /// Records the command that makes this state current, using the inline encoding.
    fn dispatch_inline(&self, commands: &mut dyn CommandBuffer);
}

/// Binds a graphics pipeline together with its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGraphicsPipeline {
    /// The pipeline to bind.
    pub pipeline: RenderPipelineId,
    /// The layout the pipeline was created with.
    pub layout: PipelineLayoutId,
}

impl BindGraphicsPipeline {
    /// Creates a new graphics pipeline bind record.
    pub fn new(pipeline: RenderPipelineId, layout: PipelineLayoutId) -> Self {
        Self { pipeline, layout }
    }
}

impl Dispatch for BindGraphicsPipeline {
    fn dispatch(&self, commands: &mut dyn CommandBuffer) {
        commands.bind_graphics_pipeline(self.pipeline, self.layout);
    }
}

/// Binds a compute pipeline together with its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindComputePipeline {
    /// The pipeline to bind.
    pub pipeline: ComputePipelineId,
    /// The layout the pipeline was created with.
    pub layout: PipelineLayoutId,
}

impl BindComputePipeline {
    /// Creates a new compute pipeline bind record.
    pub fn new(pipeline: ComputePipelineId, layout: PipelineLayoutId) -> Self {
        Self { pipeline, layout }
    }
}

impl Dispatch for BindComputePipeline {
    fn dispatch(&self, commands: &mut dyn CommandBuffer) {
        commands.bind_compute_pipeline(self.pipeline, self.layout);
    }
}

/// Binds one or more consecutive descriptor sets starting at `first_set`.
///
/// The aggregate state files a record under its `first_set` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindDescriptorSets {
    /// The pipeline type the sets are bound for.
    pub bind_point: PipelineBindPoint,
    /// The layout the sets are bound against.
    pub layout: PipelineLayoutId,
    /// The set index of `sets[0]`.
    pub first_set: u32,
    /// The sets to bind, in set order.
    pub sets: Vec<DescriptorSetId>,
    /// Dynamic offsets consumed by dynamic buffer bindings, in binding order.
    pub dynamic_offsets: Vec<u32>,
}

impl BindDescriptorSets {
    /// Creates a record binding `sets` from `first_set` onwards with no dynamic offsets.
    pub fn new(
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: impl Into<Vec<DescriptorSetId>>,
    ) -> Self {
        Self {
            bind_point,
            layout,
            first_set,
            sets: sets.into(),
            dynamic_offsets: Vec::new(),
        }
    }

    /// Creates a record binding a single graphics descriptor set at `set`.
    pub fn single(layout: PipelineLayoutId, set: u32, descriptor_set: DescriptorSetId) -> Self {
        Self::new(PipelineBindPoint::Graphics, layout, set, vec![descriptor_set])
    }

    /// Returns the record with the given dynamic offsets.
    pub fn with_dynamic_offsets(mut self, dynamic_offsets: impl Into<Vec<u32>>) -> Self {
        self.dynamic_offsets = dynamic_offsets.into();
        self
    }
}

impl Dispatch for BindDescriptorSets {
    fn dispatch(&self, commands: &mut dyn CommandBuffer) {
        commands.bind_descriptor_sets(
            self.bind_point,
            self.layout,
            self.first_set,
            &self.sets,
            &self.dynamic_offsets,
        );
    }
}

impl DispatchInline for BindDescriptorSets {
    fn dispatch_inline(&self, commands: &mut dyn CommandBuffer) {
        commands.bind_descriptor_sets_inline(
            self.bind_point,
            self.layout,
            self.first_set,
            &self.sets,
            &self.dynamic_offsets,
        );
    }
}

/// A push-constant payload uploaded at a fixed offset of the current pipeline layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConstants {
    /// The shader stages that read the range.
    pub stage_flags: ShaderStageFlags,
    /// The byte offset of the payload within the push-constant range.
    pub offset: u32,
    /// The raw payload.
    pub data: Vec<u8>,
}

impl PushConstants {
    /// Creates a payload from raw bytes.
    pub fn new(stage_flags: ShaderStageFlags, offset: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            stage_flags,
            offset,
            data: data.into(),
        }
    }

    /// Creates a payload from the bytes of any plain-old-data value.
    pub fn from_pod<T: bytemuck::Pod>(stage_flags: ShaderStageFlags, offset: u32, value: &T) -> Self {
        Self::new(stage_flags, offset, bytemuck::bytes_of(value))
    }

    /// Returns the payload size in bytes.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }
}

impl Dispatch for PushConstants {
    fn dispatch(&self, commands: &mut dyn CommandBuffer) {
        commands.push_constants(self.stage_flags, self.offset, &self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constants_from_pod_keeps_bytes() {
        #[repr(C)]
        #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
        struct Tint {
            rgba: [f32; 4],
        }

        let pc = PushConstants::from_pod(
            ShaderStageFlags::FRAGMENT,
            192,
            &Tint {
                rgba: [1.0, 0.5, 0.25, 1.0],
            },
        );
        assert_eq!(pc.size(), 16);
        assert_eq!(pc.offset, 192);
        let expected = [1.0f32, 0.5, 0.25, 1.0];
        assert_eq!(pc.data.as_slice(), bytemuck::bytes_of(&expected));
    }

    #[test]
    fn descriptor_sets_builders() {
        let single = BindDescriptorSets::single(PipelineLayoutId(2), 1, DescriptorSetId(9));
        assert_eq!(single.bind_point, PipelineBindPoint::Graphics);
        assert_eq!(single.first_set, 1);
        assert_eq!(single.sets, vec![DescriptorSetId(9)]);
        assert!(single.dynamic_offsets.is_empty());

        let dynamic = single.with_dynamic_offsets([256]);
        assert_eq!(dynamic.dynamic_offsets, vec![256]);
    }
}
