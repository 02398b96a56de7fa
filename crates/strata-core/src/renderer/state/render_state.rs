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

//! The aggregate render state a traversal dispatches before each draw.

#[cfg(feature = "compute")]
use super::commands::BindComputePipeline;
#[cfg(feature = "push-constants")]
use super::commands::PushConstants;
use super::commands::{BindDescriptorSets, BindGraphicsPipeline};
use super::matrix_stack::MatrixStack;
use super::settings::StateSettings;
use super::stack::{InlineStateStack, StateStack};
use super::stats::{StateDepths, StateStats};
use crate::math::Mat4;
use crate::renderer::traits::CommandBuffer;
#[cfg(feature = "push-constants")]
use std::collections::BTreeMap;
use std::sync::Arc;

/// The number of descriptor-set slots when slots are fixed at build time.
#[cfg(feature = "fixed-descriptor-sets")]
pub const MAX_DESCRIPTOR_SETS: usize = 4;

/// The highest number of descriptor-set slots dynamic slots grow to.
///
/// Matches the largest `maxBoundDescriptorSets` reported by current drivers.
#[cfg(not(feature = "fixed-descriptor-sets"))]
pub const DESCRIPTOR_SET_LIMIT: usize = 32;

/// One inline descriptor stack per set index.
#[cfg(not(feature = "fixed-descriptor-sets"))]
pub type DescriptorStacks = Vec<InlineStateStack<BindDescriptorSets>>;

/// One inline descriptor stack per set index.
#[cfg(feature = "fixed-descriptor-sets")]
pub type DescriptorStacks = [InlineStateStack<BindDescriptorSets>; MAX_DESCRIPTOR_SETS];

/// Identifies one of the three transform stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixSlot {
    /// The projection matrix.
    Projection,
    /// The view matrix.
    View,
    /// The model matrix.
    Model,
}

/// Tracks every piece of GPU state a traversal pushes and emits only what changed.
///
/// State is tracked at two levels. Each sub-stack keeps its own dirty flag,
/// and the aggregate keeps one more that gates the whole [`dispatch`](Self::dispatch)
/// pass. The delegating `push_*`/`pop_*`/`set_*` methods raise the aggregate flag;
/// code that manipulates a sub-stack through a raw `*_mut` accessor must call
/// [`mark_dirty`](Self::mark_dirty) itself. Sub-stacks are never polled.
///
/// A `RenderState` belongs to the thread recording one command buffer. The
/// records it references are `Arc`s and may be shared freely between states.
#[derive(Debug)]
pub struct RenderState {
    dirty: bool,
    #[cfg(feature = "compute")]
    compute_pipeline_stack: StateStack<BindComputePipeline>,
    graphics_pipeline_stack: StateStack<BindGraphicsPipeline>,
    descriptor_stacks: DescriptorStacks,
    projection_matrix_stack: MatrixStack,
    view_matrix_stack: MatrixStack,
    model_matrix_stack: MatrixStack,
    #[cfg(feature = "push-constants")]
    push_constants_map: BTreeMap<u32, StateStack<PushConstants>>,
    stats: StateStats,
}

impl RenderState {
    /// Creates a state with the default matrix layout.
    pub fn new() -> Self {
        Self::with_settings(&StateSettings::default())
    }

    /// Creates a state configured by `settings`.
    pub fn with_settings(settings: &StateSettings) -> Self {
        if settings.matrix_ranges_overlap() {
            log::warn!(
                "RenderState: matrix push-constant ranges overlap (projection {}, view {}, model {})",
                settings.projection_offset,
                settings.view_offset,
                settings.model_offset
            );
        }

        let matrix_stack =
            |offset| MatrixStack::new(offset).with_stage_flags(settings.matrix_stage_flags);

        #[cfg(not(feature = "fixed-descriptor-sets"))]
        let descriptor_stacks = Vec::with_capacity(settings.descriptor_set_capacity);
        #[cfg(feature = "fixed-descriptor-sets")]
        let descriptor_stacks = std::array::from_fn(|_| InlineStateStack::new());

        Self {
            dirty: false,
            #[cfg(feature = "compute")]
            compute_pipeline_stack: StateStack::new(),
            graphics_pipeline_stack: StateStack::new(),
            descriptor_stacks,
            projection_matrix_stack: matrix_stack(settings.projection_offset),
            view_matrix_stack: matrix_stack(settings.view_offset),
            model_matrix_stack: matrix_stack(settings.model_offset),
            #[cfg(feature = "push-constants")]
            push_constants_map: BTreeMap::new(),
            stats: StateStats::default(),
        }
    }

    /// Returns `true` if the next [`dispatch`](Self::dispatch) will walk the sub-stacks.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Raises the aggregate dirty flag after a sub-stack was changed directly.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // --- Pipelines ---

    /// Pushes a graphics pipeline bind.
    pub fn push_graphics_pipeline(&mut self, value: Arc<BindGraphicsPipeline>) {
        self.graphics_pipeline_stack.push(value);
        self.dirty = true;
    }

    /// Pops the current graphics pipeline bind.
    pub fn pop_graphics_pipeline(&mut self) -> Option<Arc<BindGraphicsPipeline>> {
        self.dirty = true;
        self.graphics_pipeline_stack.pop()
    }

    /// Returns the graphics-pipeline stack.
    pub fn graphics_pipeline_stack(&self) -> &StateStack<BindGraphicsPipeline> {
        &self.graphics_pipeline_stack
    }

    /// Returns the graphics-pipeline stack without raising the aggregate flag.
    pub fn graphics_pipeline_stack_mut(&mut self) -> &mut StateStack<BindGraphicsPipeline> {
        &mut self.graphics_pipeline_stack
    }

    /// Pushes a compute pipeline bind.
    #[cfg(feature = "compute")]
    pub fn push_compute_pipeline(&mut self, value: Arc<BindComputePipeline>) {
        self.compute_pipeline_stack.push(value);
        self.dirty = true;
    }

    /// Pops the current compute pipeline bind.
    #[cfg(feature = "compute")]
    pub fn pop_compute_pipeline(&mut self) -> Option<Arc<BindComputePipeline>> {
        self.dirty = true;
        self.compute_pipeline_stack.pop()
    }

    /// Returns the compute-pipeline stack.
    #[cfg(feature = "compute")]
    pub fn compute_pipeline_stack(&self) -> &StateStack<BindComputePipeline> {
        &self.compute_pipeline_stack
    }

    /// Returns the compute-pipeline stack without raising the aggregate flag.
    #[cfg(feature = "compute")]
    pub fn compute_pipeline_stack_mut(&mut self) -> &mut StateStack<BindComputePipeline> {
        &mut self.compute_pipeline_stack
    }

    // --- Descriptor sets ---

    /// Pushes a descriptor-set bind onto the slot named by its `first_set`.
    ///
    /// With dynamic slots the collection grows to reach the slot, up to
    /// `DESCRIPTOR_SET_LIMIT` slots. With fixed slots the bound is
    /// `MAX_DESCRIPTOR_SETS`. A set index past the bound is logged and ignored.
    pub fn push_descriptor_sets(&mut self, value: Arc<BindDescriptorSets>) {
        let set = value.first_set as usize;
        let Some(stack) = self.descriptor_slot(set) else {
            log::error!("RenderState: descriptor set {set} is outside the supported slot range");
            return;
        };
        stack.push(value);
        self.dirty = true;
    }

    /// Pops the descriptor-set bind on slot `set`.
    pub fn pop_descriptor_sets(&mut self, set: u32) -> Option<Arc<BindDescriptorSets>> {
        let stack = self.descriptor_stacks.get_mut(set as usize);
        debug_assert!(stack.is_some(), "pop on descriptor set {set} that was never pushed");
        let popped = stack?.pop();
        self.dirty = true;
        popped
    }

    /// Returns the descriptor stack of slot `set`, if the slot exists.
    pub fn descriptor_stack(&self, set: u32) -> Option<&InlineStateStack<BindDescriptorSets>> {
        self.descriptor_stacks.get(set as usize)
    }

    /// Returns every descriptor stack, indexed by set number.
    pub fn descriptor_stacks(&self) -> &[InlineStateStack<BindDescriptorSets>] {
        &self.descriptor_stacks[..]
    }

    /// Returns the descriptor stack of slot `set` without raising the aggregate flag.
    pub fn descriptor_stack_mut(
        &mut self,
        set: u32,
    ) -> Option<&mut InlineStateStack<BindDescriptorSets>> {
        self.descriptor_stacks.get_mut(set as usize)
    }

    #[cfg(not(feature = "fixed-descriptor-sets"))]
    fn descriptor_slot(&mut self, set: usize) -> Option<&mut InlineStateStack<BindDescriptorSets>> {
        if set >= DESCRIPTOR_SET_LIMIT {
            return None;
        }
        if set >= self.descriptor_stacks.len() {
            log::debug!("RenderState: growing descriptor slots to {}", set + 1);
            self.descriptor_stacks
                .resize_with(set + 1, InlineStateStack::new);
        }
        self.descriptor_stacks.get_mut(set)
    }

    #[cfg(feature = "fixed-descriptor-sets")]
    fn descriptor_slot(&mut self, set: usize) -> Option<&mut InlineStateStack<BindDescriptorSets>> {
        self.descriptor_stacks.get_mut(set)
    }

    // --- Matrices ---

    /// Replaces the whole stack of `slot` with `matrix`.
    pub fn set_matrix(&mut self, slot: MatrixSlot, matrix: impl Into<Mat4>) {
        self.matrix_stack_mut(slot).set(matrix);
        self.dirty = true;
    }

    /// Pushes `matrix` onto the stack of `slot`.
    pub fn push_matrix(&mut self, slot: MatrixSlot, matrix: impl Into<Mat4>) {
        self.matrix_stack_mut(slot).push(matrix);
        self.dirty = true;
    }

    /// Pops the top matrix of `slot`.
    pub fn pop_matrix(&mut self, slot: MatrixSlot) -> Option<Mat4> {
        self.dirty = true;
        self.matrix_stack_mut(slot).pop()
    }

    /// Returns the stack of `slot`.
    pub fn matrix_stack(&self, slot: MatrixSlot) -> &MatrixStack {
        match slot {
            MatrixSlot::Projection => &self.projection_matrix_stack,
            MatrixSlot::View => &self.view_matrix_stack,
            MatrixSlot::Model => &self.model_matrix_stack,
        }
    }

    /// Returns the stack of `slot` without raising the aggregate flag.
    pub fn matrix_stack_mut(&mut self, slot: MatrixSlot) -> &mut MatrixStack {
        match slot {
            MatrixSlot::Projection => &mut self.projection_matrix_stack,
            MatrixSlot::View => &mut self.view_matrix_stack,
            MatrixSlot::Model => &mut self.model_matrix_stack,
        }
    }

    // --- Push constants ---

    /// Pushes a push-constant payload onto the stack keyed by `key`, creating it on first use.
    #[cfg(feature = "push-constants")]
    pub fn push_push_constants(&mut self, key: u32, value: Arc<PushConstants>) {
        self.push_constants_map
            .entry(key)
            .or_insert_with(|| {
                log::debug!("RenderState: tracking push constants for key {key}");
                StateStack::new()
            })
            .push(value);
        self.dirty = true;
    }

    /// Pops the payload on the stack keyed by `key`.
    #[cfg(feature = "push-constants")]
    pub fn pop_push_constants(&mut self, key: u32) -> Option<Arc<PushConstants>> {
        let stack = self.push_constants_map.get_mut(&key);
        debug_assert!(stack.is_some(), "pop on push-constant key {key} that was never pushed");
        let popped = stack?.pop();
        self.dirty = true;
        popped
    }

    /// Returns the push-constant stack keyed by `key`, if one was created.
    #[cfg(feature = "push-constants")]
    pub fn push_constants_stack(&self, key: u32) -> Option<&StateStack<PushConstants>> {
        self.push_constants_map.get(&key)
    }

    /// Returns the push-constant stack keyed by `key` without raising the aggregate flag.
    #[cfg(feature = "push-constants")]
    pub fn push_constants_stack_mut(&mut self, key: u32) -> Option<&mut StateStack<PushConstants>> {
        self.push_constants_map.get_mut(&key)
    }

    // --- Dispatch ---

    /// Records every pending state change into `commands`.
    ///
    /// Does nothing unless the aggregate flag is raised. Otherwise sub-stacks are
    /// dispatched in dependency order: compute pipeline, graphics pipeline,
    /// descriptor sets by ascending set index, projection, view and model
    /// matrices, then push constants by ascending key. Each sub-stack records at
    /// most one command and only if it is dirty itself. Afterwards every flag is
    /// clear.
    ///
    /// Returns the number of commands recorded.
    pub fn dispatch(&mut self, commands: &mut dyn CommandBuffer) -> usize {
        if !self.dirty {
            self.stats.skipped_passes += 1;
            return 0;
        }

        let mut emitted = 0;

        #[cfg(feature = "compute")]
        {
            emitted += usize::from(self.compute_pipeline_stack.dispatch(commands));
        }

        emitted += usize::from(self.graphics_pipeline_stack.dispatch(commands));

        for stack in self.descriptor_stacks.iter_mut() {
            emitted += usize::from(stack.dispatch(commands));
        }

        for stack in [
            &mut self.projection_matrix_stack,
            &mut self.view_matrix_stack,
            &mut self.model_matrix_stack,
        ] {
            emitted += usize::from(stack.dispatch(commands));
        }

        #[cfg(feature = "push-constants")]
        for stack in self.push_constants_map.values_mut() {
            emitted += usize::from(stack.dispatch(commands));
        }

        self.dirty = false;
        self.stats.dispatch_passes += 1;
        self.stats.commands_emitted += emitted as u64;
        log::trace!("RenderState: dispatch pass recorded {emitted} command(s)");
        emitted
    }

    // --- Diagnostics ---

    /// Returns the cumulative dispatch counters.
    pub fn stats(&self) -> StateStats {
        self.stats
    }

    /// Returns a snapshot of every stack's frame count.
    pub fn depths(&self) -> StateDepths {
        StateDepths {
            #[cfg(feature = "compute")]
            compute_pipelines: self.compute_pipeline_stack.size(),
            graphics_pipelines: self.graphics_pipeline_stack.size(),
            descriptor_sets: self.descriptor_stacks.iter().map(|s| s.size()).collect(),
            projection: self.projection_matrix_stack.size(),
            view: self.view_matrix_stack.size(),
            model: self.model_matrix_stack.size(),
            #[cfg(feature = "push-constants")]
            push_constants: self
                .push_constants_map
                .iter()
                .map(|(key, stack)| (*key, stack.size()))
                .collect(),
            ..StateDepths::default()
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}
