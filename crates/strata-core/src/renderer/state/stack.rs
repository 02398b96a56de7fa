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

//! Dirty-tracked state stacks.
//!
//! A [`StateStack`] holds shared, immutable state records and remembers whether
//! the record on top has been communicated to the command buffer yet. Pushing
//! always marks the stack dirty; popping marks it dirty only if a frame is left
//! to expose. Dispatching a clean stack records nothing, which is what makes
//! repeated dispatches between state changes free.
//!
//! The same stack is used with two emission encodings, selected by a marker
//! type: [`Bind`] calls [`Dispatch::dispatch`] on the top record and [`Inline`]
//! calls [`DispatchInline::dispatch_inline`]. [`InlineStateStack`] is the
//! latter spelled out.

use super::commands::{Dispatch, DispatchInline};
use crate::renderer::traits::CommandBuffer;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Selects how a stack's top record is written into the command buffer.
pub trait Emission<T: ?Sized> {
    /// Records `value` into `commands`.
    fn emit(value: &T, commands: &mut dyn CommandBuffer);
}

/// The standard bind encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bind;

/// The inline encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl<T: Dispatch + ?Sized> Emission<T> for Bind {
    #[inline]
    fn emit(value: &T, commands: &mut dyn CommandBuffer) {
        value.dispatch(commands);
    }
}

impl<T: DispatchInline + ?Sized> Emission<T> for Inline {
    #[inline]
    fn emit(value: &T, commands: &mut dyn CommandBuffer) {
        value.dispatch_inline(commands);
    }
}

/// A stack of shared state records with a dirty flag.
pub struct StateStack<T: ?Sized, E = Bind> {
    stack: Vec<Arc<T>>,
    dirty: bool,
    _emission: PhantomData<fn() -> E>,
}

/// A [`StateStack`] that emits its records with the inline encoding.
pub type InlineStateStack<T> = StateStack<T, Inline>;

impl<T: ?Sized, E> StateStack<T, E> {
    /// Creates an empty, clean stack.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            dirty: false,
            _emission: PhantomData,
        }
    }

    /// Pushes `value` as the new top frame and marks the stack dirty.
    #[inline]
    pub fn push(&mut self, value: Arc<T>) {
        self.stack.push(value);
        self.dirty = true;
    }

    /// Removes the top frame.
    ///
    /// The stack stays dirty only if a frame is left to expose. Popping an empty
    /// stack means pushes and pops are unbalanced; debug builds assert on it.
    #[inline]
    pub fn pop(&mut self) -> Option<Arc<T>> {
        debug_assert!(!self.stack.is_empty(), "pop on an empty state stack");
        let popped = self.stack.pop();
        self.dirty = !self.stack.is_empty();
        popped
    }

    /// Returns the number of frames on the stack.
    #[inline]
    pub fn size(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if the stack holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns `true` if the top frame has not been dispatched since the last push or pop.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the top frame.
    #[inline]
    pub fn top(&self) -> Option<&Arc<T>> {
        self.stack.last()
    }

    /// Returns the top frame for replacement.
    ///
    /// The stack is marked dirty, since the caller may swap the frame's record.
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut Arc<T>> {
        let top = self.stack.last_mut()?;
        self.dirty = true;
        Some(top)
    }
}

impl<T: ?Sized, E: Emission<T>> StateStack<T, E> {
    /// Records the top frame if the stack is dirty, then marks it clean.
    ///
    /// Returns `true` if a command was recorded.
    #[inline]
    pub fn dispatch(&mut self, commands: &mut dyn CommandBuffer) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        match self.stack.last() {
            Some(top) => {
                E::emit(top, commands);
                true
            }
            None => false,
        }
    }
}

impl<T: ?Sized, E> Default for StateStack<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + fmt::Debug, E> fmt::Debug for StateStack<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStack")
            .field("stack", &self.stack)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::{DescriptorSetId, PipelineLayoutId, RenderPipelineId};
    use crate::renderer::state::commands::{BindDescriptorSets, BindGraphicsPipeline};
    use crate::renderer::state::test_support::{Emitted, SpyCommandBuffer};

    fn pipeline(id: usize) -> Arc<BindGraphicsPipeline> {
        Arc::new(BindGraphicsPipeline::new(
            RenderPipelineId(id),
            PipelineLayoutId(0),
        ))
    }

    #[test]
    fn new_stack_is_empty_and_clean() {
        let stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        assert!(stack.is_empty());
        assert!(!stack.is_dirty());
        assert!(stack.top().is_none());
    }

    #[test]
    fn dispatch_twice_emits_once() {
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        let mut commands = SpyCommandBuffer::default();
        stack.push(pipeline(1));

        assert!(stack.dispatch(&mut commands));
        assert!(!stack.dispatch(&mut commands));
        assert_eq!(
            commands.emitted,
            vec![Emitted::GraphicsPipeline(RenderPipelineId(1))]
        );
    }

    #[test]
    fn balanced_push_pop_returns_to_empty_and_clean() {
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        for id in 1..=3 {
            stack.push(pipeline(id));
        }
        assert_eq!(stack.size(), 3);

        for _ in 0..3 {
            stack.pop();
        }
        assert!(stack.is_empty());
        assert!(!stack.is_dirty());
    }

    #[test]
    fn pop_reexposes_previous_frame() {
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        let mut commands = SpyCommandBuffer::default();
        stack.push(pipeline(1));
        stack.push(pipeline(2));
        stack.dispatch(&mut commands);
        assert!(!stack.is_dirty());

        let popped = stack.pop();
        assert_eq!(popped.map(|p| p.pipeline), Some(RenderPipelineId(2)));
        assert!(stack.is_dirty());

        assert!(stack.dispatch(&mut commands));
        assert_eq!(
            commands.emitted,
            vec![
                Emitted::GraphicsPipeline(RenderPipelineId(2)),
                Emitted::GraphicsPipeline(RenderPipelineId(1)),
            ]
        );
    }

    #[test]
    fn popping_last_frame_leaves_stack_clean() {
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        let mut commands = SpyCommandBuffer::default();
        stack.push(pipeline(1));
        stack.pop();

        assert!(!stack.is_dirty());
        assert!(!stack.dispatch(&mut commands));
        assert!(commands.emitted.is_empty());
    }

    #[test]
    fn shared_record_survives_pop() {
        let shared = pipeline(7);
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        stack.push(Arc::clone(&shared));
        stack.push(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 3);

        stack.pop();
        stack.pop();
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn top_mut_marks_dirty() {
        let mut stack: StateStack<BindGraphicsPipeline> = StateStack::new();
        let mut commands = SpyCommandBuffer::default();
        stack.push(pipeline(1));
        stack.dispatch(&mut commands);

        if let Some(top) = stack.top_mut() {
            *top = pipeline(4);
        }
        assert!(stack.is_dirty());
        stack.dispatch(&mut commands);
        assert_eq!(
            commands.emitted.last(),
            Some(&Emitted::GraphicsPipeline(RenderPipelineId(4)))
        );
    }

    #[test]
    fn inline_stack_uses_inline_encoding() {
        let mut standard: StateStack<BindDescriptorSets> = StateStack::new();
        let mut inline: InlineStateStack<BindDescriptorSets> = InlineStateStack::new();
        let record = Arc::new(BindDescriptorSets::single(
            PipelineLayoutId(0),
            0,
            DescriptorSetId(3),
        ));
        standard.push(Arc::clone(&record));
        inline.push(record);

        let mut commands = SpyCommandBuffer::default();
        standard.dispatch(&mut commands);
        inline.dispatch(&mut commands);
        assert_eq!(
            commands.emitted,
            vec![
                Emitted::DescriptorSets {
                    first_set: 0,
                    sets: vec![DescriptorSetId(3)],
                    inline: false,
                },
                Emitted::DescriptorSets {
                    first_set: 0,
                    sets: vec![DescriptorSetId(3)],
                    inline: true,
                },
            ]
        );
    }
}
