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

//! A transform stack uploaded as push constants.

use crate::math::Mat4;
use crate::renderer::api::ShaderStageFlags;
use crate::renderer::traits::CommandBuffer;

/// A stack of 4x4 matrices uploaded to a fixed push-constant offset.
///
/// The stack is seeded with an identity frame and starts dirty, so the first
/// dispatch always establishes a defined value. Unlike [`StateStack`](super::StateStack),
/// popping always marks the stack dirty: the exposed frame is re-uploaded even if
/// it happens to match what the GPU already holds.
///
/// Dispatching records a `push_constants` command against the command buffer's
/// current pipeline layout, so the pipeline must be dispatched first.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
    stage_flags: ShaderStageFlags,
    offset: u32,
    dirty: bool,
}

impl MatrixStack {
    /// Creates a stack uploading to `offset`, seeded with the identity matrix.
    pub fn new(offset: u32) -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
            stage_flags: ShaderStageFlags::VERTEX,
            offset,
            dirty: true,
        }
    }

    /// Returns the stack with the given consuming shader stages.
    pub fn with_stage_flags(mut self, stage_flags: ShaderStageFlags) -> Self {
        self.stage_flags = stage_flags;
        self
    }

    /// Replaces the whole stack with a single frame holding `matrix`.
    ///
    /// Double-precision input is narrowed to `f32`.
    pub fn set(&mut self, matrix: impl Into<Mat4>) {
        self.stack.clear();
        self.stack.push(matrix.into());
        self.dirty = true;
    }

    /// Pushes `matrix` as a new frame.
    pub fn push(&mut self, matrix: impl Into<Mat4>) {
        self.stack.push(matrix.into());
        self.dirty = true;
    }

    /// Removes the top frame and marks the stack dirty.
    pub fn pop(&mut self) -> Option<Mat4> {
        debug_assert!(!self.stack.is_empty(), "pop on an empty matrix stack");
        let popped = self.stack.pop();
        self.dirty = true;
        popped
    }

    /// Returns the top matrix.
    #[inline]
    pub fn top(&self) -> Option<&Mat4> {
        self.stack.last()
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

    /// Returns `true` if the top matrix needs to be uploaded.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the byte offset of the upload within the push-constant range.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the shader stages the upload targets.
    #[inline]
    pub fn stage_flags(&self) -> ShaderStageFlags {
        self.stage_flags
    }

    /// Uploads the top matrix if the stack is dirty, then marks it clean.
    ///
    /// Returns `true` if a command was recorded.
    pub fn dispatch(&mut self, commands: &mut dyn CommandBuffer) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        match self.stack.last() {
            Some(matrix) => {
                commands.push_constants(self.stage_flags, self.offset, matrix.as_bytes());
                true
            }
            None => false,
        }
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{DMat4, Vec3};
    use crate::renderer::state::test_support::{Emitted, SpyCommandBuffer};

    fn translation(x: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
    }

    fn upload(offset: u32, matrix: &Mat4) -> Emitted {
        Emitted::PushConstants {
            stages: ShaderStageFlags::VERTEX,
            offset,
            data: matrix.as_bytes().to_vec(),
        }
    }

    #[test]
    fn new_stack_is_seeded_with_identity() {
        let stack = MatrixStack::default();
        assert_eq!(stack.size(), 1);
        assert_eq!(stack.top(), Some(&Mat4::IDENTITY));
        assert!(stack.is_dirty());
        assert_eq!(stack.offset(), 0);
        assert_eq!(stack.stage_flags(), ShaderStageFlags::VERTEX);
    }

    #[test]
    fn dispatch_twice_uploads_once() {
        let mut stack = MatrixStack::new(64);
        let mut commands = SpyCommandBuffer::with_layout();

        assert!(stack.dispatch(&mut commands));
        assert!(!stack.dispatch(&mut commands));
        assert_eq!(commands.emitted, vec![upload(64, &Mat4::IDENTITY)]);
    }

    #[test]
    fn pop_always_forces_reupload() {
        let m1 = translation(1.0);
        let m2 = translation(2.0);
        let mut stack = MatrixStack::new(128);
        let mut commands = SpyCommandBuffer::with_layout();

        stack.push(m1);
        stack.dispatch(&mut commands);
        stack.push(m2);
        stack.dispatch(&mut commands);
        stack.pop();
        assert!(stack.is_dirty());
        stack.dispatch(&mut commands);

        assert_eq!(
            commands.emitted,
            vec![upload(128, &m1), upload(128, &m2), upload(128, &m1)]
        );
    }

    #[test]
    fn set_replaces_instead_of_nesting() {
        let mut stack = MatrixStack::default();
        stack.push(translation(1.0));
        stack.push(translation(2.0));
        stack.set(translation(3.0));

        assert_eq!(stack.size(), 1);
        assert_eq!(stack.top(), Some(&translation(3.0)));
        assert!(stack.is_dirty());
    }

    #[test]
    fn set_accepts_double_precision() {
        let mut stack = MatrixStack::default();
        stack.set(DMat4::from_translation(4.0, 5.0, 6.0));
        assert_eq!(
            stack.top(),
            Some(&Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0)))
        );
    }

    #[test]
    fn stage_flags_are_forwarded() {
        let mut stack = MatrixStack::new(0).with_stage_flags(ShaderStageFlags::VERTEX_FRAGMENT);
        let mut commands = SpyCommandBuffer::with_layout();
        stack.dispatch(&mut commands);

        match &commands.emitted[..] {
            [Emitted::PushConstants { stages, data, .. }] => {
                assert_eq!(*stages, ShaderStageFlags::VERTEX_FRAGMENT);
                assert_eq!(data.len(), 64);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }
}
