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
use crate::renderer::api::{FramebufferId, RenderPassId};
use crate::renderer::error::RenderError;
use crate::renderer::traits::CommandBuffer;

/// A trait defining a unit of rendering work.
///
/// A stage is the consumer of [`RenderState`](crate::renderer::state::RenderState):
/// it walks whatever it is responsible for, pushes and pops state as it goes, and
/// dispatches the tracked state before each draw or compute dispatch. Concrete
/// stages live in the rendering front end and are handed to the recorder as
/// trait objects.
pub trait RenderStage {
    /// Populates `commands` with the work this stage is responsible for.
    ///
    /// # Arguments
    ///
    /// * `commands`: The command buffer to record into.
    /// * `framebuffer`: The framebuffer the stage renders into.
    /// * `render_pass`: The render pass `framebuffer` is compatible with.
    /// * `extent`: The render area.
    /// * `clear_color`: The color the color attachment is cleared to.
    fn populate_command_buffer(
        &mut self,
        commands: &mut dyn CommandBuffer,
        framebuffer: FramebufferId,
        render_pass: RenderPassId,
        extent: Extent2D,
        clear_color: LinearRgba,
    ) -> Result<(), RenderError>;
}
