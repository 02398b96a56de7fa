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

//! Defines the error types for the rendering subsystem.
//!
//! The state tracker itself never fails: push/pop balance and dispatch ordering
//! are caller preconditions. Misuse is surfaced by a backend's validation layer
//! as a [`ValidationError`], and render stages report their own failures as a
//! [`RenderError`].

use crate::renderer::api::command::{FramebufferId, RenderPassId};
use std::fmt;

/// A misuse of the command-recording contract detected by a validation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A command that requires a pipeline layout was recorded before any pipeline was bound.
    NoPipelineLayoutBound {
        /// The name of the offending command.
        command: &'static str,
    },
    /// A push-constant upload falls outside the device's push-constant range.
    PushConstantRangeExceeded {
        /// The byte offset of the upload.
        offset: u32,
        /// The byte size of the upload.
        size: u32,
        /// The device limit in bytes.
        limit: u32,
    },
    /// A push-constant offset or size is not a multiple of four bytes.
    MisalignedPushConstants {
        /// The byte offset of the upload.
        offset: u32,
        /// The byte size of the upload.
        size: u32,
    },
    /// A draw command was recorded outside a render pass.
    DrawOutsideRenderPass {
        /// The name of the offending command.
        command: &'static str,
    },
    /// A compute dispatch was recorded inside a render pass.
    DispatchInsideRenderPass,
    /// A render pass was begun while another one was still active.
    RenderPassAlreadyActive {
        /// The render pass that is still open.
        active: RenderPassId,
    },
    /// A render pass was ended while none was active.
    NoActiveRenderPass,
    /// The command buffer was finished while a render pass was still active.
    UnterminatedRenderPass {
        /// The render pass that was left open.
        active: RenderPassId,
    },
    /// A command was recorded after the command buffer was finished.
    RecordingFinished {
        /// The name of the offending command.
        command: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoPipelineLayoutBound { command } => {
                write!(f, "'{command}' recorded with no pipeline layout bound")
            }
            ValidationError::PushConstantRangeExceeded {
                offset,
                size,
                limit,
            } => write!(
                f,
                "Push constant range [{offset}, {}) exceeds the device limit of {limit} bytes",
                u64::from(*offset) + u64::from(*size)
            ),
            ValidationError::MisalignedPushConstants { offset, size } => write!(
                f,
                "Push constant offset {offset} and size {size} must be multiples of 4"
            ),
            ValidationError::DrawOutsideRenderPass { command } => {
                write!(f, "'{command}' recorded outside a render pass")
            }
            ValidationError::DispatchInsideRenderPass => {
                write!(f, "Compute dispatch recorded inside a render pass")
            }
            ValidationError::RenderPassAlreadyActive { active } => {
                write!(f, "Render pass begun while {active:?} is still active")
            }
            ValidationError::NoActiveRenderPass => {
                write!(f, "Render pass ended while none was active")
            }
            ValidationError::UnterminatedRenderPass { active } => {
                write!(f, "Command buffer finished with {active:?} still active")
            }
            ValidationError::RecordingFinished { command } => {
                write!(f, "'{command}' recorded after the command buffer was finished")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// An error reported by a render stage while populating a command buffer.
#[derive(Debug)]
pub enum RenderError {
    /// The framebuffer handed to the stage is not usable with its render pass.
    InvalidFramebuffer {
        /// The framebuffer that was rejected.
        framebuffer: FramebufferId,
        /// The render pass it was paired with.
        render_pass: RenderPassId,
    },
    /// The render area has a zero width or height.
    EmptyRenderArea,
    /// The backend rejected the recorded commands.
    Validation(ValidationError),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidFramebuffer {
                framebuffer,
                render_pass,
            } => write!(
                f,
                "Framebuffer {framebuffer:?} is not compatible with {render_pass:?}"
            ),
            RenderError::EmptyRenderArea => {
                write!(f, "The render area has a zero width or height.")
            }
            RenderError::Validation(err) => write!(f, "Command validation failed: {err}"),
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RenderError {
    fn from(err: ValidationError) -> Self {
        RenderError::Validation(err)
    }
}
