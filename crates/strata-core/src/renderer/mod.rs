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

//! Provides the backend-agnostic rendering contracts and the state tracker built on them.
//!
//! This module defines the "common language" used to record GPU work: opaque
//! handles in [`api`], the [`CommandBuffer`] and [`RenderStage`] traits, and the
//! error types stages return. The [`state`] module sits on top of these
//! contracts and decides which state-setting commands actually need recording.
//!
//! The 'how' of recording is left to a concrete backend in the `strata-infra`
//! crate, which implements [`CommandBuffer`].

pub mod api;
pub mod error;
pub mod state;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{RenderError, ValidationError};
pub use self::state::{MatrixSlot, MatrixStack, RenderState, StateSettings, StateStack};
pub use self::traits::{CommandBuffer, RenderStage};
