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

//! Counters and depth snapshots for diagnosing traversals.

/// Cumulative dispatch counters of a [`RenderState`](super::RenderState).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateStats {
    /// Dispatch calls that found the state dirty and walked the sub-stacks.
    pub dispatch_passes: u64,
    /// Dispatch calls short-circuited by the clean aggregate flag.
    pub skipped_passes: u64,
    /// State-setting commands recorded across all passes.
    pub commands_emitted: u64,
}

/// The frame count of every stack held by a [`RenderState`](super::RenderState).
///
/// Comparing a snapshot taken before a subtree is visited with one taken after
/// it is the cheapest way to find an unbalanced push or pop. Sub-states compiled
/// out by Cargo features report zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDepths {
    /// Frames on the compute-pipeline stack.
    pub compute_pipelines: usize,
    /// Frames on the graphics-pipeline stack.
    pub graphics_pipelines: usize,
    /// Frames on each descriptor-set slot, indexed by set number.
    pub descriptor_sets: Vec<usize>,
    /// Frames on the projection matrix stack.
    pub projection: usize,
    /// Frames on the view matrix stack.
    pub view: usize,
    /// Frames on the model matrix stack.
    pub model: usize,
    /// Frames on each push-constant stack, in key order.
    pub push_constants: Vec<(u32, usize)>,
}
