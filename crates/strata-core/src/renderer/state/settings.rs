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

//! Configuration for the aggregate render state.

use crate::math::Mat4;
use crate::renderer::api::ShaderStageFlags;
use serde::{Deserialize, Serialize};

/// Settings consumed by [`RenderState::with_settings`](super::RenderState::with_settings).
///
/// The defaults lay the projection, view and model matrices out back to back
/// at offsets 0, 64 and 128 of one push-constant range, read by the vertex stage.
/// Which sub-states are tracked at all is decided at build time through the
/// crate's Cargo features, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Push-constant offset of the projection matrix, in bytes.
    pub projection_offset: u32,
    /// Push-constant offset of the view matrix, in bytes.
    pub view_offset: u32,
    /// Push-constant offset of the model matrix, in bytes.
    pub model_offset: u32,
    /// Shader stages that read the three matrices.
    pub matrix_stage_flags: ShaderStageFlags,
    /// Number of descriptor-set slots reserved up front. Ignored with fixed slots.
    pub descriptor_set_capacity: usize,
}

impl StateSettings {
    /// Returns `true` if any two matrix upload ranges overlap.
    pub fn matrix_ranges_overlap(&self) -> bool {
        let size = u64::from(Mat4::SIZE);
        let offsets = [self.projection_offset, self.view_offset, self.model_offset].map(u64::from);
        offsets.iter().enumerate().any(|(i, &a)| {
            offsets[i + 1..]
                .iter()
                .any(|&b| a < b + size && b < a + size)
        })
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            projection_offset: 0,
            view_offset: Mat4::SIZE,
            model_offset: 2 * Mat4::SIZE,
            matrix_stage_flags: ShaderStageFlags::VERTEX,
            descriptor_set_capacity: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets_do_not_overlap() {
        let settings = StateSettings::default();
        assert_eq!(
            (
                settings.projection_offset,
                settings.view_offset,
                settings.model_offset
            ),
            (0, 64, 128)
        );
        assert!(!settings.matrix_ranges_overlap());
    }

    #[test]
    fn overlapping_offsets_are_detected() {
        let settings = StateSettings {
            view_offset: 32,
            ..StateSettings::default()
        };
        assert!(settings.matrix_ranges_overlap());
    }

    #[test]
    fn offsets_near_u32_max_do_not_overflow() {
        let settings: StateSettings =
            serde_json::from_str(r#"{ "model_offset": 4294967295 }"#).expect("valid settings");
        assert!(!settings.matrix_ranges_overlap());

        let settings = StateSettings {
            projection_offset: u32::MAX - 16,
            model_offset: u32::MAX,
            ..StateSettings::default()
        };
        assert!(settings.matrix_ranges_overlap());
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: StateSettings =
            serde_json::from_str(r#"{ "model_offset": 192, "matrix_stage_flags": 3 }"#)
                .expect("valid settings");
        assert_eq!(settings.model_offset, 192);
        assert_eq!(settings.view_offset, 64);
        assert_eq!(settings.matrix_stage_flags, ShaderStageFlags::VERTEX_FRAGMENT);
    }
}
