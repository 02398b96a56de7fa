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

// Strata Sandbox
// Records one frame of a small scene tree and logs the deduplicated command stream.

use std::sync::Arc;

use anyhow::Result;
use strata_core::math::{DMat4, Extent2D, LinearRgba, Mat4, Vec3};
use strata_core::renderer::api::*;
use strata_core::renderer::error::RenderError;
use strata_core::renderer::state::{
    BindDescriptorSets, BindGraphicsPipeline, MatrixSlot, PushConstants, RenderState,
};
use strata_core::renderer::traits::{CommandBuffer, RenderStage};
use strata_infra::RecordingCommandBuffer;

const SCENE_LAYOUT: PipelineLayoutId = PipelineLayoutId(1);
const TINT_OFFSET: u32 = 192;

/// A node of the toy scene. Every field is optional state the node overrides
/// for itself and its children.
#[derive(Default)]
struct SceneNode {
    name: &'static str,
    pipeline: Option<Arc<BindGraphicsPipeline>>,
    material: Option<Arc<BindDescriptorSets>>,
    tint: Option<Arc<PushConstants>>,
    transform: Option<Mat4>,
    vertex_count: Option<u32>,
    children: Vec<SceneNode>,
}

struct SceneStage {
    root: SceneNode,
    state: RenderState,
    camera: Arc<BindDescriptorSets>,
    projection: Mat4,
    view: DMat4,
}

impl SceneStage {
    fn new(root: SceneNode) -> Self {
        Self {
            root,
            state: RenderState::new(),
            camera: Arc::new(BindDescriptorSets::single(SCENE_LAYOUT, 0, DescriptorSetId(0))),
            projection: Mat4::from_scale(Vec3::new(0.5625, 1.0, -1.0)),
            view: DMat4::from_translation(0.0, -2.0, -10.0),
        }
    }

    fn visit(state: &mut RenderState, commands: &mut dyn CommandBuffer, node: &SceneNode) {
        if let Some(pipeline) = &node.pipeline {
            state.push_graphics_pipeline(Arc::clone(pipeline));
        }
        if let Some(material) = &node.material {
            state.push_descriptor_sets(Arc::clone(material));
        }
        if let Some(tint) = &node.tint {
            state.push_push_constants(TINT_OFFSET, Arc::clone(tint));
        }
        if let Some(local) = node.transform {
            let parent = state
                .matrix_stack(MatrixSlot::Model)
                .top()
                .copied()
                .unwrap_or_default();
            state.push_matrix(MatrixSlot::Model, parent * local);
        }

        if let Some(vertex_count) = node.vertex_count {
            let emitted = state.dispatch(commands);
            log::debug!("{}: {emitted} state command(s) before draw", node.name);
            commands.draw(0..vertex_count, 0..1);
        }
        for child in &node.children {
            Self::visit(state, commands, child);
        }

        if node.transform.is_some() {
            state.pop_matrix(MatrixSlot::Model);
        }
        if node.tint.is_some() {
            state.pop_push_constants(TINT_OFFSET);
        }
        if let Some(material) = &node.material {
            state.pop_descriptor_sets(material.first_set);
        }
        if node.pipeline.is_some() {
            state.pop_graphics_pipeline();
        }
    }
}

impl RenderStage for SceneStage {
    fn populate_command_buffer(
        &mut self,
        commands: &mut dyn CommandBuffer,
        framebuffer: FramebufferId,
        render_pass: RenderPassId,
        extent: Extent2D,
        clear_color: LinearRgba,
    ) -> Result<(), RenderError> {
        if extent.is_empty() {
            return Err(RenderError::EmptyRenderArea);
        }

        commands.begin_render_pass(render_pass, framebuffer, extent, clear_color);
        self.state.set_matrix(MatrixSlot::Projection, self.projection);
        self.state.set_matrix(MatrixSlot::View, self.view);
        self.state.push_descriptor_sets(Arc::clone(&self.camera));

        Self::visit(&mut self.state, commands, &self.root);

        self.state.pop_descriptor_sets(0);
        commands.end_render_pass();
        Ok(())
    }
}

fn material(id: usize) -> Arc<BindDescriptorSets> {
    Arc::new(BindDescriptorSets::single(SCENE_LAYOUT, 1, DescriptorSetId(id)))
}

fn build_scene() -> SceneNode {
    let lit = Arc::new(BindGraphicsPipeline::new(RenderPipelineId(1), SCENE_LAYOUT));
    let unlit = Arc::new(BindGraphicsPipeline::new(RenderPipelineId(2), SCENE_LAYOUT));
    let warm = Arc::new(PushConstants::from_pod(
        ShaderStageFlags::FRAGMENT,
        TINT_OFFSET,
        &LinearRgba::rgb(1.0, 0.8, 0.4),
    ));
    let crate_material = material(10);

    SceneNode {
        name: "root",
        pipeline: Some(lit),
        children: vec![
            SceneNode {
                name: "crate stack",
                material: Some(Arc::clone(&crate_material)),
                transform: Some(Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0))),
                children: vec![
                    SceneNode {
                        name: "crate a",
                        vertex_count: Some(36),
                        ..Default::default()
                    },
                    SceneNode {
                        name: "crate b",
                        transform: Some(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))),
                        vertex_count: Some(36),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            SceneNode {
                name: "lamp",
                pipeline: Some(unlit),
                tint: Some(warm),
                transform: Some(Mat4::from_translation(Vec3::new(2.0, 3.0, 0.0))),
                vertex_count: Some(24),
                ..Default::default()
            },
            SceneNode {
                name: "floor",
                material: Some(material(11)),
                transform: Some(Mat4::from_scale(Vec3::new(10.0, 1.0, 10.0))),
                vertex_count: Some(6),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut stage = SceneStage::new(build_scene());
    let mut commands = RecordingCommandBuffer::new();
    stage.populate_command_buffer(
        &mut commands,
        FramebufferId(0),
        RenderPassId(0),
        Extent2D::new(1280, 720),
        LinearRgba::rgb(0.1, 0.1, 0.12),
    )?;
    let list = commands.finish();

    for (index, command) in list.commands.iter().enumerate() {
        log::info!("{index:>3}: {command:?}");
    }

    let stats = stage.state.stats();
    log::info!(
        "Recorded {} draw(s) with {} state command(s) over {} dispatch pass(es)",
        list.work_items(),
        list.state_changes(),
        stats.dispatch_passes
    );

    if !list.is_valid() {
        anyhow::bail!(
            "recording produced {} validation error(s): {:?}",
            list.errors.len(),
            list.errors
        );
    }
    Ok(())
}
