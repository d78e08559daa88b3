use anyhow::Context as _;
use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};

use super::scene::{self, BatchState, Command, Scene2d};
use super::shaders;
use super::shapes::{MeshKind, QuadSolidInstance, QuadTexturedInstance};
use crate::coords::{Color, Rect, Rect2i};
use crate::device::{
    BlendState, BufferDesc, BufferHandle, BufferType, BufferUsage, BufferView, ContextHandle,
    Device, GlApi, SamplerDesc, SamplerFilter, SamplerHandle, SamplerWrap, TechniqueDesc,
    TechniqueHandle, TextureHandle, VertexAttributeDesc, VertexAttributeType, VertexLayoutDesc,
    VertexStreamDesc,
};
use crate::math::ortho;

/// Contents of the `cbScene2D` uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SceneConstants {
    transform: [f32; 16],
}

/// Unit-quad corners in triangle-strip order.
const QUAD_TEMPLATE: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];

/// GPU-side state of an immediate pass. Instances accumulate CPU-side in a
/// single pending command and flush eagerly when the batch state changes.
struct ImmediateState {
    ctx: Option<ContextHandle>,
    commands: Vec<Command>,
    data: Vec<u8>,
}

/// The 2D quad renderer.
///
/// Owns the builtin techniques, the shared quad-template vertex buffer, and
/// the instance and constant stream buffers every scene is drawn through.
/// One renderer serves any number of scenes and contexts.
pub struct Renderer2d {
    solid_technique: TechniqueHandle,
    textured_technique: TechniqueHandle,
    template_buffer: BufferHandle,
    instance_buffer: BufferHandle,
    constants_buffer: BufferHandle,
    default_sampler: SamplerHandle,
    immediate: ImmediateState,
}

impl Renderer2d {
    /// Creates the builtin 2D resources on `device`.
    pub fn new<G: GlApi>(device: &mut Device<G>) -> anyhow::Result<Self> {
        let solid_layout = device.create_vertex_layout(&VertexLayoutDesc {
            streams: &[
                VertexStreamDesc { instanced: false },
                VertexStreamDesc { instanced: true },
            ],
            attributes: &[
                VertexAttributeDesc { stream: 0, ty: VertexAttributeType::Float, dimension: 2 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Unorm8, dimension: 4 },
            ],
        });
        let textured_layout = device.create_vertex_layout(&VertexLayoutDesc {
            streams: &[
                VertexStreamDesc { instanced: false },
                VertexStreamDesc { instanced: true },
            ],
            attributes: &[
                VertexAttributeDesc { stream: 0, ty: VertexAttributeType::Float, dimension: 2 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Unorm8, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Uint32, dimension: 1 },
            ],
        });

        let solid_technique = device
            .create_technique(&TechniqueDesc {
                layout: solid_layout,
                vertex_src: shaders::QUAD_SOLID_VERT,
                geometry_src: None,
                fragment_src: shaders::QUAD_SOLID_FRAG,
                constant_buffers: &[shaders::SCENE_CONSTANTS_BLOCK],
                samplers: &[],
            })
            .context("compiling the builtin solid-quad technique")?;
        let textured_technique = device
            .create_technique(&TechniqueDesc {
                layout: textured_layout,
                vertex_src: shaders::QUAD_TEXTURED_VERT,
                geometry_src: None,
                fragment_src: shaders::QUAD_TEXTURED_FRAG,
                constant_buffers: &[shaders::SCENE_CONSTANTS_BLOCK],
                samplers: &[shaders::SCENE_SAMPLER],
            })
            .context("compiling the builtin textured-quad technique")?;

        let template_buffer = device
            .create_buffer(&BufferDesc {
                ty: BufferType::Vertex,
                usage: BufferUsage::Immutable,
                initial_data: Some(cast_slice(&QUAD_TEMPLATE)),
            })
            .context("allocating the quad template buffer")?;
        let instance_buffer = device
            .create_buffer(&BufferDesc {
                ty: BufferType::Vertex,
                usage: BufferUsage::Stream,
                initial_data: None,
            })
            .context("allocating the instance stream buffer")?;
        let constants_buffer = device
            .create_buffer(&BufferDesc {
                ty: BufferType::Constant,
                usage: BufferUsage::Stream,
                initial_data: None,
            })
            .context("allocating the scene constants buffer")?;
        let default_sampler = device
            .create_sampler(&SamplerDesc {
                min_filter: SamplerFilter::Linear,
                mag_filter: SamplerFilter::Linear,
                wrap_u: SamplerWrap::ClampToEdge,
                wrap_v: SamplerWrap::ClampToEdge,
            })
            .context("creating the default 2D sampler")?;

        log::debug!("2D renderer initialized");
        Ok(Self {
            solid_technique,
            textured_technique,
            template_buffer,
            instance_buffer,
            constants_buffer,
            default_sampler,
            immediate: ImmediateState {
                ctx: None,
                commands: Vec::new(),
                data: Vec::new(),
            },
        })
    }

    pub(crate) fn solid_technique(&self) -> TechniqueHandle {
        self.solid_technique
    }

    pub(crate) fn textured_technique(&self) -> TechniqueHandle {
        self.textured_technique
    }

    /// Linear clamp-to-edge sampler for callers without special needs.
    pub fn default_sampler(&self) -> SamplerHandle {
        self.default_sampler
    }

    // ── retained scenes ──

    /// Draws a recorded scene into `ctx`.
    ///
    /// Uploads the scene constants and the whole instance buffer once, then
    /// replays the scene's commands in recording order. A scene with no
    /// recorded batches is a no-op and touches nothing on the device.
    pub fn present<G: GlApi>(&self, device: &mut Device<G>, ctx: ContextHandle, scene: &Scene2d) {
        if scene.is_empty() {
            return;
        }
        assert!(
            !scene.viewport().is_empty(),
            "scene presented without a viewport; call reset first"
        );
        self.upload_frame_state(device, ctx, scene.viewport(), scene.scissor());
        if !scene.instance_data().is_empty() {
            device.update_buffer(self.instance_buffer, 0, scene.instance_data());
        }
        for command in scene.commands() {
            self.execute(device, ctx, command);
        }
    }

    fn upload_frame_state<G: GlApi>(
        &self,
        device: &mut Device<G>,
        ctx: ContextHandle,
        viewport: Rect2i,
        scissor: Option<Rect2i>,
    ) {
        let left = viewport.position.x as f32;
        let top = viewport.position.y as f32;
        let right = (viewport.position.x + viewport.size.width) as f32;
        let bottom = (viewport.position.y + viewport.size.height) as f32;
        let constants = SceneConstants {
            transform: ortho(left, top, right, bottom, 0.0, 1.0),
        };
        device.update_buffer(self.constants_buffer, 0, bytes_of(&constants));
        device.set_viewport(ctx, viewport);
        device.set_scissor(ctx, scissor);
        device.set_constant_buffers(ctx, 0, &[BufferView::whole(self.constants_buffer)]);
    }

    fn execute<G: GlApi>(&self, device: &mut Device<G>, ctx: ContextHandle, command: &Command) {
        if command.instance_count == 0 {
            return;
        }
        let state = &command.state;
        device.set_blend_state(ctx, state.blend);
        device.set_technique(ctx, state.technique);
        if let Some((texture, sampler)) = state.texture {
            device.set_textures(ctx, 0, &[texture]);
            device.set_samplers(ctx, 0, &[sampler]);
        }
        device.set_vertex_buffers(
            ctx,
            0,
            &[
                BufferView::whole(self.template_buffer),
                BufferView::range(self.instance_buffer, command.data_offset, 0),
            ],
        );
        device.draw(
            ctx,
            state.mesh.primitive(),
            0,
            state.mesh.vertex_count(),
            command.instance_count,
        );
    }

    // ── immediate mode ──

    /// Opens an immediate pass on `ctx`.
    ///
    /// Immediate draws share the retained path's batching: consecutive
    /// compatible batches accumulate into one pending command, and the
    /// pending command is flushed to the GPU as soon as an incompatible
    /// batch begins (or the pass ends).
    pub fn immediate_begin<G: GlApi>(
        &mut self,
        device: &mut Device<G>,
        ctx: ContextHandle,
        viewport: Rect2i,
    ) {
        assert!(self.immediate.ctx.is_none(), "immediate pass already open");
        assert!(!viewport.is_empty(), "immediate viewport must be non-empty");
        self.immediate.ctx = Some(ctx);
        self.immediate.commands.clear();
        self.immediate.data.clear();
        self.upload_frame_state(device, ctx, viewport, None);
    }

    /// Flushes the pending batch and closes the pass.
    pub fn immediate_end<G: GlApi>(&mut self, device: &mut Device<G>) {
        self.flush_immediate(device);
        self.immediate.ctx = None;
    }

    /// Opens (or continues) a solid-quad batch in the immediate pass.
    pub fn immediate_quads_solid<G: GlApi>(&mut self, device: &mut Device<G>, blend: BlendState) {
        let state = BatchState {
            mesh: MeshKind::QuadSolid,
            technique: self.solid_technique,
            blend,
            texture: None,
        };
        self.immediate_batch(device, state);
    }

    /// Opens (or continues) a textured-quad batch in the immediate pass.
    pub fn immediate_quads_textured<G: GlApi>(
        &mut self,
        device: &mut Device<G>,
        blend: BlendState,
        texture: TextureHandle,
        sampler: SamplerHandle,
    ) {
        let state = BatchState {
            mesh: MeshKind::QuadTextured,
            technique: self.textured_technique,
            blend,
            texture: Some((texture, sampler)),
        };
        self.immediate_batch(device, state);
    }

    pub fn immediate_quad_solid(&mut self, rect: Rect, color: Color) {
        let instance = QuadSolidInstance::new(rect, color);
        scene::push_instance(
            &mut self.immediate.commands,
            &mut self.immediate.data,
            MeshKind::QuadSolid,
            bytes_of(&instance),
        );
    }

    pub fn immediate_quad_textured(&mut self, rect: Rect, uv: Rect, color: Color, layer: u32) {
        let instance = QuadTexturedInstance::new(rect, uv, color, layer);
        scene::push_instance(
            &mut self.immediate.commands,
            &mut self.immediate.data,
            MeshKind::QuadTextured,
            bytes_of(&instance),
        );
    }

    fn immediate_batch<G: GlApi>(&mut self, device: &mut Device<G>, state: BatchState) {
        assert!(
            self.immediate.ctx.is_some(),
            "immediate batch opened outside an immediate pass"
        );
        if let Some(pending) = self.immediate.commands.last() {
            if pending.state != state {
                self.flush_immediate(device);
            }
        }
        scene::begin_batch(&mut self.immediate.commands, &mut self.immediate.data, state);
    }

    fn flush_immediate<G: GlApi>(&mut self, device: &mut Device<G>) {
        let ctx = match self.immediate.ctx {
            Some(ctx) => ctx,
            None => panic!("immediate flush outside an immediate pass"),
        };
        if !self.immediate.data.is_empty() {
            device.update_buffer(self.instance_buffer, 0, &self.immediate.data);
        }
        for i in 0..self.immediate.commands.len() {
            let command = self.immediate.commands[i];
            self.execute(device, ctx, &command);
        }
        self.immediate.commands.clear();
        self.immediate.data.clear();
    }

    // ── test hooks ──

    #[cfg(test)]
    pub(crate) fn instance_buffer(&self) -> BufferHandle {
        self.instance_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{
        GlCall, HeadlessContext, ImageFormat, ImageView, RecordingGl, TextureDesc, TextureType,
    };

    fn setup() -> (Device<RecordingGl>, ContextHandle, Renderer2d) {
        let mut device = Device::new(RecordingGl::new(), Box::new(HeadlessContext));
        let renderer = Renderer2d::new(&mut device).unwrap();
        let ctx = device.create_context(Box::new(HeadlessContext)).unwrap();
        device.backend().take_calls();
        (device, ctx, renderer)
    }

    /// `(vertex count, instance count)` of every instanced draw, in order.
    fn draws(calls: &[GlCall]) -> Vec<(i32, i32)> {
        calls
            .iter()
            .filter_map(|c| match c {
                GlCall::DrawArraysInstanced { count, instances, .. } => Some((*count, *instances)),
                _ => None,
            })
            .collect()
    }

    // ── retained scenes ──

    #[test]
    fn two_solid_quads_batch_into_one_instanced_draw() {
        let (mut device, ctx, renderer) = setup();
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 800, 600));
        scene.begin_quads_solid(&renderer, BlendState::ALPHA);
        scene.quad_solid(Rect::new(10.0, 10.0, 100.0, 100.0), Color(0xFF0000FF));
        scene.begin_quads_solid(&renderer, BlendState::ALPHA);
        scene.quad_solid(Rect::new(50.0, 50.0, 20.0, 20.0), Color(0x00FF00FF));

        renderer.present(&mut device, ctx, &scene);
        let calls = device.backend().take_calls();
        assert_eq!(draws(&calls), vec![(4, 2)]);

        // The uploaded instance stream holds both quads back to back, with
        // the packed colors byte-reversed for the unorm attribute.
        let name = device.buffer_raw_name(renderer.instance_buffer());
        let bytes = device.backend().buffer_bytes(name);
        assert_eq!(bytes.len(), 40);
        let f = |offset: usize| f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap());
        let u = |offset: usize| u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap());
        assert_eq!([f(0), f(4), f(8), f(12)], [10.0, 10.0, 100.0, 100.0]);
        assert_eq!(u(16), 0xFF0000FF);
        assert_eq!([f(20), f(24), f(28), f(32)], [50.0, 50.0, 20.0, 20.0]);
        assert_eq!(u(36), 0xFF00FF00);
    }

    #[test]
    fn blend_changes_split_draws_and_keep_recording_order() {
        let (mut device, ctx, renderer) = setup();
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 800, 600));
        for blend in [BlendState::ALPHA, BlendState::OPAQUE, BlendState::ALPHA] {
            scene.begin_quads_solid(&renderer, blend);
            scene.quad_solid(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        }

        renderer.present(&mut device, ctx, &scene);
        let calls = device.backend().take_calls();
        assert_eq!(draws(&calls), vec![(4, 1), (4, 1), (4, 1)]);
        assert_eq!(
            calls.iter().filter(|c| matches!(c, GlCall::BlendFuncSeparate { .. })).count(),
            3
        );

        // Each draw reads its instances at that command's byte offset.
        let offsets: Vec<usize> = calls
            .iter()
            .filter_map(|c| match c {
                GlCall::VertexAttribPointer { location: 1, offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, vec![0, 20, 40]);
    }

    #[test]
    fn textured_batches_bind_their_texture_and_sampler() {
        let (mut device, ctx, renderer) = setup();
        let texture = device
            .create_texture(&TextureDesc {
                ty: TextureType::Texture2DArray,
                width: 4,
                height: 4,
                format: ImageFormat::Rgba8Unorm,
                initial_data: Some(ImageView {
                    format: ImageFormat::Rgba8Unorm,
                    width: 4,
                    height: 4,
                    layers: 1,
                    pixels: &[0xFF; 4 * 4 * 4],
                }),
            })
            .unwrap();
        device.backend().take_calls();

        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 640, 480));
        scene.begin_quads_textured(
            &renderer,
            BlendState::ALPHA,
            texture,
            renderer.default_sampler(),
        );
        scene.quad_textured(Rect::new(0.0, 0.0, 64.0, 64.0), Rect::UNIT, Color::WHITE, 0);

        renderer.present(&mut device, ctx, &scene);
        let calls = device.backend().take_calls();
        assert_eq!(draws(&calls), vec![(4, 1)]);
        assert!(calls.contains(&GlCall::ActiveTexture { unit: 0 }));
        assert!(calls.iter().any(|c| matches!(c, GlCall::BindTexture { .. })));
        assert!(calls.iter().any(|c| matches!(c, GlCall::BindSampler { unit: 0, .. })));
    }

    #[test]
    fn presenting_an_empty_scene_touches_nothing() {
        let (mut device, ctx, renderer) = setup();
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 800, 600));

        // No batches recorded: no constant upload, no viewport, no scissor.
        renderer.present(&mut device, ctx, &scene);
        assert_eq!(device.backend().take_calls(), vec![]);
    }

    #[test]
    fn empty_batches_are_not_drawn() {
        let (mut device, ctx, renderer) = setup();
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 100, 100));
        scene.begin_quads_solid(&renderer, BlendState::ALPHA);

        renderer.present(&mut device, ctx, &scene);
        assert!(draws(&device.backend().take_calls()).is_empty());
    }

    #[test]
    fn presenting_again_issues_no_redundant_state_changes() {
        let (mut device, ctx, renderer) = setup();
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 800, 600));
        scene.begin_quads_solid(&renderer, BlendState::ALPHA);
        scene.quad_solid(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);

        renderer.present(&mut device, ctx, &scene);
        device.backend().take_calls();

        renderer.present(&mut device, ctx, &scene);
        let calls = device.backend().take_calls();
        assert_eq!(draws(&calls), vec![(4, 1)]);
        // Only the data uploads repeat; every cached bind is skipped.
        assert!(!calls.iter().any(|c| matches!(
            c,
            GlCall::UseProgram { .. }
                | GlCall::BlendFuncSeparate { .. }
                | GlCall::VertexAttribPointer { .. }
                | GlCall::BindBufferRange { .. }
                | GlCall::Viewport { .. }
        )));
    }

    // ── immediate mode ──

    #[test]
    fn immediate_flushes_eagerly_on_state_change() {
        let (mut device, ctx, mut renderer) = setup();
        renderer.immediate_begin(&mut device, ctx, Rect2i::new(0, 0, 320, 240));
        renderer.immediate_quads_solid(&mut device, BlendState::ALPHA);
        renderer.immediate_quad_solid(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        renderer.immediate_quad_solid(Rect::new(10.0, 0.0, 10.0, 10.0), Color::WHITE);

        // Nothing reaches the GPU until the state changes.
        assert!(draws(&device.backend().take_calls()).is_empty());

        renderer.immediate_quads_solid(&mut device, BlendState::OPAQUE);
        assert_eq!(draws(&device.backend().take_calls()), vec![(4, 2)]);

        renderer.immediate_quad_solid(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        renderer.immediate_end(&mut device);
        assert_eq!(draws(&device.backend().take_calls()), vec![(4, 1)]);
    }

    #[test]
    fn immediate_compatible_batches_accumulate() {
        let (mut device, ctx, mut renderer) = setup();
        renderer.immediate_begin(&mut device, ctx, Rect2i::new(0, 0, 320, 240));
        renderer.immediate_quads_solid(&mut device, BlendState::ALPHA);
        renderer.immediate_quad_solid(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        // Re-opening an identical batch continues the pending command
        // instead of flushing it.
        renderer.immediate_quads_solid(&mut device, BlendState::ALPHA);
        renderer.immediate_quad_solid(Rect::new(10.0, 0.0, 10.0, 10.0), Color::WHITE);
        renderer.immediate_end(&mut device);

        assert_eq!(draws(&device.backend().take_calls()), vec![(4, 2)]);
    }

    #[test]
    #[should_panic(expected = "immediate pass already open")]
    fn nested_immediate_passes_panic() {
        let (mut device, ctx, mut renderer) = setup();
        renderer.immediate_begin(&mut device, ctx, Rect2i::new(0, 0, 100, 100));
        renderer.immediate_begin(&mut device, ctx, Rect2i::new(0, 0, 100, 100));
    }

    #[test]
    #[should_panic(expected = "outside an immediate pass")]
    fn immediate_batch_without_a_pass_panics() {
        let (mut device, _ctx, mut renderer) = setup();
        renderer.immediate_quads_solid(&mut device, BlendState::ALPHA);
    }
}
