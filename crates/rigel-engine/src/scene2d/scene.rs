use bytemuck::bytes_of;

use super::renderer::Renderer2d;
use super::shapes::{MeshKind, QuadSolidInstance, QuadTexturedInstance};
use crate::coords::{Color, Rect, Rect2i};
use crate::device::{BlendState, SamplerHandle, TechniqueHandle, TextureHandle};

/// Everything that must match for two draws to share one GPU command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct BatchState {
    pub mesh: MeshKind,
    pub technique: TechniqueHandle,
    pub blend: BlendState,
    pub texture: Option<(TextureHandle, SamplerHandle)>,
}

/// One instanced draw: a state plus a contiguous run of instances in the
/// scene's instance-data buffer.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Command {
    pub state: BatchState,
    /// Byte offset of the first instance, aligned for the instance type.
    pub data_offset: usize,
    pub instance_count: u32,
}

fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Opens a command for `state`, or continues the previous command when the
/// state is identical. Shared by the retained scene and the renderer's
/// immediate pass.
pub(crate) fn begin_batch(commands: &mut Vec<Command>, data: &mut Vec<u8>, state: BatchState) {
    if let Some(last) = commands.last() {
        if last.state == state {
            return;
        }
    }
    let data_offset = align_up(data.len(), state.mesh.instance_align());
    data.resize(data_offset, 0);
    commands.push(Command { state, data_offset, instance_count: 0 });
}

/// Appends one instance to the open command.
///
/// # Panics
/// Panics when no batch is open or the open batch draws another mesh kind.
pub(crate) fn push_instance(
    commands: &mut [Command],
    data: &mut Vec<u8>,
    mesh: MeshKind,
    instance: &[u8],
) {
    debug_assert_eq!(instance.len(), mesh.instance_size());
    let command = match commands.last_mut() {
        Some(command) => command,
        None => panic!("{} recorded before any batch was begun", mesh.label()),
    };
    assert!(
        command.state.mesh == mesh,
        "{} recorded into an open {} batch",
        mesh.label(),
        command.state.mesh.label()
    );
    data.extend_from_slice(instance);
    command.instance_count += 1;
}

/// A retained 2D scene.
///
/// Records batches of instanced quads into CPU-side command and instance
/// buffers; nothing touches the GPU until [`Renderer2d::present`]. A scene
/// can be rebuilt every frame or recorded once and presented many times,
/// to any context.
pub struct Scene2d {
    viewport: Rect2i,
    scissor: Option<Rect2i>,
    commands: Vec<Command>,
    instance_data: Vec<u8>,
}

impl Scene2d {
    pub fn new() -> Self {
        Self {
            viewport: Rect2i::default(),
            scissor: None,
            commands: Vec::new(),
            instance_data: Vec::new(),
        }
    }

    /// Discards all recorded content and sets the target viewport. The
    /// viewport defines the pixel coordinate space quads are placed in.
    pub fn reset(&mut self, viewport: Rect2i) {
        assert!(!viewport.is_empty(), "scene viewport must be non-empty");
        self.viewport = viewport;
        self.scissor = None;
        self.commands.clear();
        self.instance_data.clear();
    }

    /// Like [`reset`](Self::reset), additionally clipping the scene to the
    /// viewport rectangle at present time.
    pub fn reset_scissored(&mut self, viewport: Rect2i) {
        self.reset(viewport);
        self.scissor = Some(viewport);
    }

    pub fn viewport(&self) -> Rect2i {
        self.viewport
    }

    /// Scissor rectangle applied to the whole scene at present time.
    pub fn set_scissor(&mut self, scissor: Option<Rect2i>) {
        self.scissor = scissor;
    }

    pub fn scissor(&self) -> Option<Rect2i> {
        self.scissor
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Opens a solid-quad batch. Consecutive begins with the same blend
    /// state collapse into one draw.
    pub fn begin_quads_solid(&mut self, renderer: &Renderer2d, blend: BlendState) {
        begin_batch(
            &mut self.commands,
            &mut self.instance_data,
            BatchState {
                mesh: MeshKind::QuadSolid,
                technique: renderer.solid_technique(),
                blend,
                texture: None,
            },
        );
    }

    /// Opens a textured-quad batch sampling `texture` (an array texture)
    /// through `sampler`.
    pub fn begin_quads_textured(
        &mut self,
        renderer: &Renderer2d,
        blend: BlendState,
        texture: TextureHandle,
        sampler: SamplerHandle,
    ) {
        begin_batch(
            &mut self.commands,
            &mut self.instance_data,
            BatchState {
                mesh: MeshKind::QuadTextured,
                technique: renderer.textured_technique(),
                blend,
                texture: Some((texture, sampler)),
            },
        );
    }

    /// Records a solid quad into the open solid batch.
    pub fn quad_solid(&mut self, rect: Rect, color: Color) {
        let instance = QuadSolidInstance::new(rect, color);
        push_instance(
            &mut self.commands,
            &mut self.instance_data,
            MeshKind::QuadSolid,
            bytes_of(&instance),
        );
    }

    /// Records a textured quad into the open textured batch. `uv` selects
    /// the sampled subrectangle and `layer` the texture array layer.
    pub fn quad_textured(&mut self, rect: Rect, uv: Rect, color: Color, layer: u32) {
        let instance = QuadTexturedInstance::new(rect, uv, color, layer);
        push_instance(
            &mut self.commands,
            &mut self.instance_data,
            MeshKind::QuadTextured,
            bytes_of(&instance),
        );
    }

    pub(crate) fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn instance_data(&self) -> &[u8] {
        &self.instance_data
    }
}

impl Default for Scene2d {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_state(blend: BlendState) -> BatchState {
        BatchState {
            mesh: MeshKind::QuadSolid,
            technique: TechniqueHandle::from_index(0),
            blend,
            texture: None,
        }
    }

    fn textured_state() -> BatchState {
        BatchState {
            mesh: MeshKind::QuadTextured,
            technique: TechniqueHandle::from_index(1),
            blend: BlendState::ALPHA,
            texture: None,
        }
    }

    fn push_solid(commands: &mut [Command], data: &mut Vec<u8>) {
        let instance = QuadSolidInstance::new(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        push_instance(commands, data, MeshKind::QuadSolid, bytes_of(&instance));
    }

    // ── command merging ──

    #[test]
    fn identical_consecutive_batches_merge() {
        let mut commands = Vec::new();
        let mut data = Vec::new();

        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        push_solid(&mut commands, &mut data);
        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        push_solid(&mut commands, &mut data);

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].instance_count, 2);
        assert_eq!(data.len(), 2 * MeshKind::QuadSolid.instance_size());
    }

    #[test]
    fn blend_change_splits_the_batch() {
        let mut commands = Vec::new();
        let mut data = Vec::new();

        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        push_solid(&mut commands, &mut data);
        begin_batch(&mut commands, &mut data, solid_state(BlendState::OPAQUE));
        push_solid(&mut commands, &mut data);
        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        push_solid(&mut commands, &mut data);

        assert_eq!(commands.len(), 3);
        assert!(commands.iter().all(|c| c.instance_count == 1));
        // Commands keep recording order; each starts where the previous
        // instance run ended.
        assert_eq!(commands[0].data_offset, 0);
        assert_eq!(commands[1].data_offset, 20);
        assert_eq!(commands[2].data_offset, 40);
    }

    #[test]
    fn new_commands_start_aligned_for_their_instance_type() {
        let mut commands = Vec::new();
        let mut data = Vec::new();

        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        push_solid(&mut commands, &mut data);
        begin_batch(&mut commands, &mut data, textured_state());

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].data_offset % MeshKind::QuadTextured.instance_align(), 0);
        assert_eq!(data.len(), commands[1].data_offset);
    }

    #[test]
    fn empty_batches_record_zero_instances() {
        let mut commands = Vec::new();
        let mut data = Vec::new();
        begin_batch(&mut commands, &mut data, solid_state(BlendState::ALPHA));
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].instance_count, 0);
        assert!(data.is_empty());
    }

    // ── contract violations ──

    #[test]
    #[should_panic(expected = "before any batch")]
    fn pushing_without_a_batch_panics() {
        let mut commands = Vec::new();
        let mut data = Vec::new();
        push_solid(&mut commands, &mut data);
    }

    #[test]
    #[should_panic(expected = "solid quad recorded into an open textured quad batch")]
    fn pushing_the_wrong_mesh_kind_panics() {
        let mut commands = Vec::new();
        let mut data = Vec::new();
        begin_batch(&mut commands, &mut data, textured_state());
        push_solid(&mut commands, &mut data);
    }

    // ── scene ──

    #[test]
    fn reset_discards_content_and_scissor() {
        let mut scene = Scene2d::new();
        scene.reset(Rect2i::new(0, 0, 100, 100));
        scene.set_scissor(Some(Rect2i::new(0, 0, 10, 10)));
        begin_batch(
            &mut scene.commands,
            &mut scene.instance_data,
            solid_state(BlendState::ALPHA),
        );
        push_solid(&mut scene.commands, &mut scene.instance_data);
        assert!(!scene.is_empty());

        scene.reset(Rect2i::new(0, 0, 200, 200));
        assert!(scene.is_empty());
        assert_eq!(scene.scissor(), None);
        assert_eq!(scene.viewport(), Rect2i::new(0, 0, 200, 200));
    }

    #[test]
    #[should_panic(expected = "viewport must be non-empty")]
    fn reset_with_empty_viewport_panics() {
        Scene2d::new().reset(Rect2i::new(0, 0, 0, 100));
    }
}
