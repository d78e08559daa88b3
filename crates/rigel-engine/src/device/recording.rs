//! Instrumented [`GlApi`] backend for tests.
//!
//! Needs no GPU. Hands out sequential object names, keeps CPU-side copies
//! of buffer contents so uploads can be asserted byte-for-byte, and records
//! every state-changing call. Redundant-bind tests drain the call log and
//! assert it stays empty on a repeat.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::gl::GlApi;

/// One recorded state-changing GL call.
///
/// Object creation, deletion, and pure queries are not recorded; the tests
/// care about traffic that would reach the driver per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    BindVertexArray { vao: u32 },
    BindBuffer { target: u32, buffer: u32 },
    BufferData { target: u32, size: usize, usage: u32 },
    BufferDataSize { target: u32, size: usize, usage: u32 },
    BufferSubData { target: u32, offset: usize, size: usize },
    BindBufferRange { target: u32, binding: u32, buffer: u32, offset: usize, size: usize },
    UseProgram { program: u32 },
    UniformBlockBinding { program: u32, block_index: u32, binding: u32 },
    Uniform1I { location: u32, value: i32 },
    EnableVertexAttribArray { location: u32 },
    DisableVertexAttribArray { location: u32 },
    VertexAttribPointer {
        location: u32,
        dimension: i32,
        ty: u32,
        normalized: bool,
        integer: bool,
        stride: i32,
        offset: usize,
    },
    VertexAttribDivisor { location: u32, divisor: u32 },
    ActiveTexture { unit: u32 },
    BindTexture { target: u32, texture: u32 },
    TexImage2D { target: u32, level: i32, width: i32, height: i32 },
    TexImage3D { target: u32, level: i32, width: i32, height: i32, depth: i32 },
    BindSampler { unit: u32, sampler: u32 },
    SamplerParameter { sampler: u32, parameter: u32, value: i32 },
    Enable { cap: u32 },
    Disable { cap: u32 },
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    Scissor { x: i32, y: i32, width: i32, height: i32 },
    BlendEquationSeparate { rgb_op: u32, alpha_op: u32 },
    BlendFuncSeparate { src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32 },
    ClearColor { r: f32, g: f32, b: f32, a: f32 },
    ClearDepth { depth: f32 },
    ClearStencil { stencil: i32 },
    Clear { mask: u32 },
    DrawArraysInstanced { mode: u32, first: i32, count: i32, instances: i32 },
    DrawElementsInstancedBaseVertex {
        mode: u32,
        count: i32,
        index_type: u32,
        offset: usize,
        instances: i32,
        base_vertex: i32,
    },
}

#[derive(Default)]
struct Inner {
    calls: Vec<GlCall>,
    next_name: u32,
    /// Buffer name bound to each generic target.
    bound: HashMap<u32, u32>,
    /// CPU mirror of buffer storage. Freshly (re)specified bytes that were
    /// never written are modeled as zero.
    buffers: HashMap<u32, Vec<u8>>,
    /// Shader name to shader kind, for simulated compile failures.
    shaders: HashMap<u32, u32>,
    failing_stages: HashSet<u32>,
    fail_link: bool,
    /// Uniform and block names the fake linker "eliminated".
    unknown_uniforms: HashSet<String>,
    /// Known uniform names; index in this list is the location/block index.
    uniform_names: Vec<String>,
}

/// The fake GL context. Interior mutability because [`GlApi`] takes `&self`.
#[derive(Default)]
pub struct RecordingGl {
    inner: RefCell<Inner>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every shader of the given GL kind fail to compile.
    pub fn fail_compile(&self, shader_kind: u32) {
        self.inner.borrow_mut().failing_stages.insert(shader_kind);
    }

    /// Makes every program link fail.
    pub fn fail_link(&self) {
        self.inner.borrow_mut().fail_link = true;
    }

    /// Marks a uniform or uniform-block name as absent from linked programs.
    pub fn mark_uniform_unknown(&self, name: &str) {
        self.inner.borrow_mut().unknown_uniforms.insert(name.to_owned());
    }

    /// Drains and returns the call log.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut self.inner.borrow_mut().calls)
    }

    /// Current CPU mirror of a buffer's bytes.
    pub fn buffer_bytes(&self, buffer: u32) -> Vec<u8> {
        self.inner
            .borrow()
            .buffers
            .get(&buffer)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: GlCall) {
        self.inner.borrow_mut().calls.push(call);
    }

    fn alloc_name(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_name += 1;
        inner.next_name
    }

    fn bound_buffer(&self, target: u32) -> u32 {
        match self.inner.borrow().bound.get(&target) {
            Some(&name) if name != 0 => name,
            _ => panic!("no buffer bound to target {target:#x}"),
        }
    }

    fn uniform_index(&self, name: &str) -> Option<u32> {
        let mut inner = self.inner.borrow_mut();
        if inner.unknown_uniforms.contains(name) {
            return None;
        }
        let index = match inner.uniform_names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                inner.uniform_names.push(name.to_owned());
                inner.uniform_names.len() - 1
            }
        };
        Some(index as u32)
    }
}

impl GlApi for RecordingGl {
    fn create_buffer(&self) -> u32 {
        let name = self.alloc_name();
        self.inner.borrow_mut().buffers.insert(name, Vec::new());
        name
    }

    fn delete_buffer(&self, buffer: u32) {
        self.inner.borrow_mut().buffers.remove(&buffer);
    }

    fn create_texture(&self) -> u32 {
        self.alloc_name()
    }

    fn delete_texture(&self, _texture: u32) {}

    fn create_sampler(&self) -> u32 {
        self.alloc_name()
    }

    fn delete_sampler(&self, _sampler: u32) {}

    fn create_vertex_array(&self) -> u32 {
        self.alloc_name()
    }

    fn delete_vertex_array(&self, _vao: u32) {}

    fn bind_vertex_array(&self, vao: u32) {
        self.record(GlCall::BindVertexArray { vao });
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        self.inner.borrow_mut().bound.insert(target, buffer);
        self.record(GlCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        let name = self.bound_buffer(target);
        self.inner.borrow_mut().buffers.insert(name, data.to_vec());
        self.record(GlCall::BufferData { target, size: data.len(), usage });
    }

    fn buffer_data_size(&self, target: u32, size: usize, usage: u32) {
        let name = self.bound_buffer(target);
        self.inner.borrow_mut().buffers.insert(name, vec![0; size]);
        self.record(GlCall::BufferDataSize { target, size, usage });
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        let name = self.bound_buffer(target);
        {
            let mut inner = self.inner.borrow_mut();
            let storage = inner.buffers.entry(name).or_default();
            assert!(
                offset + data.len() <= storage.len(),
                "sub-upload past the end of buffer storage ({} > {})",
                offset + data.len(),
                storage.len()
            );
            storage[offset..offset + data.len()].copy_from_slice(data);
        }
        self.record(GlCall::BufferSubData { target, offset, size: data.len() });
    }

    fn bind_buffer_range(&self, target: u32, binding: u32, buffer: u32, offset: usize, size: usize) {
        self.record(GlCall::BindBufferRange { target, binding, buffer, offset, size });
    }

    fn create_shader(&self, kind: u32) -> u32 {
        let name = self.alloc_name();
        self.inner.borrow_mut().shaders.insert(name, kind);
        name
    }

    fn shader_source(&self, _shader: u32, _source: &str) {}

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_ok(&self, shader: u32) -> bool {
        let inner = self.inner.borrow();
        match inner.shaders.get(&shader) {
            Some(kind) => !inner.failing_stages.contains(kind),
            None => panic!("unknown shader name {shader}"),
        }
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "simulated shader failure".to_owned()
    }

    fn delete_shader(&self, shader: u32) {
        self.inner.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> u32 {
        self.alloc_name()
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, _program: u32) {}

    fn program_link_ok(&self, _program: u32) -> bool {
        !self.inner.borrow().fail_link
    }

    fn program_info_log(&self, _program: u32) -> String {
        "simulated link failure".to_owned()
    }

    fn delete_program(&self, _program: u32) {}

    fn use_program(&self, program: u32) {
        self.record(GlCall::UseProgram { program });
    }

    fn uniform_block_index(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniform_index(name)
    }

    fn uniform_block_binding(&self, program: u32, block_index: u32, binding: u32) {
        self.record(GlCall::UniformBlockBinding { program, block_index, binding });
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniform_index(name)
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        self.record(GlCall::Uniform1I { location, value });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray { location });
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        self.record(GlCall::DisableVertexAttribArray { location });
    }

    fn vertex_attrib_pointer(
        &self,
        location: u32,
        dimension: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        self.record(GlCall::VertexAttribPointer {
            location,
            dimension,
            ty,
            normalized,
            integer: false,
            stride,
            offset,
        });
    }

    fn vertex_attrib_pointer_int(
        &self,
        location: u32,
        dimension: i32,
        ty: u32,
        stride: i32,
        offset: usize,
    ) {
        self.record(GlCall::VertexAttribPointer {
            location,
            dimension,
            ty,
            normalized: false,
            integer: true,
            stride,
            offset,
        });
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        self.record(GlCall::VertexAttribDivisor { location, divisor });
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(GlCall::ActiveTexture { unit });
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        self.record(GlCall::BindTexture { target, texture });
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        _internal_format: i32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        _pixels: Option<&[u8]>,
    ) {
        self.record(GlCall::TexImage2D { target, level, width, height });
    }

    fn tex_image_3d(
        &self,
        target: u32,
        level: i32,
        _internal_format: i32,
        width: i32,
        height: i32,
        depth: i32,
        _format: u32,
        _ty: u32,
        _pixels: Option<&[u8]>,
    ) {
        self.record(GlCall::TexImage3D { target, level, width, height, depth });
    }

    fn bind_sampler(&self, unit: u32, sampler: u32) {
        self.record(GlCall::BindSampler { unit, sampler });
    }

    fn sampler_parameter_i32(&self, sampler: u32, parameter: u32, value: i32) {
        self.record(GlCall::SamplerParameter { sampler, parameter, value });
    }

    fn enable(&self, cap: u32) {
        self.record(GlCall::Enable { cap });
    }

    fn disable(&self, cap: u32) {
        self.record(GlCall::Disable { cap });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport { x, y, width, height });
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Scissor { x, y, width, height });
    }

    fn blend_equation_separate(&self, rgb_op: u32, alpha_op: u32) {
        self.record(GlCall::BlendEquationSeparate { rgb_op, alpha_op });
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(GlCall::BlendFuncSeparate { src_rgb, dst_rgb, src_alpha, dst_alpha });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor { r, g, b, a });
    }

    fn clear_depth(&self, depth: f32) {
        self.record(GlCall::ClearDepth { depth });
    }

    fn clear_stencil(&self, stencil: i32) {
        self.record(GlCall::ClearStencil { stencil });
    }

    fn clear(&self, mask: u32) {
        self.record(GlCall::Clear { mask });
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32) {
        self.record(GlCall::DrawArraysInstanced { mode, first, count, instances });
    }

    fn draw_elements_instanced_base_vertex(
        &self,
        mode: u32,
        count: i32,
        index_type: u32,
        offset: usize,
        instances: i32,
        base_vertex: i32,
    ) {
        self.record(GlCall::DrawElementsInstancedBaseVertex {
            mode,
            count,
            index_type,
            offset,
            instances,
            base_vertex,
        });
    }
}
