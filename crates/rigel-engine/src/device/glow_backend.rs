//! Production [`GlApi`] backend over [`glow`].
//!
//! Raw `u32` names from the device side are reconstructed into glow's
//! `NonZeroU32` newtypes here; `0` round-trips to `None`.

use std::num::NonZeroU32;

use glow::HasContext;

use super::gl::GlApi;

/// A live GL context wrapped for the device.
pub struct GlowGl {
    ctx: glow::Context,
}

impl GlowGl {
    /// Wraps a loaded glow context. The caller is responsible for having
    /// made a compatible GL context current while loading function pointers.
    pub fn new(ctx: glow::Context) -> Self {
        Self { ctx }
    }

    /// Access to the underlying context for embedder interop.
    pub fn raw(&self) -> &glow::Context {
        &self.ctx
    }
}

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn sampler(name: u32) -> Option<glow::NativeSampler> {
    NonZeroU32::new(name).map(glow::NativeSampler)
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn shader(name: u32) -> glow::NativeShader {
    match NonZeroU32::new(name) {
        Some(raw) => glow::NativeShader(raw),
        None => panic!("null shader name passed to GL backend"),
    }
}

fn program(name: u32) -> glow::NativeProgram {
    match NonZeroU32::new(name) {
        Some(raw) => glow::NativeProgram(raw),
        None => panic!("null program name passed to GL backend"),
    }
}

/// GL buffer offsets and sizes are signed 32-bit.
fn gl_len(value: usize) -> i32 {
    match i32::try_from(value) {
        Ok(len) => len,
        Err(_) => panic!("GL size or offset {value} exceeds i32::MAX"),
    }
}

impl GlApi for GlowGl {
    fn create_buffer(&self) -> u32 {
        match unsafe { self.ctx.create_buffer() } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glCreateBuffers failed: {message}");
                0
            }
        }
    }

    fn delete_buffer(&self, name: u32) {
        if let Some(raw) = buffer(name) {
            unsafe { self.ctx.delete_buffer(raw) };
        }
    }

    fn create_texture(&self) -> u32 {
        match unsafe { self.ctx.create_texture() } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glGenTextures failed: {message}");
                0
            }
        }
    }

    fn delete_texture(&self, name: u32) {
        if let Some(raw) = texture(name) {
            unsafe { self.ctx.delete_texture(raw) };
        }
    }

    fn create_sampler(&self) -> u32 {
        match unsafe { self.ctx.create_sampler() } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glGenSamplers failed: {message}");
                0
            }
        }
    }

    fn delete_sampler(&self, name: u32) {
        if let Some(raw) = sampler(name) {
            unsafe { self.ctx.delete_sampler(raw) };
        }
    }

    fn create_vertex_array(&self) -> u32 {
        match unsafe { self.ctx.create_vertex_array() } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glGenVertexArrays failed: {message}");
                0
            }
        }
    }

    fn delete_vertex_array(&self, name: u32) {
        if let Some(raw) = vertex_array(name) {
            unsafe { self.ctx.delete_vertex_array(raw) };
        }
    }

    fn bind_vertex_array(&self, name: u32) {
        unsafe { self.ctx.bind_vertex_array(vertex_array(name)) };
    }

    fn bind_buffer(&self, target: u32, name: u32) {
        unsafe { self.ctx.bind_buffer(target, buffer(name)) };
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.ctx.buffer_data_u8_slice(target, data, usage) };
    }

    fn buffer_data_size(&self, target: u32, size: usize, usage: u32) {
        unsafe { self.ctx.buffer_data_size(target, gl_len(size), usage) };
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        unsafe { self.ctx.buffer_sub_data_u8_slice(target, gl_len(offset), data) };
    }

    fn bind_buffer_range(&self, target: u32, binding: u32, name: u32, offset: usize, size: usize) {
        unsafe {
            self.ctx
                .bind_buffer_range(target, binding, buffer(name), gl_len(offset), gl_len(size))
        };
    }

    fn create_shader(&self, kind: u32) -> u32 {
        match unsafe { self.ctx.create_shader(kind) } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glCreateShader failed: {message}");
                0
            }
        }
    }

    fn shader_source(&self, name: u32, source: &str) {
        unsafe { self.ctx.shader_source(shader(name), source) };
    }

    fn compile_shader(&self, name: u32) {
        unsafe { self.ctx.compile_shader(shader(name)) };
    }

    fn shader_compile_ok(&self, name: u32) -> bool {
        unsafe { self.ctx.get_shader_compile_status(shader(name)) }
    }

    fn shader_info_log(&self, name: u32) -> String {
        unsafe { self.ctx.get_shader_info_log(shader(name)) }
    }

    fn delete_shader(&self, name: u32) {
        unsafe { self.ctx.delete_shader(shader(name)) };
    }

    fn create_program(&self) -> u32 {
        match unsafe { self.ctx.create_program() } {
            Ok(name) => name.0.get(),
            Err(message) => {
                log::error!("glCreateProgram failed: {message}");
                0
            }
        }
    }

    fn attach_shader(&self, program_name: u32, shader_name: u32) {
        unsafe { self.ctx.attach_shader(program(program_name), shader(shader_name)) };
    }

    fn link_program(&self, name: u32) {
        unsafe { self.ctx.link_program(program(name)) };
    }

    fn program_link_ok(&self, name: u32) -> bool {
        unsafe { self.ctx.get_program_link_status(program(name)) }
    }

    fn program_info_log(&self, name: u32) -> String {
        unsafe { self.ctx.get_program_info_log(program(name)) }
    }

    fn delete_program(&self, name: u32) {
        unsafe { self.ctx.delete_program(program(name)) };
    }

    fn use_program(&self, name: u32) {
        let raw = NonZeroU32::new(name).map(glow::NativeProgram);
        unsafe { self.ctx.use_program(raw) };
    }

    fn uniform_block_index(&self, name: u32, block_name: &str) -> Option<u32> {
        unsafe { self.ctx.get_uniform_block_index(program(name), block_name) }
    }

    fn uniform_block_binding(&self, name: u32, block_index: u32, binding: u32) {
        unsafe { self.ctx.uniform_block_binding(program(name), block_index, binding) };
    }

    fn uniform_location(&self, name: u32, uniform_name: &str) -> Option<u32> {
        unsafe { self.ctx.get_uniform_location(program(name), uniform_name) }.map(|loc| loc.0)
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        unsafe {
            self.ctx
                .uniform_1_i32(Some(&glow::NativeUniformLocation(location)), value)
        };
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.ctx.enable_vertex_attrib_array(location) };
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.ctx.disable_vertex_attrib_array(location) };
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
        unsafe {
            self.ctx
                .vertex_attrib_pointer_f32(location, dimension, ty, normalized, stride, gl_len(offset))
        };
    }

    fn vertex_attrib_pointer_int(
        &self,
        location: u32,
        dimension: i32,
        ty: u32,
        stride: i32,
        offset: usize,
    ) {
        unsafe {
            self.ctx
                .vertex_attrib_pointer_i32(location, dimension, ty, stride, gl_len(offset))
        };
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        unsafe { self.ctx.vertex_attrib_divisor(location, divisor) };
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.ctx.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&self, target: u32, name: u32) {
        unsafe { self.ctx.bind_texture(target, texture(name)) };
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.ctx.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                glow::PixelUnpackData::Slice(pixels),
            )
        };
    }

    fn tex_image_3d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.ctx.tex_image_3d(
                target,
                level,
                internal_format,
                width,
                height,
                depth,
                0,
                format,
                ty,
                glow::PixelUnpackData::Slice(pixels),
            )
        };
    }

    fn bind_sampler(&self, unit: u32, name: u32) {
        unsafe { self.ctx.bind_sampler(unit, sampler(name)) };
    }

    fn sampler_parameter_i32(&self, name: u32, parameter: u32, value: i32) {
        match sampler(name) {
            Some(raw) => unsafe { self.ctx.sampler_parameter_i32(raw, parameter, value) },
            None => panic!("null sampler name passed to GL backend"),
        }
    }

    fn enable(&self, cap: u32) {
        unsafe { self.ctx.enable(cap) };
    }

    fn disable(&self, cap: u32) {
        unsafe { self.ctx.disable(cap) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.ctx.viewport(x, y, width, height) };
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.ctx.scissor(x, y, width, height) };
    }

    fn blend_equation_separate(&self, rgb_op: u32, alpha_op: u32) {
        unsafe { self.ctx.blend_equation_separate(rgb_op, alpha_op) };
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe {
            self.ctx
                .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.ctx.clear_color(r, g, b, a) };
    }

    fn clear_depth(&self, depth: f32) {
        unsafe { self.ctx.clear_depth_f32(depth) };
    }

    fn clear_stencil(&self, stencil: i32) {
        unsafe { self.ctx.clear_stencil(stencil) };
    }

    fn clear(&self, mask: u32) {
        unsafe { self.ctx.clear(mask) };
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32) {
        unsafe { self.ctx.draw_arrays_instanced(mode, first, count, instances) };
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
        unsafe {
            self.ctx.draw_elements_instanced_base_vertex(
                mode,
                count,
                index_type,
                gl_len(offset),
                instances,
                base_vertex,
            )
        };
    }
}
