//! Narrow GL backend seam.
//!
//! The device talks to OpenGL exclusively through this trait, using raw GL
//! object names (`u32`, with `0` meaning null/failure) and raw GL enum
//! values. Production code uses [`super::GlowGl`]; tests use
//! [`super::RecordingGl`], which needs no GPU and records every call.
//!
//! Methods take `&self`: GL is itself a big mutable singleton behind the
//! current context, so threading `&mut` through would only be ceremony.
/// One GL function per method, same argument order as the C API.
pub trait GlApi {
    // ── object lifetime ──
    /// Returns `0` if the driver refuses the allocation.
    fn create_buffer(&self) -> u32;
    fn delete_buffer(&self, buffer: u32);
    fn create_texture(&self) -> u32;
    fn delete_texture(&self, texture: u32);
    fn create_sampler(&self) -> u32;
    fn delete_sampler(&self, sampler: u32);
    fn create_vertex_array(&self) -> u32;
    fn delete_vertex_array(&self, vao: u32);
    fn bind_vertex_array(&self, vao: u32);

    // ── buffers ──
    fn bind_buffer(&self, target: u32, buffer: u32);
    /// Respecifies the buffer's full storage from `data`.
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    /// Respecifies the buffer's storage with undefined contents.
    fn buffer_data_size(&self, target: u32, size: usize, usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]);
    fn bind_buffer_range(&self, target: u32, binding: u32, buffer: u32, offset: usize, size: usize);

    // ── shaders and programs ──
    fn create_shader(&self, kind: u32) -> u32;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_ok(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);
    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_ok(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);
    fn uniform_block_index(&self, program: u32, name: &str) -> Option<u32>;
    fn uniform_block_binding(&self, program: u32, block_index: u32, binding: u32);
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;
    /// Writes an `int` uniform of the currently bound program.
    fn uniform_1_i32(&self, location: u32, value: i32);

    // ── vertex attributes ──
    fn enable_vertex_attrib_array(&self, location: u32);
    fn disable_vertex_attrib_array(&self, location: u32);
    fn vertex_attrib_pointer(
        &self,
        location: u32,
        dimension: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    /// Integer-attribute variant (`glVertexAttribIPointer`).
    fn vertex_attrib_pointer_int(
        &self,
        location: u32,
        dimension: i32,
        ty: u32,
        stride: i32,
        offset: usize,
    );
    fn vertex_attrib_divisor(&self, location: u32, divisor: u32);

    // ── textures and samplers ──
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    #[allow(clippy::too_many_arguments)]
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
    );
    /// Layered-target variant (`glTexImage3D`) for array textures.
    #[allow(clippy::too_many_arguments)]
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
    );
    fn bind_sampler(&self, unit: u32, sampler: u32);
    fn sampler_parameter_i32(&self, sampler: u32, parameter: u32, value: i32);

    // ── raster state ──
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    fn blend_equation_separate(&self, rgb_op: u32, alpha_op: u32);
    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);

    // ── clears and draws ──
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_depth(&self, depth: f32);
    fn clear_stencil(&self, stencil: i32);
    fn clear(&self, mask: u32);
    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instances: i32);
    #[allow(clippy::too_many_arguments)]
    fn draw_elements_instanced_base_vertex(
        &self,
        mode: u32,
        count: i32,
        index_type: u32,
        offset: usize,
        instances: i32,
        base_vertex: i32,
    );
}
