use super::error::{DeviceError, TechniqueError};
use super::gl::GlApi;
use super::layout::VertexLayout;
use super::state::{StateCache, MAX_CONSTANT_BUFFER_SLOTS, MAX_TEXTURE_UNITS};
use super::translate;
use super::types::{
    BlendState, BufferDesc, BufferHandle, BufferType, BufferUsage, BufferView, ClearOps,
    ContextHandle, ImageView, IndexBufferView, Pool, PrimitiveType, SamplerDesc, SamplerHandle,
    TechniqueDesc, TechniqueHandle, TextureDesc, TextureHandle, TextureType, VertexLayoutDesc,
    VertexLayoutHandle,
};
use crate::coords::Rect2i;

/// Platform GL context plumbing supplied by the embedder.
///
/// The device drives one shared context for resource work plus one context
/// per window. How contexts are created (EGL, WGL, GLX) is the embedder's
/// business; the device only needs to switch and present them.
pub trait GraphicsContext {
    /// Makes this context current on the calling thread.
    fn make_current(&mut self);
    /// Presents the back buffer. A no-op for offscreen contexts.
    fn swap_buffers(&mut self);
}

/// No-op [`GraphicsContext`] for tests and offscreen use.
pub struct HeadlessContext;

impl GraphicsContext for HeadlessContext {
    fn make_current(&mut self) {}
    fn swap_buffers(&mut self) {}
}

/// Which context the device last made current.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CurrentSlot {
    Shared,
    Window(usize),
}

#[derive(Debug)]
struct Buffer {
    gl_name: u32,
    ty: BufferType,
    usage: BufferUsage,
    /// Current GPU storage size; grows monotonically through updates.
    size: usize,
}

#[derive(Debug)]
struct Texture {
    gl_name: u32,
    ty: TextureType,
}

#[derive(Debug)]
struct Sampler {
    gl_name: u32,
}

#[derive(Debug, Copy, Clone)]
struct Technique {
    layout: VertexLayoutHandle,
    program: u32,
    num_constant_buffers: u32,
    num_samplers: u32,
}

struct WindowContext {
    platform: Box<dyn GraphicsContext>,
    state: StateCache,
    /// Core-profile GL requires a bound vertex array to draw; each context
    /// owns one that stays bound for its whole life.
    vao: u32,
}

/// The GPU device.
///
/// Owns every GPU resource, the shared resource context, and one state
/// cache per window context. Resource operations (create/update/destroy)
/// run on the shared context; frame operations (set/clear/draw) take the
/// [`ContextHandle`] they target and switch contexts only when needed.
///
/// Single-threaded by design: the device is not `Sync`, and the embedder
/// must call it from the thread that owns the GL contexts.
pub struct Device<G: GlApi> {
    gl: G,
    shared: Box<dyn GraphicsContext>,
    current: CurrentSlot,
    /// Append-only; handles are 1-based indices into this registry.
    techniques: Vec<Technique>,
    layouts: Pool<VertexLayout>,
    buffers: Pool<Buffer>,
    textures: Pool<Texture>,
    samplers: Pool<Sampler>,
    contexts: Pool<WindowContext>,
}

/// GL draw parameters are signed 32-bit.
fn gl_count(value: u32) -> i32 {
    match i32::try_from(value) {
        Ok(count) => count,
        Err(_) => panic!("draw parameter {value} exceeds i32::MAX"),
    }
}

fn gl_extent(value: u32) -> i32 {
    match i32::try_from(value) {
        Ok(extent) => extent,
        Err(_) => panic!("image extent {value} exceeds i32::MAX"),
    }
}

/// Binds `buffer` to its generic target unless the cache says it already is.
fn bind_buffer_cached<G: GlApi>(gl: &G, cache: &mut StateCache, buffer: &Buffer) {
    let slot = buffer.ty as usize;
    if cache.bound_buffers[slot] != buffer.gl_name {
        cache.bound_buffers[slot] = buffer.gl_name;
        gl.bind_buffer(translate::buffer_target(buffer.ty), buffer.gl_name);
    }
}

fn compile_stage<G: GlApi>(gl: &G, kind: u32, source: &str) -> Result<u32, String> {
    let shader = gl.create_shader(kind);
    if shader == 0 {
        return Err("driver refused to create a shader object".to_owned());
    }
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_ok(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(log);
    }
    Ok(shader)
}

impl<G: GlApi> Device<G> {
    /// Wraps a GL backend and the shared resource context.
    pub fn new(gl: G, mut shared: Box<dyn GraphicsContext>) -> Self {
        shared.make_current();
        log::debug!("graphics device initialized");
        Self {
            gl,
            shared,
            current: CurrentSlot::Shared,
            techniques: Vec::new(),
            layouts: Pool::new(),
            buffers: Pool::new(),
            textures: Pool::new(),
            samplers: Pool::new(),
            contexts: Pool::new(),
        }
    }

    fn make_shared_current(&mut self) {
        if self.current != CurrentSlot::Shared {
            self.shared.make_current();
            self.current = CurrentSlot::Shared;
        }
    }

    fn make_window_current(&mut self, ctx: ContextHandle) {
        if self.current != CurrentSlot::Window(ctx.0) {
            self.contexts.get_mut(ctx.0).platform.make_current();
            self.current = CurrentSlot::Window(ctx.0);
        }
    }

    fn technique_info(&self, handle: TechniqueHandle) -> Technique {
        match self.techniques.get(handle.index()) {
            Some(technique) => *technique,
            None => panic!("invalid technique handle (index {})", handle.index()),
        }
    }

    // ── contexts ──

    /// Registers a window context with the device.
    ///
    /// The context gets its own state cache and default vertex array, and
    /// becomes the current context.
    pub fn create_context(
        &mut self,
        mut platform: Box<dyn GraphicsContext>,
    ) -> Result<ContextHandle, DeviceError> {
        platform.make_current();
        let vao = self.gl.create_vertex_array();
        if vao == 0 {
            return Err(DeviceError::ContextCreation(
                "could not create the context's default vertex array".to_owned(),
            ));
        }
        self.gl.bind_vertex_array(vao);
        // Blending stays enabled; the blend equation decides whether it
        // has any visible effect.
        self.gl.enable(glow::BLEND);
        let slot = self.contexts.insert(WindowContext {
            platform,
            state: StateCache::new(),
            vao,
        });
        self.current = CurrentSlot::Window(slot);
        log::debug!("window context {slot} registered");
        Ok(ContextHandle(slot))
    }

    pub fn destroy_context(&mut self, ctx: ContextHandle) {
        self.make_window_current(ctx);
        let context = self.contexts.remove(ctx.0);
        self.gl.delete_vertex_array(context.vao);
        drop(context);
        self.current = CurrentSlot::Shared;
        self.shared.make_current();
        log::debug!("window context {} destroyed", ctx.0);
    }

    /// Presents the context's back buffer.
    pub fn swap_buffers(&mut self, ctx: ContextHandle) {
        self.contexts.get_mut(ctx.0).platform.swap_buffers();
    }

    // ── resources ──

    /// Resolves and stores a vertex layout. See [`VertexLayout::build`] for
    /// the validation rules.
    pub fn create_vertex_layout(&mut self, desc: &VertexLayoutDesc) -> VertexLayoutHandle {
        VertexLayoutHandle(self.layouts.insert(VertexLayout::build(desc)))
    }

    pub fn destroy_vertex_layout(&mut self, handle: VertexLayoutHandle) {
        self.layouts.remove(handle.0);
    }

    pub fn vertex_layout(&self, handle: VertexLayoutHandle) -> &VertexLayout {
        self.layouts.get(handle.0)
    }

    /// Compiles and links a technique, resolving its constant-buffer and
    /// sampler names to sequential binding slots.
    pub fn create_technique(
        &mut self,
        desc: &TechniqueDesc,
    ) -> Result<TechniqueHandle, TechniqueError> {
        self.make_shared_current();
        let layout = desc.layout;
        let _ = self.layouts.get(layout.0);
        let gl = &self.gl;

        let vertex = compile_stage(gl, glow::VERTEX_SHADER, desc.vertex_src)
            .map_err(TechniqueError::InvalidVertexShader)?;
        let geometry = match desc.geometry_src {
            Some(source) => match compile_stage(gl, glow::GEOMETRY_SHADER, source) {
                Ok(shader) => Some(shader),
                Err(log) => {
                    gl.delete_shader(vertex);
                    return Err(TechniqueError::InvalidGeometryShader(log));
                }
            },
            None => None,
        };
        let fragment = match compile_stage(gl, glow::FRAGMENT_SHADER, desc.fragment_src) {
            Ok(shader) => shader,
            Err(log) => {
                gl.delete_shader(vertex);
                if let Some(shader) = geometry {
                    gl.delete_shader(shader);
                }
                return Err(TechniqueError::InvalidFragmentShader(log));
            }
        };

        let program = gl.create_program();
        if program == 0 {
            gl.delete_shader(vertex);
            if let Some(shader) = geometry {
                gl.delete_shader(shader);
            }
            gl.delete_shader(fragment);
            return Err(TechniqueError::LinkFailed(
                "driver refused to create a program object".to_owned(),
            ));
        }
        gl.attach_shader(program, vertex);
        if let Some(shader) = geometry {
            gl.attach_shader(program, shader);
        }
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        // The program keeps the stages alive; the shader objects can go.
        gl.delete_shader(vertex);
        if let Some(shader) = geometry {
            gl.delete_shader(shader);
        }
        gl.delete_shader(fragment);

        if !gl.program_link_ok(program) {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            return Err(TechniqueError::LinkFailed(log));
        }

        gl.use_program(program);

        // Names resolve to the slot equal to their list position. A name
        // the linker eliminated still consumes its slot, so numbering
        // stays stable across shader edits.
        let mut num_constant_buffers = 0u32;
        for name in desc.constant_buffers {
            match gl.uniform_block_index(program, name) {
                Some(block_index) => {
                    gl.uniform_block_binding(program, block_index, num_constant_buffers);
                }
                None => log::warn!(
                    "constant buffer '{name}' is not used by the linked program; \
                     slot {num_constant_buffers} stays reserved"
                ),
            }
            num_constant_buffers += 1;
        }
        let mut num_samplers = 0u32;
        for name in desc.samplers {
            match gl.uniform_location(program, name) {
                Some(location) => gl.uniform_1_i32(location, num_samplers as i32),
                None => log::warn!(
                    "sampler '{name}' is not used by the linked program; \
                     slot {num_samplers} stays reserved"
                ),
            }
            num_samplers += 1;
        }

        self.techniques.push(Technique {
            layout,
            program,
            num_constant_buffers,
            num_samplers,
        });
        Ok(TechniqueHandle::from_index(self.techniques.len() - 1))
    }

    pub fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferHandle, DeviceError> {
        self.make_shared_current();
        let gl_name = self.gl.create_buffer();
        if gl_name == 0 {
            log::error!("buffer creation failed: driver refused the allocation");
            return Err(DeviceError::OutOfDeviceMemory);
        }
        let handle = BufferHandle(self.buffers.insert(Buffer {
            gl_name,
            ty: desc.ty,
            usage: desc.usage,
            size: 0,
        }));
        if let Some(data) = desc.initial_data {
            if !data.is_empty() {
                self.update_buffer(handle, 0, data);
            }
        }
        Ok(handle)
    }

    pub fn destroy_buffer(&mut self, handle: BufferHandle) {
        self.make_shared_current();
        let buffer = self.buffers.remove(handle.0);
        self.gl.bind_buffer(translate::buffer_target(buffer.ty), 0);
        self.gl.delete_buffer(buffer.gl_name);
    }

    /// Writes `data` at `offset`, growing the buffer when the write ends
    /// past its current size.
    ///
    /// Growth that starts at offset 0 respecifies the storage in one upload.
    /// Growth from a nonzero offset respecifies the storage *undefined* and
    /// then uploads only `data`: bytes below `offset` are lost. Callers that
    /// grow incrementally must rewrite the full range before drawing, which
    /// is exactly what the frame-rebuilt scene buffers do.
    pub fn update_buffer(&mut self, handle: BufferHandle, offset: usize, data: &[u8]) {
        self.make_shared_current();
        let Device { gl, buffers, .. } = self;
        let buffer = buffers.get_mut(handle.0);
        let target = translate::buffer_target(buffer.ty);
        let usage = translate::buffer_usage(buffer.usage);
        gl.bind_buffer(target, buffer.gl_name);

        let new_size = buffer.size.max(offset + data.len());
        if new_size > buffer.size {
            if offset == 0 {
                gl.buffer_data(target, data, usage);
            } else {
                gl.buffer_data_size(target, new_size, usage);
                gl.buffer_sub_data(target, offset, data);
            }
            buffer.size = new_size;
        } else {
            gl.buffer_sub_data(target, offset, data);
        }
    }

    /// Current size of a buffer's GPU storage.
    pub fn buffer_size(&self, handle: BufferHandle) -> usize {
        self.buffers.get(handle.0).size
    }

    pub fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle, DeviceError> {
        self.make_shared_current();
        let gl_name = self.gl.create_texture();
        if gl_name == 0 {
            log::error!("texture creation failed: driver refused the allocation");
            return Err(DeviceError::OutOfDeviceMemory);
        }
        let handle = TextureHandle(self.textures.insert(Texture { gl_name, ty: desc.ty }));
        if let Some(image) = desc.initial_data {
            self.update_texture(handle, 0, &image);
        }
        Ok(handle)
    }

    pub fn destroy_texture(&mut self, handle: TextureHandle) {
        self.make_shared_current();
        let texture = self.textures.remove(handle.0);
        self.gl.delete_texture(texture.gl_name);
    }

    /// Respecifies one mip level from CPU image data. Array textures upload
    /// all of the view's layers at once.
    pub fn update_texture(&mut self, handle: TextureHandle, level: u32, image: &ImageView) {
        self.make_shared_current();
        let texture = self.textures.get(handle.0);
        let target = translate::texture_target(texture.ty);
        let (pixel_format, pixel_type) = translate::pixel_format(image.format);
        self.gl.bind_texture(target, texture.gl_name);
        match texture.ty {
            TextureType::Texture2D => {
                assert!(
                    image.layers == 1,
                    "2D texture upload carries {} layers",
                    image.layers
                );
                self.gl.tex_image_2d(
                    target,
                    gl_count(level),
                    translate::internal_format(image.format),
                    gl_extent(image.width),
                    gl_extent(image.height),
                    pixel_format,
                    pixel_type,
                    Some(image.pixels),
                );
            }
            TextureType::Texture2DArray => {
                self.gl.tex_image_3d(
                    target,
                    gl_count(level),
                    translate::internal_format(image.format),
                    gl_extent(image.width),
                    gl_extent(image.height),
                    gl_extent(image.layers),
                    pixel_format,
                    pixel_type,
                    Some(image.pixels),
                );
            }
        }
    }

    pub fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerHandle, DeviceError> {
        self.make_shared_current();
        let gl_name = self.gl.create_sampler();
        if gl_name == 0 {
            log::error!("sampler creation failed: driver refused the allocation");
            return Err(DeviceError::OutOfDeviceMemory);
        }
        let gl = &self.gl;
        gl.sampler_parameter_i32(
            gl_name,
            glow::TEXTURE_MIN_FILTER,
            translate::sampler_filter(desc.min_filter),
        );
        gl.sampler_parameter_i32(
            gl_name,
            glow::TEXTURE_MAG_FILTER,
            translate::sampler_filter(desc.mag_filter),
        );
        gl.sampler_parameter_i32(
            gl_name,
            glow::TEXTURE_WRAP_S,
            translate::sampler_wrap(desc.wrap_u),
        );
        gl.sampler_parameter_i32(
            gl_name,
            glow::TEXTURE_WRAP_T,
            translate::sampler_wrap(desc.wrap_v),
        );
        Ok(SamplerHandle(self.samplers.insert(Sampler { gl_name })))
    }

    pub fn destroy_sampler(&mut self, handle: SamplerHandle) {
        self.make_shared_current();
        let sampler = self.samplers.remove(handle.0);
        self.gl.delete_sampler(sampler.gl_name);
    }

    // ── frame state ──

    /// Clears the context's render target. At least one of `ops`' fields
    /// must be set.
    pub fn clear(&mut self, ctx: ContextHandle, ops: &ClearOps) {
        assert!(
            ops.color.is_some() || ops.depth.is_some() || ops.stencil.is_some(),
            "clear requested without any target"
        );
        self.make_window_current(ctx);
        let gl = &self.gl;
        let mut mask = 0;
        if let Some([r, g, b, a]) = ops.color {
            gl.clear_color(r, g, b, a);
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if let Some(depth) = ops.depth {
            gl.clear_depth(depth);
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if let Some(stencil) = ops.stencil {
            gl.clear_stencil(i32::from(stencil));
            mask |= glow::STENCIL_BUFFER_BIT;
        }
        gl.clear(mask);
    }

    pub fn set_viewport(&mut self, ctx: ContextHandle, viewport: Rect2i) {
        self.make_window_current(ctx);
        let Device { gl, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;
        if cache.viewport != Some(viewport) {
            cache.viewport = Some(viewport);
            gl.viewport(
                viewport.position.x,
                viewport.position.y,
                viewport.size.width,
                viewport.size.height,
            );
        }
    }

    /// Sets or disables the scissor rectangle.
    pub fn set_scissor(&mut self, ctx: ContextHandle, scissor: Option<Rect2i>) {
        self.make_window_current(ctx);
        let Device { gl, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;
        if cache.scissor == Some(scissor) {
            return;
        }
        let was_enabled = matches!(cache.scissor, Some(Some(_)));
        cache.scissor = Some(scissor);
        match scissor {
            Some(rect) => {
                if !was_enabled {
                    gl.enable(glow::SCISSOR_TEST);
                }
                gl.scissor(rect.position.x, rect.position.y, rect.size.width, rect.size.height);
            }
            None => {
                gl.disable(glow::SCISSOR_TEST);
            }
        }
    }

    /// Binds a technique's program and vertex layout.
    ///
    /// On a layout change the attribute-array enable set is adjusted to the
    /// new layout's location range and attribute pointers are marked stale;
    /// they are re-specified by the next vertex-buffer bind or draw.
    pub fn set_technique(&mut self, ctx: ContextHandle, handle: TechniqueHandle) {
        self.make_window_current(ctx);
        let technique = self.technique_info(handle);
        let attribute_count = self.layouts.get(technique.layout.0).attribute_count();
        let Device { gl, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;

        if cache.technique != Some(handle) {
            cache.technique = Some(handle);
            gl.use_program(technique.program);
        }

        if cache.vertex_layout != Some(technique.layout) {
            cache.vertex_layout = Some(technique.layout);
            cache.vertex_layout_dirty = true;

            let old_count = cache.num_active_attributes;
            let new_count = attribute_count;
            if old_count != new_count {
                for location in old_count.min(new_count)..new_count {
                    gl.enable_vertex_attrib_array(location);
                }
                for location in new_count..old_count.max(new_count) {
                    gl.disable_vertex_attrib_array(location);
                }
                cache.num_active_attributes = new_count;
            }
        }
    }

    /// Binds buffer ranges to consecutive vertex streams starting at
    /// `first_stream`, and specifies the attribute pointers of every stream
    /// that actually changed (or of all passed streams when the layout just
    /// changed).
    pub fn set_vertex_buffers(
        &mut self,
        ctx: ContextHandle,
        first_stream: usize,
        views: &[BufferView],
    ) {
        self.make_window_current(ctx);
        let Device { gl, layouts, buffers, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;
        let layout = match cache.vertex_layout {
            Some(handle) => layouts.get(handle.0),
            None => panic!("set_vertex_buffers requires a bound technique"),
        };

        for (i, view) in views.iter().enumerate() {
            let stream_index = first_stream + i;
            let stream = match layout.streams().get(stream_index) {
                Some(stream) => stream,
                None => panic!(
                    "vertex stream {stream_index} out of range; the bound layout has {}",
                    layout.streams().len()
                ),
            };
            if !cache.vertex_layout_dirty && cache.vertex_buffers[stream_index] == Some(*view) {
                continue;
            }
            cache.vertex_buffers[stream_index] = Some(*view);

            let buffer = buffers.get(view.buffer.0);
            bind_buffer_cached(gl, cache, buffer);
            for attribute in &stream.attributes {
                let (gl_type, normalized, integer) = translate::attribute_gl(attribute.ty);
                let offset = view.offset + attribute.offset as usize;
                let dimension = attribute.dimension as i32;
                let stride = stream.stride as i32;
                if integer {
                    gl.vertex_attrib_pointer_int(
                        attribute.location,
                        dimension,
                        gl_type,
                        stride,
                        offset,
                    );
                } else {
                    gl.vertex_attrib_pointer(
                        attribute.location,
                        dimension,
                        gl_type,
                        normalized,
                        stride,
                        offset,
                    );
                }
                gl.vertex_attrib_divisor(attribute.location, u32::from(stream.instanced));
            }
        }
        cache.vertex_layout_dirty = false;
    }

    /// Binds uniform-buffer ranges to consecutive slots starting at
    /// `first_slot`. A view size of zero resolves to the buffer's current
    /// size at bind time.
    pub fn set_constant_buffers(
        &mut self,
        ctx: ContextHandle,
        first_slot: usize,
        views: &[BufferView],
    ) {
        self.make_window_current(ctx);
        let Device { gl, buffers, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;

        for (i, view) in views.iter().enumerate() {
            let slot = first_slot + i;
            assert!(
                slot < MAX_CONSTANT_BUFFER_SLOTS,
                "constant buffer slot {slot} out of range ({MAX_CONSTANT_BUFFER_SLOTS} slots)"
            );
            let buffer = buffers.get(view.buffer.0);
            let resolved = BufferView {
                buffer: view.buffer,
                offset: view.offset,
                size: if view.size == 0 { buffer.size } else { view.size },
            };
            if cache.constant_buffers[slot] != Some(resolved) {
                cache.constant_buffers[slot] = Some(resolved);
                gl.bind_buffer_range(
                    glow::UNIFORM_BUFFER,
                    slot as u32,
                    buffer.gl_name,
                    resolved.offset,
                    resolved.size,
                );
            }
        }
    }

    /// Binds textures to consecutive units starting at `first_unit`.
    pub fn set_textures(&mut self, ctx: ContextHandle, first_unit: usize, handles: &[TextureHandle]) {
        self.make_window_current(ctx);
        let Device { gl, textures, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;

        for (i, handle) in handles.iter().enumerate() {
            let unit = first_unit + i;
            assert!(
                unit < MAX_TEXTURE_UNITS,
                "texture unit {unit} out of range ({MAX_TEXTURE_UNITS} units)"
            );
            let texture = textures.get(handle.0);
            let slot = &mut cache.textures[unit][texture.ty as usize];
            if *slot != texture.gl_name {
                *slot = texture.gl_name;
                gl.active_texture_unit(unit as u32);
                gl.bind_texture(translate::texture_target(texture.ty), texture.gl_name);
            }
        }
    }

    /// Binds samplers to consecutive units starting at `first_unit`.
    pub fn set_samplers(&mut self, ctx: ContextHandle, first_unit: usize, handles: &[SamplerHandle]) {
        self.make_window_current(ctx);
        let Device { gl, samplers, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;

        for (i, handle) in handles.iter().enumerate() {
            let unit = first_unit + i;
            assert!(
                unit < MAX_TEXTURE_UNITS,
                "sampler unit {unit} out of range ({MAX_TEXTURE_UNITS} units)"
            );
            let sampler = samplers.get(handle.0);
            if cache.samplers[unit] != sampler.gl_name {
                cache.samplers[unit] = sampler.gl_name;
                gl.bind_sampler(unit as u32, sampler.gl_name);
            }
        }
    }

    pub fn set_blend_state(&mut self, ctx: ContextHandle, state: BlendState) {
        self.make_window_current(ctx);
        let Device { gl, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;
        if cache.blend != Some(state) {
            cache.blend = Some(state);
            gl.blend_equation_separate(
                translate::blend_op(state.rgb_op),
                translate::blend_op(state.alpha_op),
            );
            gl.blend_func_separate(
                translate::blend_factor(state.src_rgb),
                translate::blend_factor(state.dst_rgb),
                translate::blend_factor(state.src_alpha),
                translate::blend_factor(state.dst_alpha),
            );
        }
    }

    // ── draws ──

    /// Issues an instanced non-indexed draw.
    pub fn draw(
        &mut self,
        ctx: ContextHandle,
        primitive: PrimitiveType,
        first_vertex: u32,
        vertex_count: u32,
        instance_count: u32,
    ) {
        self.make_window_current(ctx);
        self.flush_vertex_layout(ctx);
        self.gl.draw_arrays_instanced(
            translate::primitive_mode(primitive),
            gl_count(first_vertex),
            gl_count(vertex_count),
            gl_count(instance_count),
        );
    }

    /// Issues an instanced indexed draw with a base vertex.
    pub fn draw_indexed(
        &mut self,
        ctx: ContextHandle,
        primitive: PrimitiveType,
        indices: IndexBufferView,
        index_count: u32,
        instance_count: u32,
        base_vertex: u32,
    ) {
        self.make_window_current(ctx);
        self.flush_vertex_layout(ctx);
        let Device { gl, buffers, contexts, .. } = self;
        let cache = &mut contexts.get_mut(ctx.0).state;
        let buffer = buffers.get(indices.view.buffer.0);
        assert!(
            buffer.ty == BufferType::Index,
            "draw_indexed requires an index buffer"
        );
        bind_buffer_cached(gl, cache, buffer);
        gl.draw_elements_instanced_base_vertex(
            translate::primitive_mode(primitive),
            gl_count(index_count),
            translate::index_type(indices.index_type),
            indices.view.offset,
            gl_count(instance_count),
            gl_count(base_vertex),
        );
    }

    /// Re-specifies every stream's attribute pointers from the cached views
    /// when the bound layout changed since they were last specified.
    fn flush_vertex_layout(&mut self, ctx: ContextHandle) {
        let views = {
            let cache = &self.contexts.get(ctx.0).state;
            assert!(cache.technique.is_some(), "draw issued with no technique bound");
            let layout = match cache.vertex_layout {
                Some(handle) => self.layouts.get(handle.0),
                None => panic!("draw issued with no vertex layout bound"),
            };
            if !cache.vertex_layout_dirty {
                return;
            }
            let mut views = Vec::with_capacity(layout.streams().len());
            for stream_index in 0..layout.streams().len() {
                match cache.vertex_buffers[stream_index] {
                    Some(view) => views.push(view),
                    None => panic!("vertex stream {stream_index} has no buffer bound at draw"),
                }
            }
            views
        };
        self.set_vertex_buffers(ctx, 0, &views);
    }

    /// Number of (constant buffer, sampler) slots a technique consumes,
    /// including slots reserved for names the linker eliminated.
    pub fn technique_slot_counts(&self, handle: TechniqueHandle) -> (u32, u32) {
        let technique = self.technique_info(handle);
        (technique.num_constant_buffers, technique.num_samplers)
    }

    // ── test hooks ──

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &G {
        &self.gl
    }

    #[cfg(test)]
    pub(crate) fn buffer_raw_name(&self, handle: BufferHandle) -> u32 {
        self.buffers.get(handle.0).gl_name
    }
}
