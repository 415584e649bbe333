//
// Copyright 2025 Jeff Bush
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
//

//! Debug view: the background image plus flat colored rectangles for the
//! player, obstacles and trigger zones.

use crate::assets::Background;
use crate::obstacle::Color;
use crate::util::Rect;
use gl::types::{GLint, GLsizeiptr, GLuint};

pub struct RenderContext {
    window: sdl2::video::Window,
    _gl_context: sdl2::video::GLContext, // Hold this so it doesn't get dropped
    vbo: GLuint,
    white_texture_id: GLuint,
    background_texture_id: GLuint,
    background_size: Option<(u32, u32)>,
    vertices: Vec<f32>,
    offset: (i32, i32),
    view: (i32, i32),
    position_attrib: GLuint,
    texcoord_attrib: GLuint,
    color_attrib: GLuint,
}

const VERTEX_SHADER: &str = r#"
attribute vec2 aPosition;
attribute vec2 aTexcoord;
attribute vec4 aColor;
varying vec2 vTexcoord;
varying vec4 vColor;

void main() {
    gl_Position = vec4(aPosition, 0.0, 1.0);
    vTexcoord = aTexcoord;
    vColor = aColor;
}
"#;

const FRAGMENT_SHADER: &str = r#"
varying vec2 vTexcoord;
varying vec4 vColor;
uniform sampler2D texture0;

void main() {
    gl_FragColor = texture2D(texture0, vTexcoord) * vColor;
}
"#;

// x, y, u, v, r, g, b, a
const ATTR_ELEMS_PER_VERTEX: usize = 8;

fn check_gl_error() {
    let err = unsafe { gl::GetError() };
    if err != 0 {
        panic!("Error: {}", err);
    }
}

fn create_texture(width: u32, height: u32, raster_data: &[u8]) -> GLuint {
    unsafe {
        let mut texture_id: GLuint = 0;
        gl::Enable(gl::TEXTURE_2D);
        gl::GenTextures(1, &mut texture_id);
        gl::ActiveTexture(gl::TEXTURE0);
        gl::BindTexture(gl::TEXTURE_2D, texture_id);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
        upload_texture(texture_id, width, height, raster_data);
        texture_id
    }
}

fn upload_texture(texture_id: GLuint, width: u32, height: u32, raster_data: &[u8]) {
    unsafe {
        gl::BindTexture(gl::TEXTURE_2D, texture_id);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::RGBA as GLint,
            width as GLint,
            height as GLint,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            raster_data.as_ptr() as *const _,
        );
        check_gl_error();
    }
}

impl RenderContext {
    pub fn new(sdl: &sdl2::Sdl, width: u32, height: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("Kingdom Quest", width, height)
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;

        let gl_context = window.gl_create_context()?;
        gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const std::os::raw::c_void);
        video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::VSync)?;

        let program = compile_program(VERTEX_SHADER, FRAGMENT_SHADER)?;
        let (position_attrib, texcoord_attrib, color_attrib) = unsafe {
            gl::UseProgram(program);
            (
                gl::GetAttribLocation(program, c"aPosition".as_ptr().cast()) as GLuint,
                gl::GetAttribLocation(program, c"aTexcoord".as_ptr().cast()) as GLuint,
                gl::GetAttribLocation(program, c"aColor".as_ptr().cast()) as GLuint,
            )
        };

        let vbo = unsafe {
            let mut vbo = 0;
            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            vbo
        };

        // Flat rectangles sample a single white texel so one shader covers
        // both them and the background.
        let white_texture_id = create_texture(1, 1, &[255, 255, 255, 255]);
        let background_texture_id = create_texture(1, 1, &[0, 0, 0, 255]);

        unsafe {
            gl::ClearColor(0.1, 0.1, 0.12, 1.0);

            let image_attr = gl::GetUniformLocation(program, c"texture0".as_ptr().cast());
            if image_attr == -1 {
                return Err("texture0 uniform missing".to_string());
            }
            gl::Uniform1i(image_attr, 0);

            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }

        check_gl_error();

        Ok(RenderContext {
            window,
            _gl_context: gl_context,
            vbo,
            white_texture_id,
            background_texture_id,
            background_size: None,
            vertices: Vec::new(),
            offset: (0, 0),
            view: (width as i32, height as i32),
            position_attrib,
            texcoord_attrib,
            color_attrib,
        })
    }

    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.offset = (x, y);
    }

    /// A placeholder shows its message in the title bar instead.
    pub fn set_background(&mut self, background: &Background) {
        match background {
            Background::Image(img) => {
                let (width, height) = img.dimensions();
                upload_texture(self.background_texture_id, width, height, img.as_raw());
                self.background_size = Some((width, height));
                let _ = self.window.set_title("Kingdom Quest");
            }
            Background::Placeholder(message) => {
                self.background_size = None;
                let _ = self.window.set_title(message);
            }
        }
    }

    // Convert from world pixel coordinates to OpenGL coordinate space.
    fn to_ogl_coord(&self, x: f32, y: f32) -> (f32, f32) {
        (
            ((x - self.offset.0 as f32) / self.view.0 as f32) * 2.0 - 1.0,
            1.0 - ((y - self.offset.1 as f32) / self.view.1 as f32) * 2.0,
        )
    }

    fn push_quad(&mut self, rect: &Rect<f32>, color: Color) {
        let (left, top) = self.to_ogl_coord(rect.left, rect.top);
        let (right, bottom) = self.to_ogl_coord(rect.right(), rect.bottom());
        let (r, g, b, a) = color;

        // 0      1
        // +------+
        // |    / |
        // |  /   |
        // +------+
        // 2      3
        #[cfg_attr(any(), rustfmt::skip)]
        self.vertices.extend_from_slice(&[
            left, top, 0.0, 0.0, r, g, b, a, // 0
            right, top, 1.0, 0.0, r, g, b, a, // 1
            left, bottom, 0.0, 1.0, r, g, b, a, // 2
            right, top, 1.0, 0.0, r, g, b, a, // 1
            right, bottom, 1.0, 1.0, r, g, b, a, // 3
            left, bottom, 0.0, 1.0, r, g, b, a, // 2
        ]);
    }

    // Add a rectangle to the display list.
    pub fn draw_rect(&mut self, rect: &Rect<f32>, color: Color) {
        self.push_quad(rect, color);
    }

    fn flush(&mut self, texture_id: GLuint) {
        if self.vertices.is_empty() {
            return;
        }

        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.vertices.len() * std::mem::size_of::<f32>()) as GLsizeiptr,
                self.vertices.as_ptr().cast(),
                gl::STREAM_DRAW,
            );
            gl::BindTexture(gl::TEXTURE_2D, texture_id);

            let stride = (ATTR_ELEMS_PER_VERTEX * std::mem::size_of::<f32>()) as GLint;
            gl::VertexAttribPointer(
                self.position_attrib,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null(),
            );
            gl::VertexAttribPointer(
                self.texcoord_attrib,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null::<f32>().add(2).cast(),
            );
            gl::VertexAttribPointer(
                self.color_attrib,
                4,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null::<f32>().add(4).cast(),
            );

            gl::EnableVertexAttribArray(self.position_attrib);
            gl::EnableVertexAttribArray(self.texcoord_attrib);
            gl::EnableVertexAttribArray(self.color_attrib);
            let count = (self.vertices.len() / ATTR_ELEMS_PER_VERTEX) as GLint;
            gl::DrawArrays(gl::TRIANGLES, 0, count);
            check_gl_error();
        }

        self.vertices.clear();
    }

    /// Draw the background faded by `alpha`, then everything queued with
    /// `draw_rect`.
    pub fn render(&mut self, alpha: f32) {
        let queued = std::mem::take(&mut self.vertices);
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        if let Some((width, height)) = self.background_size {
            let area = Rect::new(0.0, 0.0, width as f32, height as f32);
            self.push_quad(&area, (1.0, 1.0, 1.0, alpha));
            self.flush(self.background_texture_id);
        }

        self.vertices = queued;
        self.flush(self.white_texture_id);
        self.window.gl_swap_window();
    }
}

fn compile_shader(shader_type: GLuint, source: &str) -> Result<GLuint, String> {
    let length: GLint = source.len().try_into().map_err(|_| "shader too long".to_string())?;
    unsafe {
        let shader = gl::CreateShader(shader_type);
        check_gl_error();
        gl::ShaderSource(shader, 1, &(source.as_bytes().as_ptr().cast()), &length);

        gl::CompileShader(shader);
        let mut status: GLint = 1;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status == 0 {
            let mut v: [u8; 1024] = [0; 1024];
            let mut log_length = 0i32;
            gl::GetShaderInfoLog(shader, 1024, &mut log_length, v.as_mut_ptr().cast());
            return Err(format!(
                "Shader compile error {}",
                String::from_utf8_lossy(&v[..log_length as usize])
            ));
        }

        Ok(shader)
    }
}

fn compile_program(vertex_source: &str, fragment_source: &str) -> Result<GLuint, String> {
    let vertex_shader = compile_shader(gl::VERTEX_SHADER, vertex_source)?;
    let fragment_shader = compile_shader(gl::FRAGMENT_SHADER, fragment_source)?;

    unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vertex_shader);
        gl::AttachShader(program, fragment_shader);
        gl::LinkProgram(program);

        let mut status: GLint = 1;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status == 0 {
            let mut v: [u8; 1024] = [0; 1024];
            let mut log_length = 0i32;
            gl::GetProgramInfoLog(program, 1024, &mut log_length, v.as_mut_ptr().cast());
            return Err(format!(
                "Error linking shaders {}",
                String::from_utf8_lossy(&v[..log_length as usize])
            ));
        }

        check_gl_error();

        Ok(program)
    }
}
