use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Side-scrolling orthographic camera over a fixed-height playing area.
pub struct Camera2D {
    pub position: Vec2,
    /// World units visible vertically.
    pub view_height: f32,
    pub viewport: (u32, u32),
    pub playing_width: f32,
}

impl Camera2D {
    pub fn new(
        viewport_width: u32,
        viewport_height: u32,
        playing_width: f32,
        view_height: f32,
    ) -> Self {
        let mut camera = Self {
            position: Vec2::new(0.0, view_height * 0.5),
            view_height,
            viewport: (viewport_width, viewport_height),
            playing_width,
        };
        camera.follow(0.0);
        camera
    }

    /// World units visible horizontally at the current aspect ratio.
    pub fn view_width(&self) -> f32 {
        let height = self.viewport.1.max(1) as f32;
        self.view_height * self.viewport.0 as f32 / height
    }

    /// Centre the view on `x`, without showing anything outside
    /// `[0, playing_width]`. A view wider than the playing area is centred on it.
    pub fn follow(&mut self, x: f32) {
        let half_w = self.view_width() * 0.5;
        self.position.x = if 2.0 * half_w >= self.playing_width {
            self.playing_width * 0.5
        } else {
            x.max(half_w).min(self.playing_width - half_w)
        };
    }

    pub fn resize(&mut self, viewport_width: u32, viewport_height: u32) {
        self.viewport = (viewport_width, viewport_height);
        let x = self.position.x;
        self.follow(x);
    }

    /// (left, right, bottom, top) in world units.
    pub fn view_bounds(&self) -> (f32, f32, f32, f32) {
        let half_w = self.view_width() * 0.5;
        let half_h = self.view_height * 0.5;
        (
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y - half_h,
            self.position.y + half_h,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (left, right, bottom, top) = self.view_bounds();
        let proj = Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
