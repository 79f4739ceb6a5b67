pub mod color_scale;
pub mod projection;
pub mod render;
