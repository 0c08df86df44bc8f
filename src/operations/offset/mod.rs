mod miter_offset_2d;

pub use miter_offset_2d::MiterOffset2D;
