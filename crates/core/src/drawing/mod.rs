pub mod canvas;
pub mod skeleton;
