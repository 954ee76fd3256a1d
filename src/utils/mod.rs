pub mod size;
pub mod template;
