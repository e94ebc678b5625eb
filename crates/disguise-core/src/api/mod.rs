pub mod disguise;
pub mod reveal;
