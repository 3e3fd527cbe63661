pub mod diff;
pub mod info;
pub mod overlay;
pub mod set;
pub mod show;
