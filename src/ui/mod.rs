pub mod grid;
pub mod multibox;
pub mod state;
