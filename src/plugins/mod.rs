pub mod camera;
pub mod player;
pub mod ui;
pub mod world;

pub use camera::*;
pub use player::*;
pub use ui::*;
pub use world::*;
