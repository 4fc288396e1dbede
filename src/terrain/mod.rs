pub mod constants;
pub mod coordinates;

pub use coordinates::GridLayout;
