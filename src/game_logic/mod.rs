pub mod abilities;
pub mod errors;
pub mod mining;
pub mod movement;

pub use abilities::*;
pub use errors::*;
pub use mining::*;
pub use movement::*;
