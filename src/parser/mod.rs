pub mod chunk;
pub mod cursor;
pub mod main;

pub use chunk::*;
pub use cursor::*;
pub use main::*;
