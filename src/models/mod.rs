pub mod feedback;
pub mod filters;
pub mod memory;

pub use feedback::*;
pub use filters::*;
pub use memory::*;
