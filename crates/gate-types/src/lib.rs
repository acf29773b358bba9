pub mod bounds;
pub mod spec;
pub mod style;

pub use bounds::*;
pub use spec::*;
pub use style::*;
