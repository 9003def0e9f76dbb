pub mod entities;
pub mod ports;
pub mod services;
pub mod splitter;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
