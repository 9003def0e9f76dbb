pub mod advisors;
pub mod entities;
pub mod ports;
pub mod schema;
pub mod services;
pub mod tools;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
