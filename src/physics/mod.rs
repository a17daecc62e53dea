pub mod environment;
pub mod orbital;
pub mod solar;
