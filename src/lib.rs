pub mod config;
pub mod constants;
pub mod coordinates;
pub mod environment;
pub mod fsm;
pub mod physics;
pub mod robots;
pub mod time;
