pub mod dust_storm_states;
pub mod state_machine;

pub use dust_storm_states::DustStormType;
pub use state_machine::DustStormFSM;
