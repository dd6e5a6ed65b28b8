pub mod simulation_channels;
