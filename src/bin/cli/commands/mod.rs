pub mod cards;
pub mod queue;
pub mod review;
pub mod sets;
pub mod settings;
pub mod stats;
pub mod study;
