pub mod publish;
pub mod reconcile;
pub mod runner;
pub mod state;
