mod runner;

pub use runner::ProcessOwner;
