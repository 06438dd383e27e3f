pub mod config;
pub mod run;

pub use run::{Args, Format, Mutation, Report, Settings, render, run};
