//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod burden;
pub mod evolution;
pub mod init;
pub mod interventions;
pub mod matrix;
pub mod output;
pub mod rigor;
pub mod synthesis;
pub mod validate;

pub use burden::{execute_burden, BurdenOptions};
pub use evolution::{execute_evolution, EvolutionOptions};
pub use init::{execute_init, InitOptions};
pub use interventions::{execute_interventions, InterventionsOptions};
pub use matrix::{execute_matrix, MatrixOptions};
pub use rigor::{execute_rigor, RigorOptions};
pub use synthesis::{execute_synthesis, SynthesisOptions};
pub use validate::{execute_validate, ValidateOptions};
