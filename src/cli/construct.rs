//! Construct CLI subcommand.
//!
//! This subcommand builds a decreasing monomial polar code and prints its
//! indicator vector, dimension, rate and stabilizer block profile.
//!
//! # Examples
//!
//! ```shell
//! $ polar-ae construct 5 --min-info-set 7,24
//! ```

use super::{CodeArgs, Run};
use crate::automorphism::stabilizer_block_profile;
use clap::Parser;
use std::error::Error;

/// Construct CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Constructs a polar code")]
pub struct Args {
    #[command(flatten)]
    pub code: CodeArgs,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = self.code.code()?;
        let profile = stabilizer_block_profile(&code);
        println!("Code: {}", self.code.description());
        println!("Indicator: {code}");
        println!("Information bits (k): {}", code.dimension());
        println!("Codeword size (N): {}", code.length());
        println!("Code rate: {:.3}", code.rate());
        println!("Block profile: {profile}");
        Ok(())
    }
}
