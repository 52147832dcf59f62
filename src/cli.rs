//! `polar-ae` CLI application
//!
//! The CLI application is organized in several subcommands. The
//! supported subcommands can be seen by running `polar-ae`.
//! See the modules below for examples and more information about
//! how to use each subcommand.
//!
//! All the subcommands select a polar code in the same way: the number of
//! index bits `n` (giving a code length `N = 2^n`) followed by either a
//! minimal information set (`--min-info-set 3,5`) or the order of a
//! Reed-Muller code (`--reed-muller r`).

use crate::code::{
    construction::{from_min_info_set, reed_muller},
    PolarCode,
};
use clap::Parser;
use std::error::Error;

pub mod ber;
pub mod construct;
pub mod encode;

/// Trait to run a CLI subcommand
pub trait Run {
    /// Run the CLI subcommand
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    name = "polar-ae",
    about = "Polar code automorphism ensemble decoding"
)]
pub enum Args {
    /// ber subcommand
    BER(ber::Args),
    /// construct subcommand
    Construct(construct::Args),
    /// encode subcommand
    Encode(encode::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::BER(x) => x.run(),
            Args::Construct(x) => x.run(),
            Args::Encode(x) => x.run(),
        }
    }
}

/// Polar code selection arguments.
///
/// These arguments are shared by all the subcommands.
#[derive(Debug, Clone, clap::Args)]
pub struct CodeArgs {
    /// Number of index bits n (code length 2^n)
    pub n: usize,
    /// Minimal information set (format "3,5")
    #[arg(
        long,
        value_delimiter = ',',
        required_unless_present = "reed_muller",
        conflicts_with = "reed_muller"
    )]
    pub min_info_set: Vec<usize>,
    /// Reed-Muller code order r
    #[arg(long)]
    pub reed_muller: Option<usize>,
}

impl CodeArgs {
    /// Builds the polar code selected by the arguments.
    pub fn code(&self) -> Result<PolarCode, Box<dyn Error>> {
        Ok(match self.reed_muller {
            Some(r) => reed_muller(r, self.n)?,
            None => from_min_info_set(&self.min_info_set, self.n)?,
        })
    }

    /// Returns a short description of the code selection.
    pub fn description(&self) -> String {
        match self.reed_muller {
            Some(r) => format!("RM({r}, {})", self.n),
            None => {
                let set = self
                    .min_info_set
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("n = {}, minimal information set {{{set}}}", self.n)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_min_info_set() {
        let args = Args::try_parse_from(["polar-ae", "construct", "4", "--min-info-set", "3,8"])
            .unwrap();
        let Args::Construct(args) = args else {
            panic!("wrong subcommand");
        };
        assert_eq!(&args.code.min_info_set, &[3, 8]);
        let code = args.code.code().unwrap();
        assert_eq!(code.length(), 16);
        assert!(code.is_info(3) && code.is_info(8));
    }

    #[test]
    fn parse_reed_muller() {
        let args =
            Args::try_parse_from(["polar-ae", "construct", "5", "--reed-muller", "2"]).unwrap();
        let Args::Construct(args) = args else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.code.code().unwrap().dimension(), 16);
        assert_eq!(args.code.description(), "RM(2, 5)");
    }

    #[test]
    fn code_selection_required() {
        assert!(Args::try_parse_from(["polar-ae", "construct", "5"]).is_err());
        assert!(Args::try_parse_from([
            "polar-ae",
            "construct",
            "5",
            "--reed-muller",
            "2",
            "--min-info-set",
            "7"
        ])
        .is_err());
    }

    #[test]
    fn huge_code_rejected() {
        let args =
            Args::try_parse_from(["polar-ae", "construct", "64", "--reed-muller", "1"]).unwrap();
        let Args::Construct(args) = args else {
            panic!("wrong subcommand");
        };
        assert!(args.code.code().is_err());
    }

    #[test]
    fn invalid_code() {
        let args =
            Args::try_parse_from(["polar-ae", "construct", "3", "--min-info-set", "9"]).unwrap();
        let Args::Construct(args) = args else {
            panic!("wrong subcommand");
        };
        assert!(args.code.code().is_err());
    }
}
