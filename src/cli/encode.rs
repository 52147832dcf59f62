//! Encode CLI subcommand.
//!
//! This command can be used to encode using a polar code. Both the input and
//! the output are files of unpacked bits (one byte per bit). The input is read
//! in messages of k bytes, and each message produces a codeword of N bytes.

use super::{CodeArgs, Run};
use crate::encoder::Encoder;
use clap::Parser;
use std::{
    error::Error,
    fs::File,
    io::{ErrorKind, Read, Write},
    path::PathBuf,
};

/// Encode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Performs polar encoding")]
pub struct Args {
    #[command(flatten)]
    pub code: CodeArgs,
    /// input file (information words as unpacked bits)
    pub input: PathBuf,
    /// output file (codewords as unpacked bits)
    pub output: PathBuf,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let encoder = Encoder::new(self.code.code()?);
        let mut input = File::open(&self.input)?;
        let mut output = File::create(&self.output)?;
        let mut information_word = vec![0; encoder.code().dimension()];
        loop {
            match input.read_exact(&mut information_word[..]) {
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                ret => ret?,
            };
            for b in information_word.iter_mut() {
                *b = u8::from(*b == 1);
            }
            let codeword = encoder.encode(&information_word)?;
            output.write_all(&codeword)?;
        }
        Ok(())
    }
}
