//! Simulation.
//!
//! This module contains utilities to simulate the BER of a polar code with
//! BPSK modulation in an AWGN channel.

pub mod ber;
pub mod channel;
pub mod modulation;
