//! Core Monte Carlo transport for the plane-parallel slab.
//!
//! This module holds the photon packet and its two physical operations,
//! the escape-angle histogram, the per-packet random walk, and the
//! ensemble driver that ties them together.

pub mod histogram;
pub mod packet;
pub mod sim;
pub mod transport;

pub use histogram::EscapeHistogram;
pub use packet::PhotonPacket;
pub use sim::{RunProgress, RunResult, Simulation};
pub use transport::{transport_packet, Fate};
