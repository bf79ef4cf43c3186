// lib.rs - The Sphinx onion packet library
// Copyright (C) 2018  David Anthony Stainton.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! An implementation of the Sphinx onion packet format used to source route
//! payments through a network of payment channels.
//!
//! # The Onion Packet
//!
//! The sender picks an ephemeral session key and an ordered route of hops.
//! Each hop only learns the instructions addressed to it and the identity of
//! the next hop; the packet stays 1366 bytes long at every position so a
//! relay cannot tell how far it is from either end.
//!
//! # Features
//!
//! * per hop shared secrets through a blinded ephemeral key chain
//! * per hop HMAC chaining over the routing information and associated data
//! * hidden path length through filler generation
//! * relay side unwrapping with replay detection
//!
//! **Sphinx: A Compact and Provably Secure Mix Format**\
//! https://cypherpunks.ca/~iang/pubs/Sphinx_Oakland09.pdf
//!
//! **Onion Routing Protocol**\
//! https://github.com/lightning/bolts/blob/master/04-onion-routing.md

#[macro_use]
extern crate arrayref;
extern crate byteorder;
extern crate chacha20;
extern crate hmac;
extern crate rand_core;
extern crate secp256k1;
extern crate sha2;
extern crate subtle;
extern crate thiserror;
extern crate tracing;
extern crate zeroize;

pub mod client;
pub mod constants;
pub mod ecdh;
pub mod error;
pub mod hop_data;
pub mod node;
pub mod packet;
pub mod server;

mod internal_crypto;
mod utils;

pub use client::{new_packet, ConstructedOnion, HeaderFill, OnionPacketBuilder};
pub use ecdh::{PrivateKey, PublicKey};
pub use error::{KeyError, OnionBuildError, OnionDecodeError, OnionPeelError};
pub use hop_data::{HopPayload, PerHopData};
pub use node::{OnionRelay, ReplayCache, VolatileReplayCache};
pub use packet::OnionPacket;
pub use server::{onion_packet_unwrap, NextHop, PeeledOnion};
