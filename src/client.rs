// client.rs - onion packet construction
// Copyright (C) 2018  David Stainton.
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

//! Sender side of the onion, packet construction.
//!
//! Construction happens in three passes over the route:
//!
//! 1. walk the route forward deriving each hop's shared secret while
//!    blinding the session key, see `generate_hop_keys`
//! 2. walk it forward again accumulating the filler, the bytes each relay
//!    will append while unwrapping, see `generate_filler`
//! 3. walk it backward from the last hop, layering the routing info and
//!    chaining the HMACs

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};
use zeroize::Zeroize;

use super::constants::{
    HMAC_SIZE, HOP_DATA_SIZE, HOP_PAYLOAD_SIZE, MAX_HOPS, PACKET_VERSION, ROUTING_INFO_SIZE,
    STREAM_SIZE,
};
use super::ecdh::PrivateKey;
use super::error::OnionBuildError;
use super::hop_data::PerHopData;
use super::internal_crypto::{
    blinding_factor, generate_key, hmac, HopKeys, StreamCipher, KEY_PAD,
};
use super::packet::OnionPacket;
use super::utils::{shift_right, xor_assign};

/// How the routing info buffer is seeded before the first layer is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderFill {
    /// keystream from the `pad` key of the session key
    SessionKeyed,
    /// all zero bytes, the legacy construction
    Zeroed,
}

impl Default for HeaderFill {
    fn default() -> HeaderFill {
        HeaderFill::SessionKeyed
    }
}

/// A finished packet along with the route it was built for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructedOnion {
    pub packet: OnionPacket,
    /// the caller's route, unchanged and in order
    pub hops_data: Vec<PerHopData>,
}

impl ConstructedOnion {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.packet.to_bytes()
    }
}

/// i am a factory, i build onion packets
#[derive(Clone, Debug)]
pub struct OnionPacketBuilder {
    session_key: PrivateKey,
    hops_data: Vec<PerHopData>,
    associated_data: Vec<u8>,
    header_fill: HeaderFill,
}

impl OnionPacketBuilder {
    pub fn new(session_key: PrivateKey, hops_data: Vec<PerHopData>) -> OnionPacketBuilder {
        OnionPacketBuilder {
            session_key,
            hops_data,
            associated_data: Vec::new(),
            header_fill: HeaderFill::default(),
        }
    }

    /// bytes bound into every HMAC but never transmitted, usually the payment hash
    pub fn associated_data(mut self, associated_data: &[u8]) -> OnionPacketBuilder {
        self.associated_data = associated_data.to_vec();
        self
    }

    pub fn header_fill(mut self, header_fill: HeaderFill) -> OnionPacketBuilder {
        self.header_fill = header_fill;
        self
    }

    /// Build the packet. This is a pure function of the builder's
    /// inputs, calling it twice yields identical packets.
    ///
    /// # Errors
    ///
    /// * `OnionBuildError::InvalidRouteLength` - the route is empty or longer than `MAX_HOPS`
    /// * `OnionBuildError::InvalidKeyMaterial` - the blinding chain produced an unusable scalar
    pub fn build(&self) -> Result<ConstructedOnion, OnionBuildError> {
        let num_hops = self.hops_data.len();
        if num_hops == 0 || num_hops > MAX_HOPS {
            return Err(OnionBuildError::InvalidRouteLength(num_hops));
        }
        debug!(hops = num_hops, header_fill = ?self.header_fill, "building onion packet");

        let hop_keys = generate_hop_keys(&self.session_key, &self.hops_data)?;
        let filler = generate_filler(&hop_keys);
        let mut routing_info = self.initial_routing_info();

        let mut next_hmac = [0u8; HMAC_SIZE];
        for (i, (hop, keys)) in self.hops_data.iter().zip(hop_keys.iter()).enumerate().rev() {
            shift_right(&mut routing_info, HOP_DATA_SIZE);

            let mut hop_payload = hop.payload.to_bytes();
            routing_info[..HOP_PAYLOAD_SIZE].copy_from_slice(&hop_payload);
            routing_info[HOP_PAYLOAD_SIZE..HOP_DATA_SIZE].copy_from_slice(&next_hmac);
            hop_payload.zeroize();

            StreamCipher::new(&keys.rho).xor_key_stream(&mut routing_info);

            if i == num_hops - 1 {
                routing_info[ROUTING_INFO_SIZE - filler.len()..].copy_from_slice(&filler);
            }

            next_hmac = hmac(&keys.mu, &[&routing_info, &self.associated_data]);
            trace!(hop = i, "wrapped onion layer");
        }

        Ok(ConstructedOnion {
            packet: OnionPacket {
                version: PACKET_VERSION,
                ephemeral_key: self.session_key.public_key(),
                hop_payload: routing_info,
                hmac: next_hmac,
            },
            hops_data: self.hops_data.clone(),
        })
    }

    fn initial_routing_info(&self) -> [u8; ROUTING_INFO_SIZE] {
        let mut routing_info = [0u8; ROUTING_INFO_SIZE];
        if self.header_fill == HeaderFill::SessionKeyed {
            let mut session_secret = self.session_key.to_bytes();
            let mut pad_key = generate_key(KEY_PAD, &session_secret);
            StreamCipher::new(&pad_key).xor_key_stream(&mut routing_info);
            session_secret.zeroize();
            pad_key.zeroize();
        }
        routing_info
    }
}

/// Walk the route deriving each hop's keys. The session key is blinded
/// after every hop so hop `i` sees `E_i = b_{i-1} * ... * b_0 * E_0`
/// and can recompute its shared secret from `E_i` and its own key alone.
fn generate_hop_keys(
    session_key: &PrivateKey,
    hops_data: &[PerHopData],
) -> Result<Vec<HopKeys>, OnionBuildError> {
    let mut hop_keys = Vec::with_capacity(hops_data.len());
    let mut ephemeral_key = session_key.clone();
    for (i, hop) in hops_data.iter().enumerate() {
        let mut shared_secret = ephemeral_key.exp(&hop.hop_identity);
        hop_keys.push(HopKeys::derive(&shared_secret));
        trace!(hop = i, "derived hop keys");

        if i + 1 < hops_data.len() {
            let mut factor = blinding_factor(&ephemeral_key.public_key().to_bytes(), &shared_secret);
            ephemeral_key = ephemeral_key.blind(&factor)?;
            factor.zeroize();
        }
        shared_secret.zeroize();
    }
    Ok(hop_keys)
}

/// The filler is what the last hop finds at the tail of its routing info:
/// the bytes every earlier relay appended by unwrapping a zero padded
/// buffer. Hop `i` contributes the last `(i + 1) * HOP_DATA_SIZE` bytes of
/// its `rho` stream, landing at the front of the filler once the later
/// relays have shifted it left.
fn generate_filler(hop_keys: &[HopKeys]) -> Vec<u8> {
    let num_hops = hop_keys.len();
    let mut filler = vec![0u8; (num_hops - 1) * HOP_DATA_SIZE];
    for (i, keys) in hop_keys[..num_hops - 1].iter().enumerate() {
        let stream = StreamCipher::new(&keys.rho).generate(STREAM_SIZE);
        let offset = ROUTING_INFO_SIZE - i * HOP_DATA_SIZE;
        xor_assign(&mut filler[..(i + 1) * HOP_DATA_SIZE], &stream[offset..]);
    }
    filler
}

/// Build a packet under a fresh session key drawn from `rng`.
pub fn new_packet<R: RngCore + CryptoRng>(
    rng: &mut R,
    hops_data: Vec<PerHopData>,
    associated_data: &[u8],
) -> Result<ConstructedOnion, OnionBuildError> {
    if hops_data.is_empty() || hops_data.len() > MAX_HOPS {
        return Err(OnionBuildError::InvalidRouteLength(hops_data.len()));
    }
    let session_key = PrivateKey::generate(rng)?;
    OnionPacketBuilder::new(session_key, hops_data)
        .associated_data(associated_data)
        .build()
}
