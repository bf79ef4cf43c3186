// server.rs - onion relay side function(s)
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

//! Relay side of the onion, packet processing.
//!
//! A relay authenticates the packet with the HMAC key derived from its
//! shared secret, decrypts its own layer, and rebuilds a packet of the same
//! size for the next hop. If unwrapping returns an error the packet MUST be
//! discarded and a failure returned toward the sender.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroize;

use super::constants::{
    HMAC_SIZE, HOP_DATA_SIZE, HOP_PAYLOAD_SIZE, PACKET_VERSION, ROUTING_INFO_SIZE, STREAM_SIZE,
};
use super::ecdh::PrivateKey;
use super::error::OnionPeelError;
use super::hop_data::HopPayload;
use super::internal_crypto::{blinding_factor, hash, hmac, HopKeys, StreamCipher, HASH_SIZE};
use super::packet::OnionPacket;

/// Where the packet goes after this hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextHop {
    /// forward this packet over the channel named in the hop payload
    Forward(OnionPacket),
    /// this hop is the final recipient
    Exit,
}

impl NextHop {
    pub fn into_packet(self) -> Option<OnionPacket> {
        match self {
            NextHop::Forward(packet) => Some(packet),
            NextHop::Exit => None,
        }
    }
}

/// The result of unwrapping one layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeeledOnion {
    /// the instructions addressed to this hop
    pub hop_payload: HopPayload,
    pub next: NextHop,
    /// identifies the packet for replay detection
    pub replay_tag: [u8; HASH_SIZE],
}

/// unwrap a layer of onion packet encryption
///
/// # Arguments
///
/// * `private_key` - the relay's node key
/// * `packet` - the packet as received
/// * `associated_data` - the bytes the sender bound into the HMAC
///
/// # Errors
///
/// * `OnionPeelError::UnknownVersion` - the version byte is not 0
/// * `OnionPeelError::InvalidKeyMaterial` - the blinded ephemeral key is unusable
/// * `OnionPeelError::AuthenticationFailed` - the HMAC did not verify
pub fn onion_packet_unwrap(
    private_key: &PrivateKey,
    packet: &OnionPacket,
    associated_data: &[u8],
) -> Result<PeeledOnion, OnionPeelError> {
    if packet.version != PACKET_VERSION {
        return Err(OnionPeelError::UnknownVersion(packet.version));
    }

    // Calculate the hop's shared secret and derive the keys
    // required for packet processing.
    let keys = HopKeys::derive(&private_key.exp(&packet.ephemeral_key));
    let replay_tag = hash(&keys.shared_secret);

    // compare MAC in constant time
    let calculated_mac = hmac(&keys.mu, &[&packet.hop_payload, associated_data]);
    if calculated_mac[..].ct_eq(&packet.hmac[..]).unwrap_u8() == 0 {
        warn!("onion hmac mismatch, dropping packet");
        return Err(OnionPeelError::AuthenticationFailed);
    }

    // Append padding to preserve length invariance, decrypt the (padded)
    // routing info, and extract the section for the current hop.
    let mut b = [0u8; STREAM_SIZE];
    b[..ROUTING_INFO_SIZE].copy_from_slice(&packet.hop_payload);
    StreamCipher::new(&keys.rho).xor_key_stream(&mut b);
    let hop_payload = HopPayload::from_bytes(array_ref![b, 0, HOP_PAYLOAD_SIZE]);
    let next_hmac = *array_ref![b, HOP_PAYLOAD_SIZE, HMAC_SIZE];
    let next_routing_info = *array_ref![b, HOP_DATA_SIZE, ROUTING_INFO_SIZE];
    b.zeroize();

    if next_hmac[..].ct_eq(&[0u8; HMAC_SIZE][..]).unwrap_u8() == 1 {
        debug!("unwrapped final onion layer");
        return Ok(PeeledOnion {
            hop_payload,
            next: NextHop::Exit,
            replay_tag,
        });
    }

    let mut ephemeral_key = packet.ephemeral_key;
    ephemeral_key.blind(&blinding_factor(&packet.ephemeral_key.to_bytes(), &keys.shared_secret))?;
    let next_packet = OnionPacket {
        version: PACKET_VERSION,
        ephemeral_key,
        hop_payload: next_routing_info,
        hmac: next_hmac,
    };
    debug!("unwrapped onion layer, forwarding");
    Ok(PeeledOnion {
        hop_payload,
        next: NextHop::Forward(next_packet),
        replay_tag,
    })
}
