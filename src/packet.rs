// packet.rs - onion packet wire format
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

use super::constants::{
    HMAC_SIZE, PACKET_SIZE, PACKET_VERSION, PUBLIC_KEY_SIZE, ROUTING_INFO_SIZE, VERSION_SIZE,
};
use super::ecdh::PublicKey;
use super::error::OnionDecodeError;

/// OnionPacket represents a decoded onion packet:
///
/// version(1) || ephemeral_key(33) || hop_payload(1300) || hmac(32)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnionPacket {
    pub version: u8,
    /// the ephemeral key the addressed hop derives its shared secret from
    pub ephemeral_key: PublicKey,
    /// encrypted and padded routing information
    pub hop_payload: [u8; ROUTING_INFO_SIZE],
    /// HMAC of the routing information and associated data
    pub hmac: [u8; HMAC_SIZE],
}

impl OnionPacket {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACKET_SIZE);
        out.push(self.version);
        out.extend_from_slice(&self.ephemeral_key.to_bytes());
        out.extend_from_slice(&self.hop_payload);
        out.extend_from_slice(&self.hmac);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<OnionPacket, OnionDecodeError> {
        if b.len() != PACKET_SIZE {
            return Err(OnionDecodeError::InvalidLength(b.len()));
        }
        let raw = array_ref![b, 0, PACKET_SIZE];
        let (version, ephemeral_key, hop_payload, hmac) =
            array_refs![raw, VERSION_SIZE, PUBLIC_KEY_SIZE, ROUTING_INFO_SIZE, HMAC_SIZE];
        if version[0] != PACKET_VERSION {
            return Err(OnionDecodeError::UnknownVersion(version[0]));
        }
        Ok(OnionPacket {
            version: version[0],
            ephemeral_key: PublicKey::from_bytes(ephemeral_key)?,
            hop_payload: *hop_payload,
            hmac: *hmac,
        })
    }
}
