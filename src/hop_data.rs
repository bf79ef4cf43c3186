// hop_data.rs - per hop routing instructions
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

use byteorder::{BigEndian, ByteOrder};

use super::constants::{
    HOP_PADDING_SIZE, HOP_PAYLOAD_SIZE, REALM_BITCOIN, SHORT_CHANNEL_ID_SIZE,
};
use super::ecdh::PublicKey;

/// The plaintext instructions a single hop decrypts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HopPayload {
    /// payload format discriminator
    pub realm: u8,
    /// the channel to forward over
    pub short_channel_id: [u8; SHORT_CHANNEL_ID_SIZE],
    /// amount to forward in millisatoshi
    pub amt_to_forward: u64,
    /// absolute block height the outgoing HTLC expires at
    pub outgoing_cltv_value: u32,
    /// reserved, normally zero
    pub padding: [u8; HOP_PADDING_SIZE],
}

impl HopPayload {
    pub fn new(
        short_channel_id: [u8; SHORT_CHANNEL_ID_SIZE],
        amt_to_forward: u64,
        outgoing_cltv_value: u32,
        padding: [u8; HOP_PADDING_SIZE],
    ) -> HopPayload {
        HopPayload {
            realm: REALM_BITCOIN,
            short_channel_id,
            amt_to_forward,
            outgoing_cltv_value,
            padding,
        }
    }

    pub fn to_bytes(&self) -> [u8; HOP_PAYLOAD_SIZE] {
        let mut out = [0u8; HOP_PAYLOAD_SIZE];
        {
            let (realm, short_channel_id, amt, cltv, padding) =
                mut_array_refs![&mut out, 1, SHORT_CHANNEL_ID_SIZE, 8, 4, HOP_PADDING_SIZE];
            realm[0] = self.realm;
            short_channel_id.copy_from_slice(&self.short_channel_id);
            BigEndian::write_u64(amt, self.amt_to_forward);
            BigEndian::write_u32(cltv, self.outgoing_cltv_value);
            padding.copy_from_slice(&self.padding);
        }
        out
    }

    pub fn from_bytes(b: &[u8; HOP_PAYLOAD_SIZE]) -> HopPayload {
        let (realm, short_channel_id, amt, cltv, padding) =
            array_refs![b, 1, SHORT_CHANNEL_ID_SIZE, 8, 4, HOP_PADDING_SIZE];
        HopPayload {
            realm: realm[0],
            short_channel_id: *short_channel_id,
            amt_to_forward: BigEndian::read_u64(amt),
            outgoing_cltv_value: BigEndian::read_u32(cltv),
            padding: *padding,
        }
    }
}

/// A hop of the route: who the layer is encrypted to, and what it says.
/// The identity never appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerHopData {
    pub hop_identity: PublicKey,
    pub payload: HopPayload,
}

impl PerHopData {
    pub fn new(hop_identity: PublicKey, payload: HopPayload) -> PerHopData {
        PerHopData {
            hop_identity,
            payload,
        }
    }
}
