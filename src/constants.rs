// constants.rs - onion packet format constants
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

/// The maximum number of hops a packet will traverse.
pub const MAX_HOPS: usize = 20;

/// The only packet version this library understands.
pub const PACKET_VERSION: u8 = 0;

/// The size of the version field in bytes.
pub const VERSION_SIZE: usize = 1;

/// The size of a compressed secp256k1 point in bytes.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// The size of a secp256k1 scalar in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// The size of a shared secret in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// The size of an HMAC-SHA256 tag in bytes.
pub const HMAC_SIZE: usize = 32;

/// The realm byte of the only per hop payload format defined.
pub const REALM_BITCOIN: u8 = 0;

/// The size of the short channel id field.
pub const SHORT_CHANNEL_ID_SIZE: usize = 8;

/// The size of the reserved padding at the end of a hop payload.
pub const HOP_PADDING_SIZE: usize = 12;

/// The size of a serialized per hop payload:
/// realm + short channel id + amount + cltv + padding.
pub const HOP_PAYLOAD_SIZE: usize = 1 + SHORT_CHANNEL_ID_SIZE + 8 + 4 + HOP_PADDING_SIZE;

/// The size each hop occupies in the routing info, its payload
/// followed by the HMAC of the next hop.
pub const HOP_DATA_SIZE: usize = HOP_PAYLOAD_SIZE + HMAC_SIZE;

/// The size in bytes of the routing info section of the packet.
pub const ROUTING_INFO_SIZE: usize = HOP_DATA_SIZE * MAX_HOPS;

/// The number of keystream bytes a relay needs to unwrap one layer.
pub const STREAM_SIZE: usize = ROUTING_INFO_SIZE + HOP_DATA_SIZE;

/// The size of an onion packet in bytes.
pub const PACKET_SIZE: usize = VERSION_SIZE + PUBLIC_KEY_SIZE + ROUTING_INFO_SIZE + HMAC_SIZE;
