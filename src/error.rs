// error.rs - onion packet error types
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

use thiserror::Error;

use super::constants::{MAX_HOPS, PACKET_SIZE};

/// Errors produced by the curve key wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("private key is not a valid nonzero scalar below the curve order")]
    InvalidPrivateKey,
    #[error("public key is not a valid compressed curve point")]
    InvalidPublicKey,
    #[error("blinding factor is not a usable scalar")]
    InvalidBlindingFactor,
}

/// Errors that abort onion packet construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OnionBuildError {
    #[error("route length {0} is invalid, must be between 1 and {max}", max = MAX_HOPS)]
    InvalidRouteLength(usize),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(#[from] KeyError),
}

/// Errors decoding the flat byte form of an onion packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OnionDecodeError {
    #[error("onion packet must be {expected} bytes, got {0}", expected = PACKET_SIZE)]
    InvalidLength(usize),
    #[error("unknown onion packet version {0}")]
    UnknownVersion(u8),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(#[from] KeyError),
}

/// Errors a relay hits while unwrapping a layer. Any of these means
/// the packet MUST be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OnionPeelError {
    #[error("unknown onion packet version {0}")]
    UnknownVersion(u8),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(#[from] KeyError),
    #[error("message authentication code did not match")]
    AuthenticationFailed,
    #[error("onion packet was already processed")]
    ReplayDetected,
}
