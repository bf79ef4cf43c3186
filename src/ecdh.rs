// ecdh.rs - wrapping library for secp256k1 dh operations
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

use std::fmt;

use rand_core::{CryptoRng, RngCore};
use secp256k1::ecdh::SharedSecret;
use secp256k1::{Scalar, SecretKey, SECP256K1};
use zeroize::Zeroize;

use super::constants::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SHARED_SECRET_SIZE};
use super::error::KeyError;

fn blinding_scalar(blinding_factor: &[u8; SHARED_SECRET_SIZE]) -> Result<Scalar, KeyError> {
    Scalar::from_be_bytes(*blinding_factor).map_err(|_| KeyError::InvalidBlindingFactor)
}

/// A compressed secp256k1 point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key: secp256k1::PublicKey,
}

impl PublicKey {
    /// parse a 33 byte compressed point
    pub fn from_bytes(b: &[u8]) -> Result<PublicKey, KeyError> {
        if b.len() != PUBLIC_KEY_SIZE {
            return Err(KeyError::InvalidPublicKey);
        }
        let key = secp256k1::PublicKey::from_slice(b).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(PublicKey { key })
    }

    /// serialize in compressed form
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.key.serialize()
    }

    /// Multiply this point by the blinding factor.
    pub fn blind(&mut self, blinding_factor: &[u8; SHARED_SECRET_SIZE]) -> Result<(), KeyError> {
        let tweak = blinding_scalar(blinding_factor)?;
        self.key = self
            .key
            .mul_tweak(SECP256K1, &tweak)
            .map_err(|_| KeyError::InvalidBlindingFactor)?;
        Ok(())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKey(")?;
        for b in self.to_bytes().iter() {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// A secp256k1 scalar together with its public point.
#[derive(Clone)]
pub struct PrivateKey {
    public_key: PublicKey,
    secret: SecretKey,
}

impl PrivateKey {
    /// draw a fresh private key from `rng`
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<PrivateKey, KeyError> {
        let mut raw_key = [0u8; PRIVATE_KEY_SIZE];
        // a uniform draw lands outside the curve order with negligible probability
        for _ in 0..8 {
            rng.fill_bytes(&mut raw_key);
            let key = PrivateKey::from_bytes(&raw_key);
            raw_key.zeroize();
            if key.is_ok() {
                return key;
            }
        }
        Err(KeyError::InvalidPrivateKey)
    }

    /// parse a 32 byte big endian scalar
    pub fn from_bytes(b: &[u8]) -> Result<PrivateKey, KeyError> {
        if b.len() != PRIVATE_KEY_SIZE {
            return Err(KeyError::InvalidPrivateKey);
        }
        let secret = SecretKey::from_slice(b).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(PrivateKey::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> PrivateKey {
        PrivateKey {
            public_key: PublicKey {
                key: secp256k1::PublicKey::from_secret_key_global(&secret),
            },
            secret,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.secret.secret_bytes()
    }

    /// Exp calculates the shared secret with the provided public key,
    /// the SHA256 of the compressed ECDH point.
    pub fn exp(&self, public_key: &PublicKey) -> [u8; SHARED_SECRET_SIZE] {
        SharedSecret::new(&public_key.key, &self.secret).secret_bytes()
    }

    /// Multiply this scalar by the blinding factor, mod the group order.
    pub fn blind(&self, blinding_factor: &[u8; SHARED_SECRET_SIZE]) -> Result<PrivateKey, KeyError> {
        let tweak = blinding_scalar(blinding_factor)?;
        let secret = self
            .secret
            .mul_tweak(&tweak)
            .map_err(|_| KeyError::InvalidBlindingFactor)?;
        Ok(PrivateKey::from_secret(secret))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}
