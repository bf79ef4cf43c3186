// internal_crypto.rs - onion packet crypto primitives
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

use chacha20::cipher::{KeyIvInit, StreamCipher as _};
use chacha20::{ChaCha20, Key, Nonce};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::constants::{HMAC_SIZE, PUBLIC_KEY_SIZE, SHARED_SECRET_SIZE};

type HmacSha256 = Hmac<Sha256>;

pub const HASH_SIZE: usize = 32;
pub const STREAM_KEY_SIZE: usize = 32;
pub const STREAM_IV_SIZE: usize = 12;

/// key derivation labels
pub const KEY_RHO: &[u8] = b"rho";
pub const KEY_MU: &[u8] = b"mu";
pub const KEY_PAD: &[u8] = b"pad";

const STREAM_IV: [u8; STREAM_IV_SIZE] = [0u8; STREAM_IV_SIZE];

/// stream cipher for onion crypto usage, ChaCha20 with a zero nonce
pub struct StreamCipher {
    cipher: ChaCha20,
}

impl StreamCipher {
    /// create a new StreamCipher struct
    pub fn new(key: &[u8; STREAM_KEY_SIZE]) -> StreamCipher {
        StreamCipher {
            cipher: ChaCha20::new(Key::from_slice(key), Nonce::from_slice(&STREAM_IV)),
        }
    }

    /// return the next n bytes of the cipher stream
    pub fn generate(&mut self, n: usize) -> Vec<u8> {
        let mut output = vec![0u8; n];
        self.cipher.apply_keystream(&mut output);
        output
    }

    /// xor the next data.len() bytes of the cipher stream into data
    pub fn xor_key_stream(&mut self, data: &mut [u8]) {
        self.cipher.apply_keystream(data);
    }
}

pub fn hash(input: &[u8]) -> [u8; HASH_SIZE] {
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&Sha256::digest(input));
    out
}

/// HMAC-SHA256 over the concatenation of `data`
pub fn hmac(key: &[u8], data: &[&[u8]]) -> [u8; HMAC_SIZE] {
    let mut m = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    for d in data {
        m.update(d);
    }
    let mut out = [0u8; HMAC_SIZE];
    out.copy_from_slice(&m.finalize().into_bytes());
    out
}

/// derive a purpose specific key from a secret, keyed by its label
pub fn generate_key(label: &[u8], secret: &[u8; SHARED_SECRET_SIZE]) -> [u8; STREAM_KEY_SIZE] {
    hmac(label, &[secret])
}

/// blinding factor for the next ephemeral key in the chain
pub fn blinding_factor(
    ephemeral_key: &[u8; PUBLIC_KEY_SIZE],
    shared_secret: &[u8; SHARED_SECRET_SIZE],
) -> [u8; HASH_SIZE] {
    let mut h = Sha256::new();
    h.update(ephemeral_key);
    h.update(shared_secret);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&h.finalize());
    out
}

/// The keys one hop's layer is processed with.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HopKeys {
    pub shared_secret: [u8; SHARED_SECRET_SIZE],
    /// routing info obfuscation and filler stream key
    pub rho: [u8; STREAM_KEY_SIZE],
    /// routing info HMAC key
    pub mu: [u8; STREAM_KEY_SIZE],
}

impl HopKeys {
    pub fn derive(shared_secret: &[u8; SHARED_SECRET_SIZE]) -> HopKeys {
        HopKeys {
            shared_secret: *shared_secret,
            rho: generate_key(KEY_RHO, shared_secret),
            mu: generate_key(KEY_MU, shared_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate hex;
    use super::*;

    #[test]
    fn chacha20_test() {
        // RFC 7539 section 2.3.2 keystream with the zero nonce and counter
        let mut cipher = StreamCipher::new(&[0u8; 32]);
        let stream = cipher.generate(32);
        assert_eq!(
            hex::encode(&stream),
            "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7"
        );
    }

    #[test]
    fn stream_continues_test() {
        let key = [0x42u8; 32];
        let whole = StreamCipher::new(&key).generate(100);
        let mut cipher = StreamCipher::new(&key);
        let mut parts = cipher.generate(40);
        parts.extend(cipher.generate(60));
        assert_eq!(whole, parts);

        let mut data = vec![0u8; 100];
        StreamCipher::new(&key).xor_key_stream(&mut data);
        assert_eq!(data, whole);
    }

    #[test]
    fn hmac_test() {
        // RFC 4231 test case 2
        let mac = hmac(b"Jefe", &[b"what do ya want ", b"for nothing?"]);
        assert_eq!(
            hex::encode(&mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn generate_key_labels_test() {
        let secret = [0x53u8; 32];
        let keys = HopKeys::derive(&secret);
        assert_ne!(keys.rho, keys.mu);
        assert_eq!(keys.rho, hmac(b"rho", &[&secret]));
        assert_eq!(generate_key(KEY_PAD, &secret), hmac(b"pad", &[&secret]));
    }

    #[test]
    fn hash_test() {
        assert_eq!(
            hex::encode(&hash(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
