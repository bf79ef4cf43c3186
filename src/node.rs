// node.rs - onion relay node state
// Copyright 2016 Jeffrey Burdges and David Stainton
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

//! Onion relay node state

use std::collections::HashSet;

use tracing::warn;

use super::ecdh::{PrivateKey, PublicKey};
use super::error::OnionPeelError;
use super::packet::OnionPacket;
use super::server::{onion_packet_unwrap, PeeledOnion};

/// This trait is used to detect packet replay attacks. A unique
/// tag for each packet is remembered and if ever seen again implies a
/// replay attack. Note that we can flush our cache upon node key
/// rotation.
pub trait ReplayCache {
    /// returns true if we've seen a given tag before
    /// # Arguments
    /// * `tag` - a 32 byte value
    fn check(&self, tag: &[u8; 32]) -> bool;

    /// record a tag in our cache so that future calls with `check`
    /// will return true for that tag
    fn set(&mut self, tag: [u8; 32]);

    /// flush our cache of tags
    fn flush(&mut self);
}

/// VolatileReplayCache is used to detect replay attacks
/// with a volatile cache, a HashSet. No disk persistence is used here.
#[derive(Debug, Default)]
pub struct VolatileReplayCache {
    tags: HashSet<[u8; 32]>,
}

impl VolatileReplayCache {
    pub fn new() -> VolatileReplayCache {
        VolatileReplayCache::default()
    }
}

impl ReplayCache for VolatileReplayCache {
    fn check(&self, tag: &[u8; 32]) -> bool {
        self.tags.contains(tag)
    }

    fn set(&mut self, tag: [u8; 32]) {
        self.tags.insert(tag);
    }

    fn flush(&mut self) {
        self.tags.clear();
    }
}

/// A relay's key material and replay state.
pub struct OnionRelay<C: ReplayCache> {
    private_key: PrivateKey,
    replay_cache: C,
}

impl<C: ReplayCache> OnionRelay<C> {
    pub fn new(private_key: PrivateKey, replay_cache: C) -> OnionRelay<C> {
        OnionRelay {
            private_key,
            replay_cache,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// Unwrap a packet and remember it. A packet whose shared secret
    /// has been seen before is rejected even if it authenticates.
    pub fn process(
        &mut self,
        packet: &OnionPacket,
        associated_data: &[u8],
    ) -> Result<PeeledOnion, OnionPeelError> {
        let peeled = onion_packet_unwrap(&self.private_key, packet, associated_data)?;
        if self.replay_cache.check(&peeled.replay_tag) {
            warn!("onion packet replay detected, dropping packet");
            return Err(OnionPeelError::ReplayDetected);
        }
        self.replay_cache.set(peeled.replay_tag);
        Ok(peeled)
    }

    /// Replace the node key, forgetting every tag seen under the old one.
    pub fn rotate(&mut self, private_key: PrivateKey) {
        self.private_key = private_key;
        self.replay_cache.flush();
    }
}
