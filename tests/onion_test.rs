// onion_test.rs - onion packet format tests
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

extern crate lnsphinx;
extern crate rand;
extern crate tracing_subscriber;

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use lnsphinx::constants::{MAX_HOPS, PACKET_SIZE, ROUTING_INFO_SIZE};
use lnsphinx::{
    new_packet, HeaderFill, HopPayload, NextHop, OnionBuildError, OnionPacket,
    OnionPacketBuilder, OnionPeelError, OnionRelay, PerHopData, PrivateKey, VolatileReplayCache,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn new_relay() -> OnionRelay<VolatileReplayCache> {
    OnionRelay::new(PrivateKey::generate(&mut OsRng).unwrap(), VolatileReplayCache::new())
}

fn new_route<R: Rng>(rng: &mut R, num_hops: usize) -> (Vec<OnionRelay<VolatileReplayCache>>, Vec<PerHopData>) {
    let relays: Vec<_> = (0..num_hops).map(|_| new_relay()).collect();
    let route = relays
        .iter()
        .map(|relay| {
            let mut short_channel_id = [0u8; 8];
            rng.fill_bytes(&mut short_channel_id);
            let payload = HopPayload::new(short_channel_id, rng.gen(), rng.gen(), [0u8; 12]);
            PerHopData::new(relay.public_key(), payload)
        })
        .collect();
    (relays, route)
}

fn session_key() -> PrivateKey {
    PrivateKey::generate(&mut OsRng).unwrap()
}

#[test]
fn onion_forward_test() {
    init_logging();
    let mut rng = rand::thread_rng();
    let associated_data = [0x42u8; 32];

    for &header_fill in &[HeaderFill::SessionKeyed, HeaderFill::Zeroed] {
        for num_hops in 1..=MAX_HOPS {
            let (mut relays, route) = new_route(&mut rng, num_hops);
            let onion = OnionPacketBuilder::new(session_key(), route.clone())
                .associated_data(&associated_data)
                .header_fill(header_fill)
                .build()
                .unwrap();
            assert_eq!(onion.hops_data, route);

            // every relay sees a full size packet off the wire
            let mut raw = onion.to_bytes();
            for (i, relay) in relays.iter_mut().enumerate() {
                assert_eq!(raw.len(), PACKET_SIZE);
                let packet = OnionPacket::from_bytes(&raw).unwrap();
                let peeled = relay.process(&packet, &associated_data).unwrap();
                assert_eq!(peeled.hop_payload, route[i].payload);
                match peeled.next {
                    NextHop::Forward(next) => {
                        assert!(i < num_hops - 1, "hop {} of {} asked to forward", i, num_hops);
                        raw = next.to_bytes();
                    }
                    NextHop::Exit => assert_eq!(i, num_hops - 1),
                }
            }
        }
    }
}

#[test]
fn route_length_bounds_test() {
    let mut rng = rand::thread_rng();

    let err = OnionPacketBuilder::new(session_key(), vec![]).build().unwrap_err();
    assert_eq!(err, OnionBuildError::InvalidRouteLength(0));

    let (_, route) = new_route(&mut rng, MAX_HOPS + 1);
    let err = OnionPacketBuilder::new(session_key(), route.clone()).build().unwrap_err();
    assert_eq!(err, OnionBuildError::InvalidRouteLength(MAX_HOPS + 1));
    let err = new_packet(&mut OsRng, route, &[]).unwrap_err();
    assert_eq!(err, OnionBuildError::InvalidRouteLength(MAX_HOPS + 1));

    let (_, route) = new_route(&mut rng, MAX_HOPS);
    assert!(OnionPacketBuilder::new(session_key(), route).build().is_ok());
}

#[test]
fn deterministic_build_test() {
    let mut rng = rand::thread_rng();
    let (_, route) = new_route(&mut rng, 5);
    let builder = OnionPacketBuilder::new(session_key(), route).associated_data(b"payment hash");
    assert_eq!(builder.build().unwrap(), builder.build().unwrap());
}

#[test]
fn length_independent_of_hops_test() {
    let mut rng = rand::thread_rng();
    let (_, short_route) = new_route(&mut rng, 1);
    let (_, long_route) = new_route(&mut rng, MAX_HOPS);
    let short = new_packet(&mut OsRng, short_route, &[]).unwrap().to_bytes();
    let long = new_packet(&mut OsRng, long_route, &[]).unwrap().to_bytes();
    assert_eq!(short.len(), PACKET_SIZE);
    assert_eq!(long.len(), PACKET_SIZE);

    // no long zero runs betraying unused routing capacity
    for raw in &[short, long] {
        let zeros = raw[34..34 + ROUTING_INFO_SIZE].iter().filter(|&&b| b == 0).count();
        assert!(zeros < ROUTING_INFO_SIZE / 32, "{} zero bytes in routing info", zeros);
    }
}

#[test]
fn hmac_binding_test() {
    let mut rng = rand::thread_rng();
    let (_, route) = new_route(&mut rng, 3);
    let key = session_key();
    let base = OnionPacketBuilder::new(key.clone(), route.clone())
        .associated_data(&[0x42; 32])
        .build()
        .unwrap()
        .packet
        .hmac;

    let mut associated_data = [0x42u8; 32];
    associated_data[31] ^= 1;
    let changed = OnionPacketBuilder::new(key.clone(), route.clone())
        .associated_data(&associated_data)
        .build()
        .unwrap();
    assert_ne!(changed.packet.hmac, base);

    let mut altered_route = route.clone();
    altered_route[2].payload.amt_to_forward ^= 1;
    let changed = OnionPacketBuilder::new(key, altered_route)
        .associated_data(&[0x42; 32])
        .build()
        .unwrap();
    assert_ne!(changed.packet.hmac, base);

    let changed = OnionPacketBuilder::new(session_key(), route)
        .associated_data(&[0x42; 32])
        .build()
        .unwrap();
    assert_ne!(changed.packet.hmac, base);
}

#[test]
fn tampered_packet_test() {
    init_logging();
    let mut rng = rand::thread_rng();
    let (mut relays, route) = new_route(&mut rng, 4);
    let onion = new_packet(&mut OsRng, route, &[]).unwrap();

    let mut raw = onion.to_bytes();
    raw[100] ^= 0x01;
    let packet = OnionPacket::from_bytes(&raw).unwrap();
    assert_eq!(
        relays[0].process(&packet, &[]).unwrap_err(),
        OnionPeelError::AuthenticationFailed
    );

    // a second hop handed the first hop's layer cannot authenticate it
    assert_eq!(
        relays[1].process(&onion.packet, &[]).unwrap_err(),
        OnionPeelError::AuthenticationFailed
    );
}

#[test]
fn replayed_packet_test() {
    let mut rng = rand::thread_rng();
    let (mut relays, route) = new_route(&mut rng, 2);
    let onion = new_packet(&mut OsRng, route, b"ad").unwrap();

    assert!(relays[0].process(&onion.packet, b"ad").is_ok());
    assert_eq!(
        relays[0].process(&onion.packet, b"ad").unwrap_err(),
        OnionPeelError::ReplayDetected
    );
}
