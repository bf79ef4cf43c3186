// utils.rs - onion packet utility functions
// Copyright (C) 2018  David Anthony Stainton and Jeffrey Burdges.
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

/// xor `b` into `a`, both slices must be the same length
pub fn xor_assign(a: &mut [u8], b: &[u8]) {
    debug_assert_eq!(a.len(), b.len());
    for (a_i, &b_i) in a.iter_mut().zip(b.iter()) {
        *a_i ^= b_i;
    }
}

/// shift `buf` right by `n` bytes, dropping its tail and
/// zeroing the freed front
pub fn shift_right(buf: &mut [u8], n: usize) {
    let len = buf.len();
    buf.copy_within(..len - n, n);
    for b in buf[..n].iter_mut() {
        *b = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_assign_test() {
        let mut a = [0x0fu8, 0xf0, 0xaa];
        xor_assign(&mut a, &[0xff, 0xff, 0xaa]);
        assert_eq!(a, [0xf0, 0x0f, 0x00]);
    }

    #[test]
    fn shift_right_test() {
        let mut buf = [1u8, 2, 3, 4, 5];
        shift_right(&mut buf, 2);
        assert_eq!(buf, [0, 0, 1, 2, 3]);
    }
}
