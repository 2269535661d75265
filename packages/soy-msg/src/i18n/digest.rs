//! Digest Module
//!
//! Computes message ids. The fingerprint is shared with the other Soy
//! implementations and extraction tools, so ids must match bit for bit.

/// Compute the fingerprint of the given bytes.
///
/// Two 32-bit hashes with different seeds make up the high and low words.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hi = hash32(bytes, 0);
    let mut lo = hash32(bytes, 102072);

    if hi == 0 && (lo == 0 || lo == 1) {
        // Turn 0/1 into another fingerprint
        hi ^= 0x130f9bef;
        lo ^= 0x94a0a928;
    }

    ((hi as u64) << 32) | (lo as u64)
}

/// Compute the id of a message from its id string and optional meaning.
pub fn compute_msg_id(content: &str, meaning: &str) -> u64 {
    let mut msg_fingerprint = fingerprint(content.as_bytes());

    if !meaning.is_empty() {
        // Rotate the 64-bit message fingerprint one bit to the left and then add the meaning
        // fingerprint.
        msg_fingerprint = (msg_fingerprint << 1) | (msg_fingerprint >> 63);
        msg_fingerprint = msg_fingerprint.wrapping_add(fingerprint(meaning.as_bytes()));
    }

    msg_fingerprint & 0x7FFF_FFFF_FFFF_FFFF
}

fn hash32(bytes: &[u8], mut c: u32) -> u32 {
    let mut a = 0x9e3779b9u32;
    let mut b = 0x9e3779b9u32;

    let mut blocks = bytes.chunks_exact(12);
    for block in &mut blocks {
        a = a.wrapping_add(read_u32_le(&block[0..4]));
        b = b.wrapping_add(read_u32_le(&block[4..8]));
        c = c.wrapping_add(read_u32_le(&block[8..12]));
        (a, b, c) = mix(a, b, c);
    }

    c = c.wrapping_add(bytes.len() as u32);

    // The low byte of c is taken by the length, so the tail fills c from bit 8.
    for (i, &byte) in blocks.remainder().iter().enumerate() {
        let byte = byte as u32;
        match i {
            0..=3 => a = a.wrapping_add(byte << (8 * i)),
            4..=7 => b = b.wrapping_add(byte << (8 * (i - 4))),
            _ => c = c.wrapping_add(byte << (8 * (i - 7))),
        }
    }

    mix(a, b, c).2
}

fn mix(mut a: u32, mut b: u32, mut c: u32) -> (u32, u32, u32) {
    a = a.wrapping_sub(b);
    a = a.wrapping_sub(c);
    a ^= c >> 13;
    b = b.wrapping_sub(c);
    b = b.wrapping_sub(a);
    b ^= a << 8;
    c = c.wrapping_sub(a);
    c = c.wrapping_sub(b);
    c ^= b >> 13;
    a = a.wrapping_sub(b);
    a = a.wrapping_sub(c);
    a ^= c >> 12;
    b = b.wrapping_sub(c);
    b = b.wrapping_sub(a);
    b ^= a << 16;
    c = c.wrapping_sub(a);
    c = c.wrapping_sub(b);
    c ^= b >> 5;
    a = a.wrapping_sub(b);
    a = a.wrapping_sub(c);
    a ^= c >> 3;
    b = b.wrapping_sub(c);
    b = b.wrapping_sub(a);
    b ^= a << 10;
    c = c.wrapping_sub(a);
    c = c.wrapping_sub(b);
    c ^= b >> 15;
    (a, b, c)
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_lengths_differ() {
        // every tail length from 0 to 11 takes a different branch
        let input = b"abcdefghijklmnopqrstuvw";
        let mut seen = std::collections::HashSet::new();
        for len in 0..input.len() {
            assert!(seen.insert(fingerprint(&input[..len])));
        }
    }

    #[test]
    fn test_meaning_changes_id() {
        assert_ne!(compute_msg_id("Archive", ""), compute_msg_id("Archive", "noun"));
        assert_eq!(compute_msg_id("Archive", ""), compute_msg_id("Archive", ""));
    }

    #[test]
    fn test_top_bit_is_cleared() {
        for s in ["", "a", "Help", "The set of SET_NAME is {XXX, ...}."] {
            assert_eq!(compute_msg_id(s, "m") >> 63, 0);
            assert_eq!(compute_msg_id(s, "") >> 63, 0);
        }
    }
}
