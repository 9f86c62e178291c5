//! Arithmetic in GF(256) over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.

use std::sync::OnceLock;

/// The field polynomial, including the x^8 term.
const PRIMITIVE: u16 = 0x11d;

/// Log and antilog tables for the generator element 2.
pub(crate) struct Tables {
    /// `log[a]` is the exponent e with 2^e = a. `log[0]` is unused.
    pub log: [u8; 256],
    /// `antilog[e]` is 2^e. Index 255 wraps back to 1.
    pub antilog: [u8; 256],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

pub(crate) fn tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let mut log = [0u8; 256];
        let mut antilog = [0u8; 256];
        let mut x: u16 = 1;
        for e in 0..256 {
            antilog[e] = x as u8;
            if e < 255 {
                log[x as usize] = e as u8;
            }
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIMITIVE;
            }
        }
        Tables { log, antilog }
    })
}

/// Multiplies two field elements.
pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    let e = (usize::from(t.log[usize::from(a)]) + usize::from(t.log[usize::from(b)])) % 255;
    t.antilog[e]
}

/// Returns 2^e.
pub fn exp2(e: usize) -> u8 {
    tables().antilog[e % 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shift-and-add multiply, independent of the tables.
    fn slow_multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }

    #[test]
    fn test_tables_are_inverse() {
        let t = tables();
        for a in 1..=255u8 {
            assert_eq!(t.antilog[usize::from(t.log[usize::from(a)])], a);
        }
        assert_eq!(t.antilog[0], 1);
        assert_eq!(t.antilog[255], 1);
        assert_eq!(t.antilog[8], 0x1d);
    }

    #[test]
    fn test_multiply_matches_shift_and_add() {
        for a in 0..=255u8 {
            for b in (0..=255u8).step_by(7) {
                assert_eq!(multiply(a, b), slow_multiply(a, b), "{} * {}", a, b);
            }
        }
    }

    #[test]
    fn test_multiply_by_zero_and_one() {
        assert_eq!(multiply(0, 0x53), 0);
        assert_eq!(multiply(0x53, 0), 0);
        assert_eq!(multiply(1, 0x53), 0x53);
        assert_eq!(exp2(255), 1);
        assert_eq!(exp2(1), 2);
    }
}
