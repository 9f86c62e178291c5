//! Reed-Solomon error-correction codewords over GF(256).

use std::sync::OnceLock;

use super::galois;

/// Largest EC codeword count any block uses.
pub const MAX_DEGREE: usize = 30;

/// The generator polynomial product of (x - 2^i) for i in 0..degree.
///
/// Coefficients run from highest to lowest power; the leading 1 is implied.
pub(crate) struct Generator {
    divisor: Vec<u8>,
}

impl Generator {
    fn new(degree: usize) -> Self {
        assert!((1..=MAX_DEGREE).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        for i in 0..degree {
            let root = galois::exp2(i);
            for j in 0..degree {
                divisor[j] = galois::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
        }
        Self { divisor }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Remainder of data(x) * x^degree divided by this generator.
    pub fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.degree()];
        for &b in data {
            let factor = b ^ result[0];
            result.copy_within(1.., 0);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= galois::multiply(y, factor);
            }
        }
        result
    }
}

static GENERATORS: OnceLock<Vec<Generator>> = OnceLock::new();

/// Cached generator for the given degree, built once for every degree 1..=30.
pub(crate) fn generator(degree: usize) -> &'static Generator {
    let all = GENERATORS.get_or_init(|| (1..=MAX_DEGREE).map(Generator::new).collect());
    &all[degree - 1]
}

/// Computes `num_ec` error-correction codewords for one block of data codewords.
///
/// # Panics
///
/// Panics if `num_ec` is outside 1..=30; the capacity tables never ask for that.
pub fn ec_codewords(data: &[u8], num_ec: usize) -> Vec<u8> {
    assert!((1..=MAX_DEGREE).contains(&num_ec), "EC codeword count out of range");
    generator(num_ec).remainder(data)
}
