//! GF(256) arithmetic and the Euclidean Reed-Solomon block decoder
//!
//! QR codes use RS over GF(256) with primitive polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) and generator roots starting at alpha^0.

use thiserror::Error;

/// Why a Reed-Solomon block failed to correct
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RsError {
    /// An accelerator handle was used before a backend was installed
    #[error("accelerated backend not initialized")]
    NotReady,
    /// The error pattern exceeds the block's correction capacity
    #[error("error count exceeds correction capacity")]
    TooManyErrors,
    /// The Euclidean algorithm hit a degenerate step
    #[error("degenerate error locator polynomial")]
    DegenerateLocator,
    /// A corrected position fell outside the codeword block
    #[error("error position outside codeword block")]
    BadErrorPosition,
}

/// Block-level Reed-Solomon decode capability.
///
/// `codewords` is one whole block, data followed by `num_ec` error correction
/// codewords. A successful decode returns the corrected block, same length as
/// the input. Implementations must be observationally identical to
/// [`EuclideanRs`]; the seam exists so an accelerated decoder can be swapped in.
pub trait RsBackend {
    /// Correct one codeword block in place of the reference algorithm
    fn rs_decode(&self, codewords: &[u8], num_ec: usize) -> Result<Vec<u8>, RsError>;
}

/// Handle for an optional accelerated backend.
///
/// Starts out empty; using it before [`RsAccelerator::install`] reports
/// [`RsError::NotReady`] instead of silently falling back.
#[derive(Default)]
pub struct RsAccelerator {
    backend: Option<Box<dyn RsBackend + Send + Sync>>,
}

impl RsAccelerator {
    /// An empty handle with no backend installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a backend, making the handle usable
    pub fn install(&mut self, backend: Box<dyn RsBackend + Send + Sync>) {
        self.backend = Some(backend);
    }

    /// Whether a backend has been installed
    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }
}

impl RsBackend for RsAccelerator {
    fn rs_decode(&self, codewords: &[u8], num_ec: usize) -> Result<Vec<u8>, RsError> {
        match &self.backend {
            Some(backend) => backend.rs_decode(codewords, num_ec),
            None => Err(RsError::NotReady),
        }
    }
}

static LOG_TABLE: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static EXP_TABLE: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

/// GF(256) field operations backed by log/exp tables
pub struct Gf256;

impl Gf256 {
    /// Field multiplication
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// Field division; panics on a zero divisor, which callers must rule out
    pub fn div(a: u8, b: u8) -> u8 {
        if b == 0 {
            panic!("division by zero in GF(256)");
        }
        if a == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + 255 - log_b) % 255]
    }

    /// Multiplicative inverse; panics on zero
    pub fn inv(a: u8) -> u8 {
        Self::div(1, a)
    }

    /// alpha raised to `n`
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// Discrete log of a nonzero element
    pub fn log(a: u8) -> usize {
        debug_assert_ne!(a, 0);
        LOG_TABLE[a as usize] as usize
    }

    /// `a` raised to `n`
    pub fn pow(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        EXP_TABLE[(LOG_TABLE[a as usize] as usize * (n % 255)) % 255]
    }
}

/// Polynomial over GF(256), coefficients highest degree first
#[derive(Debug, Clone, PartialEq, Eq)]
struct Poly {
    coefficients: Vec<u8>,
}

impl Poly {
    fn new(coefficients: Vec<u8>) -> Self {
        // Strip leading zeros; the zero polynomial keeps one coefficient.
        let first_nonzero = coefficients.iter().position(|&c| c != 0);
        match first_nonzero {
            Some(0) => Self { coefficients },
            Some(i) => Self {
                coefficients: coefficients[i..].to_vec(),
            },
            None => Self {
                coefficients: vec![0],
            },
        }
    }

    fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    fn monomial(degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Self { coefficients }
    }

    fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of the x^degree term
    fn coefficient(&self, degree: usize) -> u8 {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    fn evaluate_at(&self, x: u8) -> u8 {
        if x == 0 {
            return self.coefficient(0);
        }
        let mut result = 0u8;
        for &coefficient in &self.coefficients {
            result = Gf256::mul(result, x) ^ coefficient;
        }
        result
    }

    /// Addition and subtraction coincide in GF(256)
    fn add(&self, other: &Poly) -> Poly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (small, large) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let offset = large.len() - small.len();
        let mut sum = large.clone();
        for (i, &c) in small.iter().enumerate() {
            sum[offset + i] ^= c;
        }
        Poly::new(sum)
    }

    fn multiply(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut product = vec![0u8; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] ^= Gf256::mul(a, b);
            }
        }
        Poly::new(product)
    }

    fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> Poly {
        if coefficient == 0 || self.is_zero() {
            return Poly::zero();
        }
        let mut product = vec![0u8; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = Gf256::mul(c, coefficient);
        }
        Poly::new(product)
    }

    fn scale(&self, factor: u8) -> Poly {
        self.multiply_by_monomial(0, factor)
    }
}

/// The bundled reference decoder: syndromes, extended Euclidean algorithm,
/// Chien search and Forney's formula.
#[derive(Debug, Default, Clone, Copy)]
pub struct EuclideanRs;

impl RsBackend for EuclideanRs {
    fn rs_decode(&self, codewords: &[u8], num_ec: usize) -> Result<Vec<u8>, RsError> {
        let mut corrected = codewords.to_vec();

        let poly = Poly::new(corrected.clone());
        let mut syndromes = vec![0u8; num_ec];
        let mut has_error = false;
        for (i, syndrome) in syndromes.iter_mut().enumerate() {
            *syndrome = poly.evaluate_at(Gf256::exp(i));
            has_error |= *syndrome != 0;
        }
        if !has_error {
            return Ok(corrected);
        }

        // Syndrome coefficients are s_i at x^i; the vector is degree-first.
        syndromes.reverse();
        let syndrome_poly = Poly::new(syndromes);
        let (sigma, omega) = run_euclidean(Poly::monomial(num_ec, 1), syndrome_poly, num_ec)?;

        let locations = find_error_locations(&sigma)?;
        let magnitudes = find_error_magnitudes(&omega, &locations);
        for (location, magnitude) in locations.iter().zip(magnitudes) {
            let position = codewords
                .len()
                .checked_sub(1 + Gf256::log(*location))
                .ok_or(RsError::BadErrorPosition)?;
            corrected[position] ^= magnitude;
        }
        Ok(corrected)
    }
}

/// Extended Euclidean algorithm on (x^num_ec, syndromes), stopping once the
/// remainder's degree drops below num_ec / 2. Returns the normalized error
/// locator and evaluator polynomials.
fn run_euclidean(a: Poly, b: Poly, num_ec: usize) -> Result<(Poly, Poly), RsError> {
    let (mut r_last, mut r) = if a.degree() >= b.degree() {
        (a, b)
    } else {
        (b, a)
    };
    let mut t_last = Poly::zero();
    let mut t = Poly::monomial(0, 1);

    while r.degree() >= num_ec / 2 {
        let r_last_last = r_last;
        let t_last_last = t_last;
        r_last = r;
        t_last = t;

        if r_last.is_zero() {
            // The syndrome polynomial vanished; sigma cannot be recovered.
            return Err(RsError::DegenerateLocator);
        }
        r = r_last_last;
        let mut quotient = Poly::zero();
        let leading_inverse = Gf256::inv(r_last.coefficient(r_last.degree()));
        while r.degree() >= r_last.degree() && !r.is_zero() {
            let degree_diff = r.degree() - r_last.degree();
            let scale = Gf256::mul(r.coefficient(r.degree()), leading_inverse);
            quotient = quotient.add(&Poly::monomial(degree_diff, scale));
            r = r.add(&r_last.multiply_by_monomial(degree_diff, scale));
        }
        t = quotient.multiply(&t_last).add(&t_last_last);

        if r.degree() >= r_last.degree() {
            return Err(RsError::DegenerateLocator);
        }
    }

    let sigma_at_zero = t.coefficient(0);
    if sigma_at_zero == 0 {
        return Err(RsError::DegenerateLocator);
    }
    let inverse = Gf256::inv(sigma_at_zero);
    Ok((t.scale(inverse), r.scale(inverse)))
}

/// Chien search: sigma's roots are the inverse error locations. Every nonzero
/// field element is tried; the root count must match sigma's degree exactly.
fn find_error_locations(sigma: &Poly) -> Result<Vec<u8>, RsError> {
    let error_count = sigma.degree();
    let mut locations = Vec::with_capacity(error_count);
    for element in 1..=255u8 {
        if sigma.evaluate_at(element) == 0 {
            locations.push(Gf256::inv(element));
            if locations.len() > error_count {
                break;
            }
        }
    }
    if locations.len() != error_count {
        return Err(RsError::TooManyErrors);
    }
    Ok(locations)
}

/// Forney's formula with generator base 0: each magnitude is omega at the
/// inverse location over the product of (1 - X_j / X_i) for the other roots.
fn find_error_magnitudes(omega: &Poly, locations: &[u8]) -> Vec<u8> {
    locations
        .iter()
        .enumerate()
        .map(|(i, &location)| {
            let xi_inverse = Gf256::inv(location);
            let mut denominator = 1u8;
            for (j, &other) in locations.iter().enumerate() {
                if i != j {
                    denominator = Gf256::mul(denominator, 1 ^ Gf256::mul(other, xi_inverse));
                }
            }
            Gf256::mul(omega.evaluate_at(xi_inverse), Gf256::inv(denominator))
        })
        .collect()
}

/// Test-side RS encoder: appends `num_ec` codewords to `data`. The generator
/// polynomial has roots alpha^0 .. alpha^(num_ec - 1), matching the decoder's
/// generator base.
#[cfg(test)]
pub(crate) fn rs_encode(data: &[u8], num_ec: usize) -> Vec<u8> {
    let mut generator = Poly::monomial(0, 1);
    for i in 0..num_ec {
        generator = generator.multiply(&Poly::new(vec![1, Gf256::exp(i)]));
    }

    let shifted = Poly::new(data.to_vec()).multiply_by_monomial(num_ec, 1);
    let mut remainder = shifted;
    while !remainder.is_zero() && remainder.degree() >= generator.degree() {
        let degree_diff = remainder.degree() - generator.degree();
        let scale = Gf256::div(
            remainder.coefficient(remainder.degree()),
            generator.coefficient(generator.degree()),
        );
        remainder = remainder.add(&generator.multiply_by_monomial(degree_diff, scale));
    }

    let mut codeword = data.to_vec();
    let mut ec = vec![0u8; num_ec];
    for degree in 0..num_ec {
        if degree <= remainder.degree() {
            ec[num_ec - 1 - degree] = remainder.coefficient(degree);
        }
    }
    codeword.extend_from_slice(&ec);
    codeword
}
