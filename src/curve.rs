//! Space-filling curve helpers: Morton and Hilbert indexes of points on
//! 2^m × 2^m integer grids.
//!
//! The Hilbert transforms run a 4-state machine over 2-bit digits, from
//! most to least significant. A state is the orientation of the curve
//! within the current cell; the tables below give the output digit and
//! successor state for each input digit.

/// `log2` returns the index of the most significant 1 bit of x, or zero
/// when x is zero.
pub fn log2_u64(x: u64) -> u32 {
    if x == 0 { 0 } else { 63 - x.leading_zeros() }
}

pub fn log2_u32(x: u32) -> u32 {
    if x == 0 { 0 } else { 31 - x.leading_zeros() }
}

// Spreads the low 32 bits of x so that bit i lands at bit 2i.
fn spread(x: u32) -> u64 {
    let mut x = x as u64;
    x = (x | (x << 16)) & 0x0000_ffff_0000_ffff;
    x = (x | (x << 8)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    (x | (x << 1)) & 0x5555_5555_5555_5555
}

// Inverse of spread: gathers the even bits of x into the low 32 bits.
fn gather(x: u64) -> u32 {
    let mut x = x & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x >> 4)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x >> 8)) & 0x0000_ffff_0000_ffff;
    (x | (x >> 16)) as u32
}

/// `morton_index` interleaves the bits of x and y, with the bits of x
/// at even positions, to produce the Morton index of grid location
/// (x, y).
pub fn morton_index(x: u32, y: u32) -> u64 {
    spread(x) | (spread(y) << 1)
}

/// `morton_index_inverse` returns the grid location (x, y) with Morton
/// index z.
pub fn morton_index_inverse(z: u64) -> (u32, u32) {
    (gather(z), gather(z >> 1))
}

// Morton digit → Hilbert digit, per state. A Morton digit is (y << 1) | x
// for one bit of each coordinate.
const M2H_DIGIT: [[u64; 4]; 4] = [
    [0, 3, 1, 2],
    [0, 1, 3, 2],
    [2, 3, 1, 0],
    [2, 1, 3, 0],
];

// Successor state by Morton digit, per state.
const M2H_STATE: [[usize; 4]; 4] = [
    [1, 2, 0, 0],
    [0, 1, 3, 1],
    [2, 0, 2, 3],
    [3, 3, 1, 2],
];

// Hilbert digit → Morton digit, per state.
const H2M_DIGIT: [[u64; 4]; 4] = [
    [0, 2, 3, 1],
    [0, 1, 3, 2],
    [3, 2, 0, 1],
    [3, 1, 0, 2],
];

// Successor state by Hilbert digit, per state.
const H2M_STATE: [[usize; 4]; 4] = [
    [1, 0, 0, 2],
    [0, 1, 1, 3],
    [3, 2, 2, 0],
    [2, 3, 3, 1],
];

/// `morton_to_hilbert` converts the 2m-bit Morton index z to the
/// corresponding Hilbert index.
pub fn morton_to_hilbert(z: u64, m: u32) -> u64 {
    let mut h = 0u64;
    let mut state = 0;
    for i in (0..m).rev() {
        let digit = ((z >> (2 * i)) & 3) as usize;
        h = (h << 2) | M2H_DIGIT[state][digit];
        state = M2H_STATE[state][digit];
    }
    h
}

/// `hilbert_to_morton` converts the 2m-bit Hilbert index h to the
/// corresponding Morton index.
pub fn hilbert_to_morton(h: u64, m: u32) -> u64 {
    let mut z = 0u64;
    let mut state = 0;
    for i in (0..m).rev() {
        let digit = ((h >> (2 * i)) & 3) as usize;
        z = (z << 2) | H2M_DIGIT[state][digit];
        state = H2M_STATE[state][digit];
    }
    z
}

/// `hilbert_index` returns the index of grid location (x, y) on the
/// order-m Hilbert curve.
pub fn hilbert_index(x: u32, y: u32, m: u32) -> u64 {
    morton_to_hilbert(morton_index(x, y), m)
}

/// `hilbert_index_inverse` returns the grid location with index h on
/// the order-m Hilbert curve.
pub fn hilbert_index_inverse(h: u64, m: u32) -> (u32, u32) {
    morton_index_inverse(hilbert_to_morton(h, m))
}
