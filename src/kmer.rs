//! 2-bit k-mer codec, generic over the integer word holding the k-mer.
//!
//! A k-mer of length k lives in the low 2k bits of its word, first symbol in
//! the most significant position (A=00, C=01, G=10, T=11). Every bit above
//! the low 2k bits is zero.

use std::fmt;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, Not, Shl, Shr};

use ethnum::U256;

/// Symbols indexed by their 2-bit code.
pub const LETTERS: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Longest k-mer any supported word can hold.
pub const MAX_K: usize = 128;

/// Unsigned integer word a k-mer set is built over.
///
/// Implemented for `u64`, `u128` and [`U256`]; the pipeline picks one per
/// run with [`Width::for_k`] and stays monomorphic below that point.
pub trait KmerWord:
    Copy
    + Eq
    + Ord
    + Hash
    + Send
    + Sync
    + fmt::Debug
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Number of bits in the word
    const BITS: u32;

    const ZERO: Self;

    fn from_u8(value: u8) -> Self;

    /// Low byte of the word (truncates)
    fn low_u8(self) -> u8;

    /// Reverse the order of the 2-bit groups across the whole word.
    fn reverse_symbols(self) -> Self;
}

macro_rules! impl_kmer_word_native {
    ($t:ty, $pairs:expr, $nibbles:expr) => {
        impl KmerWord for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;

            #[inline]
            fn from_u8(value: u8) -> Self {
                value as $t
            }

            #[inline]
            fn low_u8(self) -> u8 {
                self as u8
            }

            #[inline]
            fn reverse_symbols(self) -> Self {
                // swap 2-bit pairs, then nibbles; bytes are handled by swap_bytes
                let x = ((self >> 2) & $pairs) | ((self & $pairs) << 2);
                let x = ((x >> 4) & $nibbles) | ((x & $nibbles) << 4);
                x.swap_bytes()
            }
        }
    };
}

impl_kmer_word_native!(u64, 0x3333_3333_3333_3333u64, 0x0F0F_0F0F_0F0F_0F0Fu64);
impl_kmer_word_native!(
    u128,
    0x3333_3333_3333_3333_3333_3333_3333_3333u128,
    0x0F0F_0F0F_0F0F_0F0F_0F0F_0F0F_0F0F_0F0Fu128
);

impl KmerWord for U256 {
    const BITS: u32 = 256;
    const ZERO: Self = U256::ZERO;

    #[inline]
    fn from_u8(value: u8) -> Self {
        U256::from(value)
    }

    #[inline]
    fn low_u8(self) -> u8 {
        let (_, low) = self.into_words();
        low as u8
    }

    #[inline]
    fn reverse_symbols(self) -> Self {
        let (high, low) = self.into_words();
        U256::from_words(low.reverse_symbols(), high.reverse_symbols())
    }
}

/// Word width chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W64,
    W128,
    W256,
}

impl Width {
    /// Smallest supported width with room for 2k bits, `None` if k is out of range.
    pub fn for_k(k: usize) -> Option<Width> {
        match k {
            1..=32 => Some(Width::W64),
            33..=64 => Some(Width::W128),
            65..=MAX_K => Some(Width::W256),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Width::W64 => 64,
            Width::W128 => 128,
            Width::W256 => 256,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[inline]
fn symbol_shift(symbols: usize) -> u32 {
    (symbols << 1) as u32
}

/// `2^(2k) - 1`; zero for k = 0.
#[inline]
pub fn mask_for_k<W: KmerWord>(k: usize) -> W {
    if k == 0 {
        return W::ZERO;
    }
    !W::ZERO >> (W::BITS - symbol_shift(k))
}

/// First d symbols of the k-mer, right-aligned.
#[inline]
pub fn bit_prefix<W: KmerWord>(kmer: W, k: usize, d: usize) -> W {
    if d == 0 {
        return W::ZERO;
    }
    kmer >> symbol_shift(k - d)
}

/// Last d symbols of the k-mer.
#[inline]
pub fn bit_suffix<W: KmerWord>(kmer: W, d: usize) -> W {
    kmer & mask_for_k(d)
}

#[inline]
pub fn reverse_complement<W: KmerWord>(kmer: W, k: usize) -> W {
    (!kmer.reverse_symbols() >> (W::BITS - symbol_shift(k))) & mask_for_k(k)
}

/// The smaller of a k-mer and its reverse complement.
#[inline]
pub fn canonical<W: KmerWord>(kmer: W, k: usize) -> W {
    let rc = reverse_complement(kmer, k);
    if kmer < rc {
        kmer
    } else {
        rc
    }
}

/// Drop the first symbol and append `code` at the end.
#[inline]
pub fn push_symbol<W: KmerWord>(kmer: W, code: u8, k: usize) -> W {
    ((kmer << 2) | W::from_u8(code)) & mask_for_k(k)
}

/// Symbol at position `index`, counted from the 5' end.
#[inline]
pub fn nucleotide_at<W: KmerWord>(kmer: W, k: usize, index: usize) -> u8 {
    let code = (kmer >> symbol_shift(k - index - 1)) & W::from_u8(3);
    LETTERS[code.low_u8() as usize]
}

/// 2-bit code of a nucleotide, case-insensitive.
#[inline]
pub fn nucleotide_to_code(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Append the k symbols of the k-mer to `out`.
pub fn decode_into<W: KmerWord>(kmer: W, k: usize, out: &mut Vec<u8>) {
    out.extend((0..k).map(|i| nucleotide_at(kmer, k, i)));
}

pub fn number_to_kmer<W: KmerWord>(kmer: W, k: usize) -> String {
    (0..k).map(|i| nucleotide_at(kmer, k, i) as char).collect()
}

/// Encode a nucleotide string; `None` if it holds anything but A/C/G/T.
pub fn kmer_to_number<W: KmerWord>(seq: &[u8]) -> Option<W> {
    seq.iter().try_fold(W::ZERO, |acc, &base| {
        nucleotide_to_code(base).map(|code| (acc << 2) | W::from_u8(code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn bit_suffix_keeps_trailing_symbols() {
        assert_eq!(bit_suffix(0b1100011110u64, 3), 0b011110);
        assert_eq!(bit_suffix(0b1110u64, 2), 0b1110);
        assert_eq!(bit_suffix(0b1110u64, 0), 0);
        assert_eq!(
            bit_suffix(0x3F7F_FFFF_FFFF_FFFEu64, 7),
            0b111111_11111110
        );
    }

    #[test]
    fn bit_prefix_keeps_leading_symbols() {
        assert_eq!(bit_prefix(0b1100011110u64, 5, 3), 0b110001);
        assert_eq!(bit_prefix(0b1110u64, 2, 2), 0b1110);
        assert_eq!(bit_prefix(0b1110u64, 2, 0), 0);
        assert_eq!(bit_prefix(0x3F7F_FFFF_FFFF_FFFEu64, 31, 7), 0b111111_01111111);
        // full-width word, d = 0 must not shift by 64
        assert_eq!(bit_prefix(u64::MAX, 32, 0), 0);
    }

    #[test]
    fn nucleotide_at_reads_from_five_prime_end() {
        assert_eq!(nucleotide_at(0b111001u64, 3, 1), b'G');
        assert_eq!(nucleotide_at(0b11100111u64, 4, 1), b'G');
        assert_eq!(nucleotide_at(0b11100001u64, 4, 3), b'C');
        assert_eq!(nucleotide_at(0b1101100001u64, 5, 0), b'T');
        assert_eq!(nucleotide_at(0b11u64, 1, 0), b'T');
    }

    #[test]
    fn number_to_kmer_decodes() {
        assert_eq!(number_to_kmer(0b1001u64, 2), "GC");
        assert_eq!(number_to_kmer(0b1011u64, 3), "AGT");
        assert_eq!(number_to_kmer(0b111u64, 1), "T");
        assert_eq!(
            number_to_kmer(0x3F7F_FFFF_FFFF_FFFEu64, 31),
            "TTTCTTTTTTTTTTTTTTTTTTTTTTTTTTG"
        );
    }

    #[test]
    fn nucleotide_codes() {
        assert_eq!(nucleotide_to_code(b'A'), Some(0));
        assert_eq!(nucleotide_to_code(b'c'), Some(1));
        assert_eq!(nucleotide_to_code(b'G'), Some(2));
        assert_eq!(nucleotide_to_code(b't'), Some(3));
        assert_eq!(nucleotide_to_code(b'N'), None);
        assert_eq!(kmer_to_number::<u64>(b"ACGN"), None);
    }

    #[test]
    fn mask_for_k_values() {
        assert_eq!(mask_for_k::<u64>(1), 0b11);
        assert_eq!(mask_for_k::<u64>(2), 0b1111);
        assert_eq!(mask_for_k::<u64>(3), 0b111111);
        assert_eq!(mask_for_k::<u64>(32), u64::MAX);
        assert_eq!(mask_for_k::<u128>(64), u128::MAX);
        assert_eq!(mask_for_k::<U256>(128), U256::MAX);
        assert_eq!(mask_for_k::<u64>(0), 0);
    }

    #[test]
    fn reverse_complement_cases() {
        assert_eq!(reverse_complement(0b1001u64, 2), 0b1001);
        assert_eq!(reverse_complement(0b101111u64, 3), 0b000001);
        assert_eq!(reverse_complement(0b11u64, 1), 0b00);
        assert_eq!(
            reverse_complement(0xFF7F_FFFF_FFFF_FFFEu64, 32),
            0x4000_0000_0000_0200
        );
    }

    #[test]
    fn canonical_cases() {
        assert_eq!(canonical(0b1001u64, 2), 0b1001);
        assert_eq!(canonical(0b101111u64, 3), 0b000001);
        assert_eq!(canonical(0b11u64, 1), 0b00);
        assert_eq!(canonical(0xFF7F_FFFF_FFFF_FFFEu64, 32), 0x4000_0000_0000_0200);
    }

    #[test]
    fn widths_agree_on_small_kmers() {
        let seq = b"ACGTTGCAAGGCT";
        let k = seq.len();
        let a: u64 = kmer_to_number(seq).unwrap();
        let b: u128 = kmer_to_number(seq).unwrap();
        let c: U256 = kmer_to_number(seq).unwrap();
        let rc = number_to_kmer(reverse_complement(a, k), k);
        assert_eq!(rc, "AGCCTTGCAACGT");
        assert_eq!(number_to_kmer(reverse_complement(b, k), k), rc);
        assert_eq!(number_to_kmer(reverse_complement(c, k), k), rc);
    }

    #[test]
    fn width_selection() {
        assert_eq!(Width::for_k(0), None);
        assert_eq!(Width::for_k(1), Some(Width::W64));
        assert_eq!(Width::for_k(32), Some(Width::W64));
        assert_eq!(Width::for_k(33), Some(Width::W128));
        assert_eq!(Width::for_k(64), Some(Width::W128));
        assert_eq!(Width::for_k(65), Some(Width::W256));
        assert_eq!(Width::for_k(128), Some(Width::W256));
        assert_eq!(Width::for_k(129), None);
    }

    fn random_kmer(rng: &mut StdRng, k: usize) -> Vec<u8> {
        (0..k).map(|_| LETTERS[rng.gen_range(0..4)]).collect()
    }

    fn check_codec<W: KmerWord>(rng: &mut StdRng, max_k: usize) {
        for _ in 0..500 {
            let k = rng.gen_range(1..=max_k);
            let seq = random_kmer(rng, k);
            let value: W = kmer_to_number(&seq).unwrap();
            assert_eq!(value & !mask_for_k::<W>(k), W::ZERO);
            assert_eq!(number_to_kmer(value, k).as_bytes(), seq.as_slice());

            let rc = reverse_complement(value, k);
            assert_eq!(reverse_complement(rc, k), value);
            assert_eq!(rc & !mask_for_k::<W>(k), W::ZERO);

            let canon = canonical(value, k);
            assert_eq!(canonical(canon, k), canon);
            assert!(canon == value || canon == rc);
        }
    }

    #[test]
    fn codec_properties_hold_for_every_width() {
        let mut rng = StdRng::seed_from_u64(7);
        check_codec::<u64>(&mut rng, 32);
        check_codec::<u128>(&mut rng, 64);
        check_codec::<U256>(&mut rng, 128);
    }

    #[test]
    fn push_symbol_slides_window() {
        let k = 3;
        let mut kmer = 0u64;
        for &base in b"ACGT" {
            kmer = push_symbol(kmer, nucleotide_to_code(base).unwrap(), k);
        }
        assert_eq!(number_to_kmer(kmer, k), "CGT");
    }
}
