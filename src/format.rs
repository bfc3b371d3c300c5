use hex_simd::AsciiCase;
use std::fmt;

use super::{Fix16, Wide};
use crate::kernel::KERNEL;

/// Five decimals resolve every Q16.16 value.
const MAX_DECIMALS: usize = 5;

const SCALES: [u32; MAX_DECIMALS + 1] = [1, 10, 100, 1_000, 10_000, 100_000];

impl fmt::Display for Fix16 {
    /// Writes `[-]int[.frac]` with the formatter's precision as the number of
    /// decimals (5 by default, at most 5). The fraction is rounded through
    /// [`KERNEL`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let decimals = f.precision().unwrap_or(MAX_DECIMALS).min(MAX_DECIMALS);
        let scale = SCALES[decimals];

        let mag = self.magnitude();
        let mut int_part = mag >> Fix16::FRAC_BITS;
        let frac = Fix16((mag & 0xFFFF) as i32);
        let mut frac_part = KERNEL.mul(frac, Fix16(scale as i32)).0 as u32;

        if frac_part >= scale {
            int_part += 1;
            frac_part -= scale;
        }

        if self.is_negative() {
            f.write_str("-")?;
        }

        write!(f, "{int_part}")?;

        if decimals > 0 {
            write!(f, ".{frac_part:0decimals$}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Fix16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Fix16(")?;
        <Self as fmt::Display>::fmt(self, f)?;
        f.write_str(")")
    }
}

impl fmt::LowerHex for Fix16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format_hex(&(self.0 as u32).to_be_bytes(), f, AsciiCase::Lower)
    }
}

impl fmt::UpperHex for Fix16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format_hex(&(self.0 as u32).to_be_bytes(), f, AsciiCase::Upper)
    }
}

fn wide_bytes(n: &Wide) -> [u8; 8] {
    let mut bytes = [0; 8];
    bytes[..4].copy_from_slice(&n.hi.to_be_bytes());
    bytes[4..].copy_from_slice(&n.lo.to_be_bytes());
    bytes
}

impl fmt::LowerHex for Wide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format_hex(&wide_bytes(self), f, AsciiCase::Lower)
    }
}

impl fmt::UpperHex for Wide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format_hex(&wide_bytes(self), f, AsciiCase::Upper)
    }
}

/// Hex digits of big-endian `src` without leading zeros. Honors `#` and
/// width like the integer formatters.
fn format_hex(
    src: &[u8],
    f: &mut fmt::Formatter,
    case: AsciiCase,
) -> fmt::Result {
    let mut buf = [0; 16];
    let buf = &mut buf[..src.len() * 2];

    let out = hex_simd::OutBuf::new(buf);
    let encoded = hex_simd::encode(src, out, case).map_err(|_| fmt::Error)?;

    let zero_digits = encoded
        .iter()
        .take_while(|&&c| c == b'0')
        .count()
        .min(encoded.len() - 1);

    let digits =
        std::str::from_utf8(&encoded[zero_digits..]).map_err(|_| fmt::Error)?;

    f.pad_integral(true, "0x", digits)
}

/// Splits into base-10^9 chunks, least significant first.
fn wide_chunks(n: &Wide) -> ([u32; 3], usize) {
    let mut chunks = [0; 3];
    let mut count = 0;
    let mut q = *n;

    loop {
        let (next, r) = q.div_mod_word(1_000_000_000);

        chunks[count] = r.unsigned_abs();
        count += 1;

        if next.is_zero() {
            break;
        }

        q = next;
    }

    (chunks, count)
}

impl fmt::Display for Wide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (chunks, count) = wide_chunks(self);

        if self.is_negative() {
            f.write_str("-")?;
        }

        write!(f, "{}", chunks[count - 1])?;

        for chunk in chunks[..count - 1].iter().rev() {
            write!(f, "{chunk:09}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Wide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Wide(")?;
        <Self as fmt::Display>::fmt(self, f)?;
        f.write_str(")")
    }
}
