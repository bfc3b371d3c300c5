use std::error::Error;
use std::fmt;

use super::Fix16;
use crate::kernel::KERNEL;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum FromStrErr {
    Empty,
    InvalidCharacter,
    Overflow,
}

impl fmt::Display for FromStrErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            FromStrErr::Empty => "empty input",
            FromStrErr::InvalidCharacter => "invalid character",
            FromStrErr::Overflow => "overflow",
        };

        f.write_str(text)
    }
}

impl Error for FromStrErr {}

const MAX_INT_DIGITS: usize = 5;
const MAX_FRAC_DIGITS: usize = 5;

fn digit_count(src: &[u8]) -> usize {
    src.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn parse_digits(src: &[u8]) -> u32 {
    src.iter().fold(0, |n, c| n * 10 + (c - b'0') as u32)
}

impl Fix16 {
    /// Parses `[ws][+|-]int[(.|,)frac][digits|ws]*`.
    ///
    /// At most 5 integer digits. Fraction digits past the fifth are ignored;
    /// the rest are converted with a rounding divide through [`KERNEL`].
    pub fn from_str_dec(src: &str) -> Result<Self, FromStrErr> {
        let src = src
            .trim_start_matches(|c: char| c.is_ascii_whitespace())
            .as_bytes();

        let (negative, src) = match src.first() {
            None => return Err(FromStrErr::Empty),
            Some(b'-') => (true, &src[1..]),
            Some(b'+') => (false, &src[1..]),
            Some(_) => (false, src),
        };

        let int_digits = digit_count(src);
        if int_digits == 0 {
            return Err(if src.is_empty() {
                FromStrErr::Empty
            } else {
                FromStrErr::InvalidCharacter
            });
        } else if int_digits > MAX_INT_DIGITS {
            return Err(FromStrErr::Overflow);
        }

        let int_part = parse_digits(&src[..int_digits]);
        if int_part > 0x8000 {
            return Err(FromStrErr::Overflow);
        }

        let mut rest = &src[int_digits..];
        let mut frac_part = 0;

        if let Some(b'.' | b',') = rest.first() {
            rest = &rest[1..];

            let frac_digits = digit_count(rest).min(MAX_FRAC_DIGITS);
            let scale = 10_i32.pow(frac_digits as u32);
            let digits = parse_digits(&rest[..frac_digits]) as i32;

            frac_part = KERNEL.div(Fix16(digits), Fix16(scale)).0 as u32;
            rest = &rest[frac_digits..];
        }

        if !rest.iter().all(|c| c.is_ascii_digit() || c.is_ascii_whitespace()) {
            return Err(FromStrErr::InvalidCharacter);
        }

        let mag = (int_part << Self::FRAC_BITS) + frac_part;
        let limit = if negative { 0x8000_0000 } else { 0x7FFF_FFFF };

        if mag > limit {
            return Err(FromStrErr::Overflow);
        }

        Ok(Self::from_magnitude(mag, negative, false).0)
    }

    /// Parses up to 8 hex digits as the raw bit pattern.
    pub fn from_str_hex(src: &str) -> Result<Self, FromStrErr> {
        let src = src.as_bytes();
        if src.is_empty() {
            return Err(FromStrErr::Empty);
        } else if src.len() > 8 {
            return Err(FromStrErr::Overflow);
        }

        let mut padded = [b'0'; 8];
        padded[8 - src.len()..].copy_from_slice(src);

        let mut raw = [0_u8; 4];
        hex_simd::decode(&padded, hex_simd::OutBuf::new(&mut raw))
            .map_err(|_| FromStrErr::InvalidCharacter)?;

        Ok(Self(u32::from_be_bytes(raw) as i32))
    }
}

impl std::str::FromStr for Fix16 {
    type Err = FromStrErr;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::from_str_dec(src)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Fix16, FromStrErr};
    use quickcheck_macros::quickcheck;

    #[test]
    fn parses_basic_numbers() {
        assert_eq!("12".parse(), Ok(Fix16::from_int(12)));
        assert_eq!("  -3.5".parse(), Ok(Fix16(-0x38000)));
        assert_eq!("+0,25".parse(), Ok(Fix16(0x4000)));
        assert_eq!("7.".parse(), Ok(Fix16::from_int(7)));
        assert_eq!("1.5 ".parse(), Ok(Fix16(0x18000)));
    }

    #[test]
    fn parses_extremes() {
        assert_eq!("32767.99999".parse(), Ok(Fix16::MAXIMUM));
        assert_eq!("-32768".parse(), Ok(Fix16::MINIMUM));
        assert_eq!("-32768.0".parse(), Ok(Fix16::MINIMUM));
    }

    #[test]
    fn ignores_extra_fraction_digits() {
        assert_eq!("0.500001234".parse(), Ok(Fix16::HALF));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!("32768".parse::<Fix16>(), Err(FromStrErr::Overflow));
        assert_eq!("-32768.5".parse::<Fix16>(), Err(FromStrErr::Overflow));
        assert_eq!("123456".parse::<Fix16>(), Err(FromStrErr::Overflow));
        assert_eq!("99999".parse::<Fix16>(), Err(FromStrErr::Overflow));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<Fix16>(), Err(FromStrErr::Empty));
        assert_eq!("   ".parse::<Fix16>(), Err(FromStrErr::Empty));
        assert_eq!("-".parse::<Fix16>(), Err(FromStrErr::Empty));
        assert_eq!(".5".parse::<Fix16>(), Err(FromStrErr::InvalidCharacter));
        assert_eq!("1.5x".parse::<Fix16>(), Err(FromStrErr::InvalidCharacter));
        assert_eq!("1e3".parse::<Fix16>(), Err(FromStrErr::InvalidCharacter));
    }

    #[test]
    fn parses_hex() {
        assert_eq!(Fix16::from_str_hex("10000"), Ok(Fix16::ONE));
        assert_eq!(Fix16::from_str_hex("80000000"), Ok(Fix16::MINIMUM));
        assert_eq!(Fix16::from_str_hex("aBc"), Ok(Fix16(0xABC)));
        assert_eq!(Fix16::from_str_hex(""), Err(FromStrErr::Empty));
        assert_eq!(Fix16::from_str_hex("100000000"), Err(FromStrErr::Overflow));
        assert_eq!(
            Fix16::from_str_hex("12g4"),
            Err(FromStrErr::InvalidCharacter)
        );
    }

    #[test]
    fn displays_errors() {
        assert_eq!(FromStrErr::Empty.to_string(), "empty input");
        assert_eq!(FromStrErr::Overflow.to_string(), "overflow");
    }

    #[cfg(not(feature = "no-rounding"))]
    #[quickcheck]
    fn qc_decimal_round_trip(n: Fix16) -> bool {
        n.to_string().parse() == Ok(n)
    }

    #[quickcheck]
    fn qc_hex_round_trip(n: Fix16) -> bool {
        Fix16::from_str_hex(&format!("{:x}", n)) == Ok(n)
    }
}
