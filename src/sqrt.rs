use super::Fix16;
use crate::kernel::KERNEL;

/// Digit-by-digit square root of `|x|`, negated again for negative inputs.
///
/// Runs in two passes so that no intermediate needs more than 32 bits: the
/// first finds the root of the raw value (8 fractional bits), the second
/// continues on the remainder shifted by 16 for the remaining 8.
pub(crate) fn sqrt(x: Fix16, rounding: bool) -> Fix16 {
    let negative = x.is_negative();

    let mut num = x.magnitude();
    let mut result: u32 = 0;

    let mut bit: u32 = if num & 0xFFF0_0000 != 0 { 1 << 30 } else { 1 << 18 };
    while bit > num {
        bit >>= 2;
    }

    unroll! {
        for pass in 0..2 {
            while bit != 0 {
                if num >= result + bit {
                    num -= result + bit;
                    result = (result >> 1) + bit;
                } else {
                    result >>= 1;
                }

                bit >>= 2;
            }

            if pass == 0 {
                if num > 0xFFFF {
                    // num doesn't survive the shift. Commit the next root bit
                    // up front: (r + 1/2)^2 = r^2 + r + 1/4.
                    num = ((num - result) << 16) - 0x4000;
                    result = (result << 16) + 0x8000;
                } else {
                    num <<= 16;
                    result <<= 16;
                }

                bit = 1 << 14;
            }
        }
    }

    if rounding && num > result {
        result += 1;
    }

    if negative {
        Fix16(-(result as i32))
    } else {
        Fix16(result as i32)
    }
}

impl Fix16 {
    /// Square root through [`KERNEL`]. Negative inputs give `-sqrt(|x|)`.
    #[inline]
    pub fn sqrt(self) -> Self {
        KERNEL.sqrt(self)
    }
}
