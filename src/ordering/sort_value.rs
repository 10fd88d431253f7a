use std::cmp::Ordering;

/// A map value that can drive key ordering.
///
/// `compare` is the natural order used by the plain value rules, `compare_abs`
/// the magnitude order used by the absolute-value rules. Both must be total.
pub trait SortValue {
    fn compare(&self, other: &Self) -> Ordering;

    fn compare_abs(&self, other: &Self) -> Ordering;
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl SortValue for $ty {
            fn compare(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn compare_abs(&self, other: &Self) -> Ordering {
                // unsigned_abs keeps MIN in range
                self.unsigned_abs().cmp(&other.unsigned_abs())
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl SortValue for $ty {
            fn compare(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }

            fn compare_abs(&self, other: &Self) -> Ordering {
                self.abs().total_cmp(&other.abs())
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_float!(f32, f64);

// Magnitude is the natural order for unsigned integers, text and flags.
macro_rules! impl_natural {
    ($($ty:ty),*) => {$(
        impl SortValue for $ty {
            fn compare(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            fn compare_abs(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }
    )*};
}

impl_natural!(u8, u16, u32, u64, u128, usize, String, &str, bool);
