//! Macros for stamping out the fixed-width codecs and the tuple codecs.

/// Defines the fixed-width scalars supported by the format.
/// Arguments passed to callback:
/// 1. Rust Type
/// 2. Width in bytes
macro_rules! for_each_fixed_width {
    ($m:ident) => {
        $m!(u8,  1);
        $m!(i8,  1);
        $m!(u16, 2);
        $m!(i16, 2);
        $m!(u32, 4);
        $m!(i32, 4);
        $m!(u64, 8);
        $m!(i64, 8);
        $m!(f32, 4);
        $m!(f64, 8);
    };
}

/// Generates a Little-Endian `Codec` impl for a type with `to_le_bytes()`.
macro_rules! impl_fixed_width {
    ($ty:ty, $width:expr) => {
        impl crate::codec::Codec for $ty {
            #[inline]
            fn encode(&self, out: &mut [u8]) -> crate::types::Result<usize> {
                let dst = crate::codec::reserve(out, $width)?;
                dst.copy_from_slice(&self.to_le_bytes());
                Ok($width)
            }

            #[inline]
            fn decode(input: &[u8]) -> crate::types::Result<(Self, usize)> {
                let src = crate::codec::take(input, $width)?;
                let mut raw = [0u8; $width];
                raw.copy_from_slice(src);
                Ok((<$ty>::from_le_bytes(raw), $width))
            }
        }
    };
}

/// Generates a `Codec` impl for a tuple: fields are concatenated in order.
macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: crate::codec::Codec),+> crate::codec::Codec for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, out: &mut [u8]) -> crate::types::Result<usize> {
                let ($($name,)+) = self;
                let mut cursor = crate::cursor::WriteCursor::new(out);
                $( cursor.write($name)?; )+
                Ok(cursor.position())
            }

            #[allow(non_snake_case)]
            fn decode(input: &[u8]) -> crate::types::Result<(Self, usize)> {
                let mut cursor = crate::cursor::ReadCursor::new(input);
                $( let $name = cursor.read::<$name>()?; )+
                Ok((($($name,)+), cursor.position()))
            }
        }
    };
}

/// Implements [`Codec`](crate::Codec) for a plain struct by concatenating its
/// fields in the listed order.
///
/// ```
/// use wirepack::{Codec, impl_codec_struct};
///
/// #[derive(Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
/// impl_codec_struct!(Point { x, y });
///
/// let mut buf = [0u8; 8];
/// assert_eq!(Point { x: 1, y: 2 }.encode(&mut buf), Ok(8));
/// assert_eq!(Point::decode(&buf), Ok((Point { x: 1, y: 2 }, 8)));
/// ```
#[macro_export]
macro_rules! impl_codec_struct {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Codec for $ty {
            fn encode(&self, out: &mut [u8]) -> $crate::Result<usize> {
                #[allow(unused_mut)]
                let mut cursor = $crate::WriteCursor::new(out);
                $( cursor.write(&self.$field)?; )*
                Ok(cursor.position())
            }

            fn decode(input: &[u8]) -> $crate::Result<(Self, usize)> {
                #[allow(unused_mut)]
                let mut cursor = $crate::ReadCursor::new(input);
                $( let $field = cursor.read()?; )*
                Ok((Self { $($field),* }, cursor.position()))
            }
        }
    };
}

pub(crate) use for_each_fixed_width;
pub(crate) use impl_fixed_width;
pub(crate) use impl_tuple;
