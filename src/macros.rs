//! Macros for reducing boilerplate in flag types.
//!
//! Provides `flag_set!`, which defines a fieldless flag enum together with a
//! compact bit set over it. Contact flags and open cell faces are both built
//! this way so every per-tick flag check is a mask test.
//!
//! # Examples
//!
//! ```rust
//! use tilebound::flag_set;
//!
//! flag_set! {
//!     /// Example set
//!     pub struct Moods;
//!     /// Example flag
//!     pub enum Mood {
//!         /// Cheerful.
//!         Happy,
//!         /// Grumpy.
//!         Cross,
//!     }
//! }
//!
//! let mut moods = Moods::default();
//! moods.set(Mood::Cross);
//! assert!(moods.test(Mood::Cross));
//! assert!(!moods.test(Mood::Happy));
//! ```
//!
//! The enum must have at most 32 variants; the set is backed by a `u32`.
/// Defines a fieldless flag enum together with a compact `u32`-backed bit set over it.
#[macro_export]
macro_rules! flag_set {
    (
        $(#[$set_meta:meta])* $vis:vis struct $set:ident;
        $(#[$flag_meta:meta])* $flag_vis:vis enum $flag:ident {
            $($(#[$variant_meta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$flag_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $flag_vis enum $flag {
            $($(#[$variant_meta])* $variant),+
        }

        impl $flag {
            const fn mask(self) -> u32 {
                1_u32 << (self as u8)
            }
        }

        $(#[$set_meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $vis struct $set {
            bits: u32,
        }

        impl $set {
            /// Set with no flags raised.
            pub const EMPTY: Self = Self { bits: 0 };

            /// Raises `flag`.
            pub fn set(&mut self, flag: $flag) {
                self.bits |= flag.mask();
            }

            /// Lowers `flag`.
            pub fn reset(&mut self, flag: $flag) {
                self.bits &= !flag.mask();
            }

            /// Returns whether `flag` is raised.
            #[must_use]
            pub const fn test(&self, flag: $flag) -> bool {
                self.bits & flag.mask() != 0
            }

            /// Lowers every flag.
            pub fn clear(&mut self) {
                self.bits = 0;
            }

            /// Returns whether no flag is raised.
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Raw bit representation, one bit per variant in declaration order.
            #[must_use]
            pub const fn bits(&self) -> u32 {
                self.bits
            }
        }
    };
}
