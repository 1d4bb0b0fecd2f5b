//! Node ids and ranges for the flat syntax tree.
//!
//! - `ExprId(u32)` instead of `Box<Expr>`: 4 bytes, O(1) equality, and a
//!   stable identity the resolver can key on
//! - Ranges (`start`, `len`) index the arena's flattened list storage

/// Macro to define arena id types.
///
/// Each generated type has an `INVALID` sentinel, `new()`, `index()`, `raw()`
/// and `is_valid()`, plus a `Debug` showing `TypeName(n)`.
macro_rules! define_id {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel value.
            pub const INVALID: Self = Self(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }
    )* };
}

/// Macro to define range types over the arena's list storage.
///
/// Lengths are `u32`: a generated program may hold very long statement lists.
macro_rules! define_range {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            /// Slice bounds into the backing list.
            #[inline]
            pub const fn bounds(&self) -> ::std::ops::Range<usize> {
                (self.start as usize)..(self.start as usize + self.len as usize)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + self.len)
            }
        }
    )* };
}

define_id!(ExprId, StmtId, FunctionId);
define_range!(ExprRange, StmtRange, FunctionRange);
