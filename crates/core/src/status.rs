//! Status enum plumbing shared by the domain state machines.
//!
//! Each enum variant's discriminant matches the seed data (1-based) in the
//! corresponding lookup table, and each variant carries the wire name used
//! in API payloads.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Define a status enum whose discriminants mirror a seeded lookup table.
///
/// Generates `id()`/`from_id()` for the database side and
/// `as_str()`/`parse()` for the wire side, plus `Display` via the wire name.
macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> $crate::status::StatusId {
                self as $crate::status::StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: $crate::status::StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The wire name used in API payloads.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }

            /// Parse a wire name back into a variant.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $( $label => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for $crate::status::StatusId {
            fn from(value: $name) -> Self {
                value as $crate::status::StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_status_enum;
