/// Declares a closed, string-labelled enumeration.
///
/// The generated type serializes as its label, parses from its label via
/// `FromStr`, and rejects any other string with `EntityError::InvalidValue`.
/// Enum and variant attributes pass through, so `#[derive(Default)]` on the
/// enum with `#[default]` on one variant gives it a default.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the closed set, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire label for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::EntityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err($crate::error::EntityError::InvalidValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}
