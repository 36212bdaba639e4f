use std::{error::Error, fmt};

// Macro to declare reason-carrying grid error types.
macro_rules! grid_error {
    ($name:literal, $error:ident) => {
        #[doc = concat!("Invalid ", $name, ".")]
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $error {
            /// The reason why it's invalid.
            pub reason: &'static str,
        }

        impl $error {
            pub(crate) const fn new(reason: &'static str) -> Self {
                Self { reason }
            }
        }

        impl fmt::Display for $error {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "invalid {}: {}", $name, self.reason)
            }
        }

        impl Error for $error {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                None
            }
        }
    };
}

grid_error!("extent", InvalidExtent);
grid_error!("grid dimension", InvalidDimension);

// -----------------------------------------------------------------------------

/// Cell indexing would exceed the signed integer range.
///
/// Raised when the padded grid addressing space cannot be represented; the
/// caller must reduce the grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericOverflow;

impl fmt::Display for NumericOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell index out of the signed integer range")
    }
}

impl Error for NumericOverflow {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
