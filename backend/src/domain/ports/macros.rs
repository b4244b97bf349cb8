//! Helper macro for declaring domain port error enums.

/// Declare a port error enum with thiserror messages and snake_case
/// constructors that accept `impl Into<T>` for each field.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the generated constructors.
    define_port_error! {
        /// Example error used only by this test.
        pub enum ExamplePortError {
            Connection { message: String } => "connection failed: {message}",
            Gone => "resource is gone",
        }
    }

    #[test]
    fn field_constructors_accept_str() {
        let error = ExamplePortError::connection("timed out");
        assert_eq!(error.to_string(), "connection failed: timed out");
    }

    #[test]
    fn unit_constructors_take_no_arguments() {
        assert_eq!(ExamplePortError::gone().to_string(), "resource is gone");
    }
}
