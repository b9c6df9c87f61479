//! Macro generating port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
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

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum KitchenError {
            Closed => "kitchen is closed",
            OutOf { dish: String } => "out of {dish}",
            Backlog { orders: u32 } => "{orders} orders waiting",
            Burnt { dish: String, minutes: u32 } => "{dish} burnt after {minutes} minutes",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(KitchenError::closed(), KitchenError::Closed);
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        assert_eq!(KitchenError::out_of("hummus").to_string(), "out of hummus");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(KitchenError::backlog(3_u32).to_string(), "3 orders waiting");
        assert_eq!(
            KitchenError::burnt("falafel", 12_u32).to_string(),
            "falafel burnt after 12 minutes"
        );
    }
}
