//! Descriptor generation for record types.

/// Implement [`Reflect`](crate::Reflect) for a struct by listing its exported
/// fields in declared order.
///
/// Each entry maps a field to its emitted key, optionally followed by
/// directive flags in parentheses (`omit_empty`, `skip`, `blob`). A `blob`
/// field holding bytes as `Vec<u8>` or `[u8; N]` encodes as base64 rather
/// than as an array of numbers. Prefix the type with
/// `trusted` to also expose its own `Serialize` impl through
/// [`Reflect::trusted`](crate::Reflect::trusted).
///
/// ```
/// use armgen_shadow::reflect_record;
///
/// pub struct Subnet {
///     pub name: Option<String>,
///     pub r#type: Option<String>,
///     pub address_prefix: Option<String>,
///     pub service_key: Vec<u8>,
/// }
///
/// reflect_record!(Subnet {
///     name => "name" (omit_empty),
///     r#type => "type" (omit_empty),
///     address_prefix => "addressPrefix" (omit_empty),
///     service_key => "serviceKey" (omit_empty, blob),
/// });
/// ```
#[macro_export]
macro_rules! reflect_record {
    (@node $self:ident, $ty:ty {
        $( $field:ident => $name:literal $( ( $($flag:ident),* ) )? ),* $(,)?
    }) => {
        $crate::Node::Record($crate::Record::new(
            ::std::any::type_name::<$ty>(),
            ::std::vec![
                $(
                    $crate::Field::new(
                        ::std::stringify!($field),
                        $crate::FieldDirective::new($name) $( $( .$flag() )* )?,
                        &$self.$field,
                    )
                ),*
            ],
        ))
    };
    (trusted $ty:ty { $($body:tt)* }) => {
        impl $crate::Reflect for $ty {
            fn reflect(&self) -> $crate::Node<'_> {
                $crate::reflect_record!(@node self, $ty { $($body)* })
            }

            fn trusted(&self) -> ::std::option::Option<&dyn $crate::TrustedSerialize> {
                ::std::option::Option::Some(self)
            }
        }
    };
    ($ty:ty { $($body:tt)* }) => {
        impl $crate::Reflect for $ty {
            fn reflect(&self) -> $crate::Node<'_> {
                $crate::reflect_record!(@node self, $ty { $($body)* })
            }
        }
    };
}
