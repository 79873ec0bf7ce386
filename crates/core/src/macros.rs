// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the gridrelay crates.

/// `Display` for a fieldless enum, one string per variant.
///
/// ```ignore
/// crate::simple_display! {
///     Status {
///         Pending => "pending",
///         Success => "success",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $str:literal ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let name = match self {
                    $( Self::$variant => $str, )+
                };
                f.write_str(name)
            }
        }
    };
}

/// Chained setters for descriptor and payload structs, emitted inside an
/// existing `impl` block.
///
/// `set` fields take the value as is; `option` fields wrap it in `Some`.
///
/// ```ignore
/// impl StatusPayload {
///     gr_core::chain_setters! {
///         option { target_url: String }
///     }
/// }
/// ```
#[macro_export]
macro_rules! chain_setters {
    (
        $(set { $( $set_field:ident : $set_ty:ty ),* $(,)? })?
        $(option { $( $opt_field:ident : $opt_ty:ty ),* $(,)? })?
    ) => {
        $($(
            pub fn $set_field(self, $set_field: $set_ty) -> Self {
                Self { $set_field, ..self }
            }
        )*)?
        $($(
            pub fn $opt_field(self, $opt_field: impl Into<$opt_ty>) -> Self {
                Self { $opt_field: Some($opt_field.into()), ..self }
            }
        )*)?
    };
}

/// Test builder with fixture defaults for a plain data struct.
///
/// Generates `<Target>::builder()`, one setter per field and `build()`, all
/// behind `cfg(any(test, feature = "test-support"))`. `into` fields accept
/// anything convertible; `set` fields take the exact type.
///
/// ```ignore
/// crate::test_builder! {
///     pub struct JobRecordBuilder => JobRecord {
///         into { grid_id: String = "778" }
///         set { metadata: BTreeMap<String, String> = BTreeMap::new() }
///     }
/// }
/// ```
#[macro_export]
macro_rules! test_builder {
    (
        pub struct $builder:ident => $target:ident {
            into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? }
            $(set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            inner: $target,
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Builder seeded with fixture values.
            pub fn builder() -> $builder {
                $builder {
                    inner: $target {
                        $( $into_field: $into_default.into(), )*
                        $($( $set_field: $set_default, )*)?
                    },
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $into_field(mut self, value: impl Into<$into_ty>) -> Self {
                    self.inner.$into_field = value.into();
                    self
                }
            )*
            $($(
                pub fn $set_field(mut self, value: $set_ty) -> Self {
                    self.inner.$set_field = value;
                    self
                }
            )*)?

            pub fn build(self) -> $target {
                self.inner
            }
        }
    };
}
