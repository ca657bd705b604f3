use crate::decode::DecodedRow;
use crate::error::SqlModelError;
use crate::sensing::{FieldDecl, FieldDescriptor, FieldType};
use crate::types::RowValues;

/// A statically declared table-backed type.
///
/// Most models are declared with [`impl_model!`](crate::impl_model); implement this by hand
/// when a field needs [`FieldDecl::named`] or a custom column name.
pub trait Model: Sized + Send + Sync + 'static {
    const TABLE_NAME: &'static str;

    /// Name of the identifier column.
    const ID_COLUMN_NAME: &'static str = "id";

    /// Type of the synthetic identifier column added when no field is the identifier.
    const ID_COLUMN_TYPE: FieldDescriptor = <i64 as FieldType>::DESCRIPTOR;

    /// Field declarations, in declaration order.
    fn fields() -> Vec<FieldDecl>;

    /// Raw field values keyed by column name, in declaration order.
    fn to_values(&self) -> Vec<(&'static str, RowValues)>;

    /// Rebuild the model from a decoded row.
    ///
    /// # Errors
    ///
    /// Returns `SqlModelError::MissingColumn` or `SqlModelError::TypeMismatch` when a field
    /// cannot be reconstructed.
    fn from_row(row: &mut DecodedRow) -> Result<Self, SqlModelError>;
}

/// Implement [`Model`] for a plain struct whose fields are all [`FieldType`]s.
///
/// ```rust
/// use sql_model::prelude::*;
///
/// pub struct Meal {
///     pub name: String,
///     pub rating: i32,
/// }
///
/// impl_model!(Meal, "Meals", id = "name", { name: String, rating: i32 });
///
/// assert_eq!(<Meal as Model>::ID_COLUMN_NAME, "name");
/// assert_eq!(Meal::fields().len(), 2);
/// ```
///
/// Forms:
/// * `impl_model!(T, "table", { field: Type, .. })` adds an auto-increment `i64` `id` column.
/// * `impl_model!(T, "table", id = "col", { .. })` renames the identifier column; if a field
///   carries that name it becomes the primary key instead.
/// * `impl_model!(T, "table", id = "col" => Type, { .. })` also sets the identifier type.
#[macro_export]
macro_rules! impl_model {
    (@impl $model:ty, $table:expr, $id:expr, $id_type:ty, { $($field:ident : $fty:ty),* }) => {
        impl $crate::Model for $model {
            const TABLE_NAME: &'static str = $table;
            const ID_COLUMN_NAME: &'static str = $id;
            const ID_COLUMN_TYPE: $crate::FieldDescriptor =
                <$id_type as $crate::FieldType>::DESCRIPTOR;

            fn fields() -> ::std::vec::Vec<$crate::FieldDecl> {
                ::std::vec![$($crate::FieldDecl::of::<$fty>(stringify!($field))),*]
            }

            fn to_values(&self) -> ::std::vec::Vec<(&'static str, $crate::RowValues)> {
                ::std::vec![$((stringify!($field), $crate::FieldType::to_raw(&self.$field))),*]
            }

            fn from_row(
                row: &mut $crate::DecodedRow,
            ) -> ::std::result::Result<Self, $crate::SqlModelError> {
                Ok(Self {
                    $($field: row.take::<$fty>(stringify!($field))?,)*
                })
            }
        }
    };
    ($model:ty, $table:expr, id = $id:expr => $id_type:ty, { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::impl_model!(@impl $model, $table, $id, $id_type, { $($field : $fty),* });
    };
    ($model:ty, $table:expr, id = $id:expr, { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::impl_model!(@impl $model, $table, $id, i64, { $($field : $fty),* });
    };
    ($model:ty, $table:expr, { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::impl_model!(@impl $model, $table, "id", i64, { $($field : $fty),* });
    };
}
