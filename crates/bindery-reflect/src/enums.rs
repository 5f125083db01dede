//! Registry of enumerable value types.
//!
//! Choice components bound to an enum-typed property can offer every
//! constant of that type. Types opt in through [`EnumValues`] and
//! [`register_enum_values`]; registering `E` also covers `Option<E>`.

use std::any::{Any, TypeId};
use std::sync::LazyLock;

use crate::cache::SnapshotCache;
use crate::value::{Value, ValueType};

/// A value type with a closed, ordered set of constants.
pub trait EnumValues: Any + Clone {
    fn values() -> Vec<Self>;
}

struct EnumEntry {
    values: fn() -> Vec<Value>,
    null: fn() -> Value,
}

static ENUMS: LazyLock<SnapshotCache<TypeId, EnumEntry>> = LazyLock::new(SnapshotCache::new);

fn plain_values<E: EnumValues>() -> Vec<Value> {
    E::values().into_iter().map(Value::new).collect()
}

fn optional_values<E: EnumValues>() -> Vec<Value> {
    E::values().into_iter().map(|e| Value::new(Some(e))).collect()
}

fn optional_null<E: EnumValues>() -> Value {
    Value::new(None::<E>)
}

/// Register the constants of `E` (and of `Option<E>`).
pub fn register_enum_values<E: EnumValues>() {
    ENUMS.get_or_insert_with(TypeId::of::<E>(), || EnumEntry {
        values: plain_values::<E>,
        null: Value::null,
    });
    ENUMS.get_or_insert_with(TypeId::of::<Option<E>>(), || EnumEntry {
        values: optional_values::<E>,
        null: optional_null::<E>,
    });
}

/// The constants of `value_type`, optionally preceded by its "no value".
///
/// For `E` the "no value" entry is [`Value::null`]; for `Option<E>` it is
/// `None`. Returns `None` for unregistered types.
#[must_use]
pub fn enum_constants(value_type: ValueType, include_null: bool) -> Option<Vec<Value>> {
    let entry = ENUMS.get(&value_type.id())?;
    let mut values = Vec::new();
    if include_null {
        values.push((entry.null)());
    }
    values.extend((entry.values)());
    Some(values)
}
