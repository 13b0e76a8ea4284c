use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::field::{Field, FieldValue};

/// One write instruction for the host's draft store.
///
/// The reconciliation engine only emits changes, so there is no
/// "no change" variant: a field that should stay as it is produces no
/// update at all.
///
/// # Example
///
/// ```
/// use quickadd_domain::{Field, FieldUpdate, FieldValue, Priority};
///
/// let set = FieldUpdate::Set(FieldValue::Priority(Priority::P1));
/// let clear = FieldUpdate::Clear(Field::Project);
/// assert_eq!(set.field(), Field::Priority);
/// assert!(clear.is_clear());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Write the value into its field
    Set(FieldValue),
    /// Remove the field's value
    Clear(Field),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Set(value) => value.field(),
            FieldUpdate::Clear(field) => *field,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, FieldUpdate::Clear(_))
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Clear(_) => None,
        }
    }

    /// Apply this update to an optional slot.
    ///
    /// ```
    /// use quickadd_domain::{Field, FieldUpdate, FieldValue, Priority};
    ///
    /// let mut slot = None;
    /// FieldUpdate::Set(FieldValue::Priority(Priority::P2)).apply_to(&mut slot, |v| match v {
    ///     FieldValue::Priority(p) => Some(*p),
    ///     _ => None,
    /// });
    /// assert_eq!(slot, Some(Priority::P2));
    ///
    /// FieldUpdate::Clear(Field::Priority).apply_to(&mut slot, |_| None);
    /// assert_eq!(slot, None);
    /// ```
    pub fn apply_to<T>(&self, slot: &mut Option<T>, extract: impl FnOnce(&FieldValue) -> Option<T>) {
        match self {
            FieldUpdate::Set(value) => {
                if let Some(v) = extract(value) {
                    *slot = Some(v);
                }
            }
            FieldUpdate::Clear(_) => *slot = None,
        }
    }
}

impl From<(Field, Option<FieldValue>)> for FieldUpdate {
    /// - Some(value) becomes Set(value)
    /// - None becomes Clear(field)
    fn from((field, value): (Field, Option<FieldValue>)) -> Self {
        match value {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear(field),
        }
    }
}

impl Serialize for FieldUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldUpdate", 3)?;
        state.serialize_field("field", &self.field())?;
        match self {
            FieldUpdate::Set(value) => {
                state.serialize_field("action", "set")?;
                state.serialize_field("value", value)?;
            }
            FieldUpdate::Clear(_) => {
                state.serialize_field("action", "clear")?;
                state.skip_field("value")?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;

    #[test]
    fn test_from_option() {
        let update = FieldUpdate::from((Field::Priority, Some(FieldValue::Priority(Priority::P3))));
        assert_eq!(update, FieldUpdate::Set(FieldValue::Priority(Priority::P3)));

        let update = FieldUpdate::from((Field::Estimation, None));
        assert_eq!(update, FieldUpdate::Clear(Field::Estimation));
        assert_eq!(update.value(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let set = serde_json::to_value(FieldUpdate::Set(FieldValue::Estimation(900))).unwrap();
        assert_eq!(
            set,
            serde_json::json!({"field": "estimation", "action": "set", "value": 900})
        );

        let clear = serde_json::to_value(FieldUpdate::Clear(Field::DueDate)).unwrap();
        assert_eq!(clear, serde_json::json!({"field": "due_date", "action": "clear"}));
    }
}
