use stockfile_core::{DomainError, DomainResult, Entity, ItemId};

/// One inventory entry.
///
/// `id` and `name` are fixed at construction; quantity and price can be
/// changed in place. Quantity is not range-checked, so negative stock is
/// stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: ItemId,
    name: String,
    quantity: i64,
    unit_price: f64,
}

impl Record {
    /// Build a record from explicit field values.
    ///
    /// The name must fit on a single line of the backing file, so `\n` and
    /// `\r` are rejected.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.contains(['\n', '\r']) {
            return Err(DomainError::validation("name cannot contain a line break"));
        }
        Ok(Self {
            id,
            name,
            quantity,
            unit_price,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = unit_price;
    }
}

impl Entity for Record {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Operator-facing layout used by the menu's list and search views.
impl core::fmt::Display for Record {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ID: {}\nName: {}\nStock: {}\nUnit Price: ${}",
            self.id, self.name, self.quantity, self.unit_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> Record {
        Record::new(ItemId::new(1), "Hex Bolt M8", 100, 0.5).unwrap()
    }

    #[test]
    fn accessors_return_constructed_values() {
        let record = bolt();
        assert_eq!(record.id_typed(), ItemId::new(1));
        assert_eq!(Entity::id(&record), ItemId::new(1));
        assert_eq!(record.name(), "Hex Bolt M8");
        assert_eq!(record.quantity(), 100);
        assert_eq!(record.unit_price(), 0.5);
    }

    #[test]
    fn setters_change_only_quantity_and_price() {
        let mut record = bolt();
        record.set_quantity(-3);
        record.set_unit_price(1.25);

        assert_eq!(record.quantity(), -3);
        assert_eq!(record.unit_price(), 1.25);
        assert_eq!(record.id_typed(), ItemId::new(1));
        assert_eq!(record.name(), "Hex Bolt M8");
    }

    #[test]
    fn name_with_line_break_is_rejected() {
        for name in ["two\nlines", "carriage\rreturn", "\n"] {
            let err = Record::new(ItemId::new(1), name, 1, 1.0).unwrap_err();
            match err {
                DomainError::Validation(_) => {}
                other => panic!("expected Validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_name_is_allowed() {
        let record = Record::new(ItemId::new(5), "", 0, 0.0).unwrap();
        assert_eq!(record.name(), "");
    }

    #[test]
    fn display_uses_menu_layout() {
        let record = Record::new(ItemId::new(2), "Nut", 200, 0.25).unwrap();
        assert_eq!(
            record.to_string(),
            "ID: 2\nName: Nut\nStock: 200\nUnit Price: $0.25"
        );
    }

    #[test]
    fn has_id_matches_identity_only() {
        let record = bolt();
        assert!(record.has_id(ItemId::new(1)));
        assert!(!record.has_id(ItemId::new(2)));
    }
}
