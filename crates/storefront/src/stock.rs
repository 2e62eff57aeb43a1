use serde::Serialize;

/// At or below this many units a product shows a "last units" badge.
pub const LOW_STOCK_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "units", rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low(u64),
    Available(u64),
}

impl StockLevel {
    pub fn of(stock: u64) -> Self {
        match stock {
            0 => StockLevel::OutOfStock,
            n if n <= LOW_STOCK_THRESHOLD => StockLevel::Low(n),
            n => StockLevel::Available(n),
        }
    }

    pub fn units(self) -> u64 {
        match self {
            StockLevel::OutOfStock => 0,
            StockLevel::Low(n) | StockLevel::Available(n) => n,
        }
    }

    pub fn can_supply(self, quantity: u64) -> bool {
        quantity > 0 && quantity <= self.units()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(StockLevel::of(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::of(1), StockLevel::Low(1));
        assert_eq!(StockLevel::of(5), StockLevel::Low(5));
        assert_eq!(StockLevel::of(6), StockLevel::Available(6));
    }

    #[test]
    fn supply_bounds() {
        assert!(!StockLevel::of(0).can_supply(1));
        assert!(!StockLevel::of(3).can_supply(0));
        assert!(StockLevel::of(3).can_supply(3));
        assert!(!StockLevel::of(3).can_supply(4));
    }
}
