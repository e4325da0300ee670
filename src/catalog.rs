//! The fixed list of tradable securities.

use crate::error::TradeError;
use crate::types::{Price, SecurityId};

/// Seed listing for the default catalog: (id, display name, starting price).
const DEFAULT_LISTINGS: [(&str, &str, i64); 12] = [
    ("techcorp", "TechCorp", 500),
    ("financeplus", "FinancePlus", 750),
    ("greenenergy", "GreenEnergy", 300),
    ("medilife", "MediLife", 1200),
    ("retailmart", "RetailMart", 450),
    ("cloudsoft", "CloudSoft", 850),
    ("autodrive", "AutoDrive", 600),
    ("foodchain", "FoodChain", 350),
    ("buildpro", "BuildPro", 400),
    ("telecomnet", "TelecomNet", 550),
    ("eduverse", "EduVerse", 250),
    ("entertainhub", "EntertainHub", 700),
];

/// A synthetic security with its price path.
///
/// Price, history and last change are only written by the price model.
#[derive(Clone, Debug, PartialEq)]
pub struct Security {
    id: SecurityId,
    name: String,
    seed_price: Price,
    price: Price,
    history: Vec<Price>,
    change_pct: f64,
}

impl Security {
    /// Create a security whose history starts at `price`.
    pub fn new(id: impl Into<SecurityId>, name: impl Into<String>, price: Price) -> Self {
        debug_assert!(price.0 > 0, "seed price must be positive, got {price}");
        Self {
            id: id.into(),
            name: name.into(),
            seed_price: price,
            price,
            history: vec![price],
            change_pct: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> &SecurityId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current price.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Every price this security has had, oldest first. Never empty.
    pub fn history(&self) -> &[Price] {
        &self.history
    }

    /// Last tick's move, in percent.
    #[inline]
    pub fn change_pct(&self) -> f64 {
        self.change_pct
    }

    pub(crate) fn record_tick(&mut self, price: Price, change_pct: f64) {
        self.price = price;
        self.history.push(price);
        self.change_pct = change_pct;
    }

    fn reset(&mut self) {
        self.price = self.seed_price;
        self.history.clear();
        self.history.push(self.seed_price);
        self.change_pct = 0.0;
    }
}

/// Ordered, fixed set of securities.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    securities: Vec<Security>,
}

impl Catalog {
    /// Build a catalog from `(id, name, price)` listings, keeping their order.
    pub fn from_listings<'a>(listings: impl IntoIterator<Item = (&'a str, &'a str, i64)>) -> Self {
        let securities: Vec<Security> = listings
            .into_iter()
            .map(|(id, name, price)| Security::new(id, name, Price(price)))
            .collect();
        debug_assert!(
            securities
                .iter()
                .enumerate()
                .all(|(i, s)| securities[..i].iter().all(|o| o.id != s.id)),
            "security ids must be unique"
        );
        Self { securities }
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Security> {
        self.securities.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Security> {
        self.securities.iter_mut()
    }

    /// Look up a security by identifier.
    pub fn get(&self, id: &str) -> Option<&Security> {
        self.securities.iter().find(|s| s.id.as_str() == id)
    }

    /// Like [`Catalog::get`], but reports a missing id as a trade error.
    pub fn require(&self, id: &SecurityId) -> Result<&Security, TradeError> {
        self.get(id.as_str())
            .ok_or_else(|| TradeError::UnknownSecurity(id.clone()))
    }

    /// Current price of `id`, if listed.
    pub fn price_of(&self, id: &str) -> Option<Price> {
        self.get(id).map(Security::price)
    }

    /// Restore every security to its seed price with a one-entry history.
    pub fn reset(&mut self) {
        for security in &mut self.securities {
            security.reset();
        }
    }
}

impl Default for Catalog {
    /// The twelve-security teaching catalog.
    fn default() -> Self {
        Self::from_listings(DEFAULT_LISTINGS)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Security;
    type IntoIter = std::slice::Iter<'a, Security>;

    fn into_iter(self) -> Self::IntoIter {
        self.securities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_deterministic() {
        let a = Catalog::default();
        let b = Catalog::default();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);

        let first = a.iter().next().unwrap();
        assert_eq!(first.id().as_str(), "techcorp");
        assert_eq!(first.name(), "TechCorp");
        assert_eq!(first.price(), Price(500));
        assert_eq!(first.history(), &[Price(500)]);
        assert_eq!(first.change_pct(), 0.0);
    }

    #[test]
    fn lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.price_of("medilife"), Some(Price(1200)));
        assert!(catalog.get("acme").is_none());

        let err = catalog.require(&SecurityId::from("acme")).unwrap_err();
        assert_eq!(err, TradeError::UnknownSecurity(SecurityId::from("acme")));
    }

    #[test]
    fn reset_restores_seed() {
        let mut catalog = Catalog::from_listings([("a", "A", 200)]);
        for security in catalog.iter_mut() {
            security.record_tick(Price(210), 5.0);
            security.record_tick(Price(199), -5.2);
        }
        assert_eq!(catalog.get("a").unwrap().history().len(), 3);

        catalog.reset();
        let a = catalog.get("a").unwrap();
        assert_eq!(a.price(), Price(200));
        assert_eq!(a.history(), &[Price(200)]);
        assert_eq!(a.change_pct(), 0.0);
    }
}
