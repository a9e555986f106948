//! # Storefront Pricing Settings
//!
//! The public settings document (tax rate, shipping, prepaid discount, COD)
//! and a time-bounded cache for it.
//!
//! ## Cache Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SettingsService::current(now)                                         │
//! │       │                                                                 │
//! │       ├── cache fresh (now - fetched_at < ttl) ──► cached settings     │
//! │       │                                                                 │
//! │       └── stale / empty ──► source.fetch()                             │
//! │                 │                                                       │
//! │                 ├── Ok  ──► store (value, now) ──► new settings        │
//! │                 │                                                       │
//! │                 └── Err ──► warn! ──► stale value, else defaults       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller passes `now`. Nothing here reads the wall clock, so expiry
//! is tested by moving `now` forward.
//!
//! ## Wire Format
//! Amounts in the settings document are rupees (`5000` = ₹5000) and rates
//! are percentages (`18` = 18%), the same as the admin panel writes them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::money::Money;
use crate::types::TaxRate;

/// How long fetched settings stay fresh.
pub const DEFAULT_SETTINGS_TTL_SECS: i64 = 5 * 60;

// =============================================================================
// Settings Document
// =============================================================================

/// Delivery speed picked at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingSpeed {
    #[default]
    Standard,
    Express,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSettings {
    /// Standard shipping is free at or above this subtotal.
    #[serde(with = "rupees", default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Money,

    #[serde(with = "rupees", default = "default_standard_rate")]
    pub standard_shipping_rate: Money,

    #[serde(with = "rupees", default = "default_express_rate")]
    pub express_shipping_rate: Money,
}

fn default_free_shipping_threshold() -> Money {
    Money::from_rupees(5000)
}

fn default_standard_rate() -> Money {
    Money::from_rupees(100)
}

fn default_express_rate() -> Money {
    Money::from_rupees(200)
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            free_shipping_threshold: default_free_shipping_threshold(),
            standard_shipping_rate: default_standard_rate(),
            express_shipping_rate: default_express_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// GST rate applied to the whole catalogue.
    #[serde(with = "percent", default = "default_tax_rate")]
    pub tax_rate: TaxRate,

    /// Discount for paying online, in basis points.
    #[serde(rename = "prepaid_discount", with = "percent_bps", default = "default_prepaid_discount")]
    pub prepaid_discount_bps: u32,

    #[serde(default = "default_true")]
    pub cod_enabled: bool,

    /// Largest order accepted as cash on delivery.
    #[serde(with = "rupees", default = "default_cod_limit")]
    pub cod_limit: Money,
}

fn default_tax_rate() -> TaxRate {
    TaxRate::GST_STANDARD
}

fn default_prepaid_discount() -> u32 {
    500
}

fn default_true() -> bool {
    true
}

fn default_cod_limit() -> Money {
    Money::from_rupees(10_000)
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            tax_rate: default_tax_rate(),
            prepaid_discount_bps: default_prepaid_discount(),
            cod_enabled: default_true(),
            cod_limit: default_cod_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            currency: default_currency(),
        }
    }
}

/// Public storefront settings.
///
/// `Default` is the fallback the storefront shows when the settings
/// document cannot be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicSettings {
    #[serde(default)]
    pub shipping: ShippingSettings,
    #[serde(default)]
    pub payment: PaymentSettings,
    #[serde(default)]
    pub general: GeneralSettings,
}

impl PublicSettings {
    /// Shipping fee for an order subtotal.
    ///
    /// ## Behavior
    /// - Standard: free at or above `free_shipping_threshold`
    /// - Express: always charged
    ///
    /// ```rust
    /// use tripund_core::money::Money;
    /// use tripund_core::settings::{PublicSettings, ShippingSpeed};
    ///
    /// let s = PublicSettings::default();
    /// assert_eq!(s.shipping_fee(Money::from_rupees(4999), ShippingSpeed::Standard), Money::from_rupees(100));
    /// assert_eq!(s.shipping_fee(Money::from_rupees(5000), ShippingSpeed::Standard), Money::zero());
    /// ```
    pub fn shipping_fee(&self, subtotal: Money, speed: ShippingSpeed) -> Money {
        match speed {
            ShippingSpeed::Standard if subtotal >= self.shipping.free_shipping_threshold => {
                Money::zero()
            }
            ShippingSpeed::Standard => self.shipping.standard_shipping_rate,
            ShippingSpeed::Express => self.shipping.express_shipping_rate,
        }
    }

    /// Discount granted for prepaid orders, rounded half up.
    pub fn prepaid_discount(&self, amount: Money) -> Money {
        amount.percentage_of_bps(self.payment.prepaid_discount_bps)
    }

    /// Whether cash on delivery may be offered for this amount.
    pub fn cod_available(&self, amount: Money) -> bool {
        self.payment.cod_enabled && amount <= self.payment.cod_limit
    }

    /// Tax on a tax-EXCLUSIVE amount at the configured rate.
    ///
    /// Catalogue prices are inclusive; use [`crate::gst`] for those. This is
    /// for amounts quoted before tax, such as manual admin adjustments.
    pub fn exclusive_tax(&self, amount: Money) -> Money {
        amount.calculate_tax(self.payment.tax_rate)
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Money as a rupee number (`5000`, `99.5`).
mod rupees {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::money::Money;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        if value.paise_part() == 0 {
            serializer.serialize_i64(value.rupees())
        } else {
            serializer.serialize_f64(value.paise() as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        if !rupees.is_finite() || rupees < 0.0 {
            return Err(de::Error::custom("amount must be a non-negative number of rupees"));
        }
        let paise = (rupees * 100.0).round();
        if paise > i64::MAX as f64 {
            return Err(de::Error::custom("amount too large"));
        }
        Ok(Money::from_paise(paise as i64))
    }
}

/// Basis points as a percentage number (`5` = 500 bps).
mod percent_bps {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::TaxRate;

    pub fn serialize<S: Serializer>(bps: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*bps as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        TaxRate::from_percentage(pct)
            .map(|rate| rate.bps())
            .map_err(de::Error::custom)
    }
}

/// TaxRate as a percentage number (`18`).
mod percent {
    use serde::{Deserializer, Serializer};

    use crate::types::TaxRate;

    pub fn serialize<S: Serializer>(rate: &TaxRate, serializer: S) -> Result<S::Ok, S::Error> {
        super::percent_bps::serialize(&rate.bps(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TaxRate, D::Error> {
        super::percent_bps::deserialize(deserializer).map(TaxRate::from_bps)
    }
}

// =============================================================================
// Cache
// =============================================================================

#[derive(Debug, Clone)]
struct CachedValue<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T> CachedValue<T> {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// A single cached value with a fetch timestamp and a time-to-live.
///
/// Owned by whichever service needs it; there is no global instance.
#[derive(Debug, Clone)]
pub struct SettingsCache<T> {
    entry: Option<CachedValue<T>>,
    ttl: Duration,
}

impl<T> SettingsCache<T> {
    pub fn new(ttl: Duration) -> Self {
        SettingsCache { entry: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True if a value is cached and younger than the TTL at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.is_fresh(now, self.ttl))
    }

    /// The cached value regardless of age.
    pub fn peek(&self) -> Option<&T> {
        self.entry.as_ref().map(|entry| &entry.value)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|entry| entry.fetched_at)
    }

    /// Returns the cached value if fresh at `now`, otherwise calls `fetch`
    /// and caches its result stamped with `now`.
    ///
    /// A failed fetch leaves the previous (stale) entry in place.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{Duration, TimeZone, Utc};
    /// use tripund_core::settings::SettingsCache;
    ///
    /// let mut cache = SettingsCache::new(Duration::minutes(5));
    /// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    ///
    /// let v = cache.get_or_refresh(t0, || Ok::<_, ()>(1)).unwrap();
    /// assert_eq!(*v, 1);
    /// // Still fresh: the fetcher is not called
    /// let v = cache.get_or_refresh(t0 + Duration::minutes(4), || Ok::<_, ()>(2)).unwrap();
    /// assert_eq!(*v, 1);
    /// // Expired
    /// let v = cache.get_or_refresh(t0 + Duration::minutes(5), || Ok::<_, ()>(3)).unwrap();
    /// assert_eq!(*v, 3);
    /// ```
    pub fn get_or_refresh<E, F>(&mut self, now: DateTime<Utc>, fetch: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let entry = match self.entry.take() {
            Some(entry) if entry.is_fresh(now, self.ttl) => entry,
            stale => match fetch() {
                Ok(value) => CachedValue {
                    value,
                    fetched_at: now,
                },
                Err(err) => {
                    self.entry = stale;
                    return Err(err);
                }
            },
        };

        Ok(&self.entry.insert(entry).value)
    }

    /// Drops the cached value; the next lookup fetches.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<T> Default for SettingsCache<T> {
    fn default() -> Self {
        SettingsCache::new(Duration::seconds(DEFAULT_SETTINGS_TTL_SECS))
    }
}

// =============================================================================
// Service
// =============================================================================

/// Where settings come from: an API client, a config file, a test stub.
pub trait SettingsSource {
    type Error: std::fmt::Display;

    fn fetch(&self) -> Result<PublicSettings, Self::Error>;
}

/// Settings lookup with caching and a never-fail fallback.
#[derive(Debug)]
pub struct SettingsService<S> {
    source: S,
    cache: SettingsCache<PublicSettings>,
}

impl<S: SettingsSource> SettingsService<S> {
    /// Creates a service with the default five-minute TTL.
    pub fn new(source: S) -> Self {
        SettingsService {
            source,
            cache: SettingsCache::default(),
        }
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        SettingsService {
            source,
            cache: SettingsCache::new(ttl),
        }
    }

    /// Current settings at `now`.
    ///
    /// ## Behavior
    /// - Fresh cache: cached value, no fetch
    /// - Fetch succeeds: new value, cached
    /// - Fetch fails: last cached value if any, else defaults (not cached,
    ///   so the next call retries)
    pub fn current(&mut self, now: DateTime<Utc>) -> PublicSettings {
        let source = &self.source;
        let fetched = self
            .cache
            .get_or_refresh(now, || source.fetch())
            .map(PublicSettings::clone);

        match fetched {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "Failed to fetch settings");
                match self.cache.peek() {
                    Some(stale) => {
                        debug!(fetched_at = ?self.cache.fetched_at(), "Serving stale settings");
                        stale.clone()
                    }
                    None => PublicSettings::default(),
                }
            }
        }
    }

    /// Forces the next [`current`](Self::current) call to fetch.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
