//! Budget catalog: dated budget definitions per tag.
//!
//! A budget file declares, for each tag, a list of budgets that take effect on
//! a given date. On any day the active budget for a tag is the most recent one
//! that has taken effect and does not exclude that day of the week.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::CatalogError;

/// One budget record as written in the budget file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BudgetSource {
    /// Date the budget takes effect.
    pub date: NaiveDate,
    pub hours: Option<f64>,
    pub minutes: Option<f64>,
    pub seconds: Option<f64>,
    /// Weekday ordinals on which the budget does not apply (0 = Monday).
    pub exclude: Option<Vec<i64>>,
}

impl BudgetSource {
    /// Total size in seconds, or an error naming the offending tag and date.
    fn size_seconds(&self, tag: &str) -> Result<f64, CatalogError> {
        let fields = [
            ("hours", self.hours, 3600.0),
            ("minutes", self.minutes, 60.0),
            ("seconds", self.seconds, 1.0),
        ];

        if fields.iter().all(|(_, value, _)| value.is_none()) {
            return Err(CatalogError::MissingSize {
                tag: tag.to_string(),
                date: self.date,
            });
        }

        let mut total = 0.0;
        for (field, value, factor) in fields {
            let Some(value) = value else { continue };
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidSize {
                    tag: tag.to_string(),
                    date: self.date,
                    field,
                    value,
                });
            }
            total += value * factor;
        }
        Ok(total)
    }
}

/// Budget file contents: tags in the order they first appear in the file.
///
/// A tag that appears more than once has its records merged under its first
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSources(Vec<(String, Vec<BudgetSource>)>);

impl BudgetSources {
    /// Appends records for `tag`, merging with earlier records for the same tag.
    pub fn push(&mut self, tag: impl Into<String>, records: Vec<BudgetSource>) {
        let tag = tag.into();
        if let Some((_, existing)) = self.0.iter_mut().find(|(t, _)| *t == tag) {
            existing.extend(records);
        } else {
            self.0.push((tag, records));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BudgetSource])> {
        self.0.iter().map(|(tag, records)| (tag.as_str(), records.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for BudgetSources {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SourcesVisitor;

        impl<'de> Visitor<'de> for SourcesVisitor {
            type Value = BudgetSources;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from tag names to lists of budgets")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sources = BudgetSources::default();
                while let Some((tag, records)) = map.next_entry::<String, Vec<BudgetSource>>()? {
                    sources.push(tag, records);
                }
                Ok(sources)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BudgetSources::default())
            }
        }

        deserializer.deserialize_any(SourcesVisitor)
    }
}

/// Set of weekdays a budget does not apply on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExcludedDays(u8);

impl ExcludedDays {
    /// No excluded days.
    pub const NONE: Self = Self(0);

    /// Builds the set from weekday ordinals, 0 = Monday through 6 = Sunday.
    ///
    /// Returns the first out-of-range ordinal as the error.
    pub fn from_ordinals(ordinals: &[i64]) -> Result<Self, i64> {
        let mut bits = 0u8;
        for &ordinal in ordinals {
            let shift = u8::try_from(ordinal)
                .ok()
                .filter(|o| *o < 7)
                .ok_or(ordinal)?;
            bits |= 1 << shift;
        }
        Ok(Self(bits))
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A validated, dated budget for one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDefinition {
    pub tag: String,
    pub effective_date: NaiveDate,
    /// Budgeted time per applicable day, in seconds.
    pub size_seconds: f64,
    pub exclude: ExcludedDays,
}

impl BudgetDefinition {
    fn from_source(tag: &str, source: &BudgetSource) -> Result<Self, CatalogError> {
        let size_seconds = source.size_seconds(tag)?;
        let exclude = ExcludedDays::from_ordinals(source.exclude.as_deref().unwrap_or_default())
            .map_err(|value| CatalogError::InvalidWeekday {
                tag: tag.to_string(),
                date: source.date,
                value,
            })?;

        Ok(Self {
            tag: tag.to_string(),
            effective_date: source.date,
            size_seconds,
            exclude,
        })
    }

    /// Whether this definition is in effect on `date` and does not exclude it.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.effective_date <= date && !self.exclude.contains(date.weekday())
    }
}

/// Definitions for one tag, newest effective date first.
#[derive(Debug, Clone)]
struct TagBudgets {
    tag: String,
    definitions: Vec<BudgetDefinition>,
}

/// All budget definitions, keyed by tag.
///
/// Tags keep budget file order; each tag's definitions are sorted by effective
/// date descending, with equal dates kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct BudgetCatalog {
    tags: Vec<TagBudgets>,
    index: HashMap<String, usize>,
}

impl BudgetCatalog {
    /// Validates budget file records and builds the catalog.
    ///
    /// Fails on the first malformed record; nothing is defaulted.
    pub fn from_sources(sources: &BudgetSources) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for (tag, records) in sources.iter() {
            let mut definitions = records
                .iter()
                .map(|record| BudgetDefinition::from_source(tag, record))
                .collect::<Result<Vec<_>, _>>()?;
            definitions.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));

            tracing::debug!(tag, definitions = definitions.len(), "loaded budgets");
            catalog.index.insert(tag.to_string(), catalog.tags.len());
            catalog.tags.push(TagBudgets {
                tag: tag.to_string(),
                definitions,
            });
        }

        Ok(catalog)
    }

    /// Tag names in budget file order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.tag.as_str())
    }

    /// Definitions for `tag`, newest first. Empty for unknown tags.
    pub fn definitions(&self, tag: &str) -> &[BudgetDefinition] {
        self.index
            .get(tag)
            .map(|&i| self.tags[i].definitions.as_slice())
            .unwrap_or_default()
    }

    /// The budget definition active for `tag` on `date`, if any.
    pub fn resolve(&self, tag: &str, date: NaiveDate) -> Option<&BudgetDefinition> {
        self.definitions(tag).iter().find(|d| d.applies_on(date))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
