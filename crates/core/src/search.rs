//! Point search filter semantics.
//!
//! A filter is a conjunction of optional predicates. Each supplied predicate
//! narrows the result; an absent one does not constrain it. The item
//! predicate is a disjunction: a point matches if it accepts *any* of the
//! requested items.

use crate::error::CoreError;
use crate::point::parse_item_ids;
use crate::types::DbId;

/// Parsed search filter for `GET /points`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointFilter {
    /// Exact state-code match.
    pub uf: Option<String>,
    /// Exact, case-sensitive city match.
    pub city: Option<String>,
    /// Match points accepting any of these items. Never `Some(empty)`.
    pub item_ids: Option<Vec<DbId>>,
}

impl PointFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Blank values count as "not supplied", so `?uf=&items=` is the same as
    /// no query string at all.
    pub fn from_query(
        uf: Option<&str>,
        city: Option<&str>,
        items: Option<&str>,
    ) -> Result<Self, CoreError> {
        let item_ids = match items {
            Some(raw) => {
                let mut ids = parse_item_ids(raw)?;
                ids.sort_unstable();
                ids.dedup();
                Some(ids).filter(|ids| !ids.is_empty())
            }
            None => None,
        };

        Ok(Self {
            uf: non_blank(uf),
            city: non_blank(city),
            item_ids,
        })
    }

    /// True when no predicate is supplied and every point matches.
    pub fn is_unfiltered(&self) -> bool {
        self.uf.is_none() && self.city.is_none() && self.item_ids.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
