//! Per-call memo
//!
//! Lives for one facade call. Repeated site codes, variable tokens and
//! affiliation lookups within that call hit the store once.

use crate::query::{catalog, sites, VariableToken};
use crate::store::rows::{AffiliationRow, SiteRow};
use crate::store::{Store, StoreResult};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct RequestContext {
    sites: HashMap<String, Option<SiteRow>>,
    tokens: HashMap<String, VariableToken>,
    site_affiliations: HashMap<String, Option<AffiliationRow>>,
    action_affiliations: HashMap<i64, Option<AffiliationRow>>,
    organization_affiliations: HashMap<i64, Option<AffiliationRow>>,
}

impl RequestContext {
    pub fn site(&mut self, store: &Store, code: &str) -> StoreResult<Option<SiteRow>> {
        if let Some(hit) = self.sites.get(code) {
            return Ok(hit.clone());
        }
        let row = sites::site_by_code(store, code)?;
        self.sites.insert(code.to_string(), row.clone());
        Ok(row)
    }

    pub fn token(&mut self, raw: &str) -> VariableToken {
        self.tokens
            .entry(raw.to_string())
            .or_insert_with(|| VariableToken::parse(raw))
            .clone()
    }

    pub fn site_affiliation(
        &mut self,
        store: &Store,
        site_code: &str,
    ) -> StoreResult<Option<AffiliationRow>> {
        if let Some(hit) = self.site_affiliations.get(site_code) {
            return Ok(hit.clone());
        }
        let row = catalog::affiliation_for_site(store, site_code)?;
        self.site_affiliations
            .insert(site_code.to_string(), row.clone());
        Ok(row)
    }

    pub fn action_affiliation(
        &mut self,
        store: &Store,
        action_id: i64,
    ) -> StoreResult<Option<AffiliationRow>> {
        if let Some(hit) = self.action_affiliations.get(&action_id) {
            return Ok(hit.clone());
        }
        let row = catalog::affiliation_for_action(store, action_id)?;
        self.action_affiliations.insert(action_id, row.clone());
        Ok(row)
    }

    pub fn organization_affiliation(
        &mut self,
        store: &Store,
        organization_id: i64,
    ) -> StoreResult<Option<AffiliationRow>> {
        if let Some(hit) = self.organization_affiliations.get(&organization_id) {
            return Ok(hit.clone());
        }
        let row = catalog::affiliation_for_organization(store, organization_id)?;
        self.organization_affiliations
            .insert(organization_id, row.clone());
        Ok(row)
    }
}
