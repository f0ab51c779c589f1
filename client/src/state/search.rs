//! File search over the listing endpoints.
//!
//! DESIGN
//! ======
//! The backend has no search endpoint, so a search walks
//! satellites -> subsystems -> files and keeps the rows that match every
//! given id. Only branches that can still match are fetched.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::future::Future;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{FileEntry, Id, Satellite};

/// Raw form inputs, as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub satellite_id: String,
    pub subsystem_id: String,
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchInputError {
    #[error("Satellite ID must be a number")]
    Satellite,
    #[error("Subsystem ID must be a number")]
    Subsystem,
    #[error("File ID must be a number")]
    File,
}

/// Parsed search criteria; `None` matches anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub satellite: Option<Id>,
    pub subsystem: Option<Id>,
    pub file: Option<Id>,
}

/// One matching file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub satellite_id: Id,
    pub satellite_name: String,
    pub subsystem_id: Id,
    pub file_id: Id,
}

impl SearchForm {
    /// # Errors
    ///
    /// Returns the first field that is non-empty but not a non-negative
    /// integer.
    pub fn parse(&self) -> Result<SearchQuery, SearchInputError> {
        Ok(SearchQuery {
            satellite: parse_id(&self.satellite_id).map_err(|()| SearchInputError::Satellite)?,
            subsystem: parse_id(&self.subsystem_id).map_err(|()| SearchInputError::Subsystem)?,
            file: parse_id(&self.file_id).map_err(|()| SearchInputError::File)?,
        })
    }
}

fn parse_id(raw: &str) -> Result<Option<Id>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<Id>().map(Some).map_err(|_| ())
}

impl SearchQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.satellite.is_none() && self.subsystem.is_none() && self.file.is_none()
    }

    fn accepts(filter: Option<Id>, id: Id) -> bool {
        filter.is_none_or(|wanted| wanted == id)
    }
}

/// The listing calls a search needs.
pub trait Catalog {
    fn satellites(&self) -> impl Future<Output = Result<Vec<Satellite>, ApiError>>;
    fn subsystems(&self, sat: Id) -> impl Future<Output = Result<Vec<Id>, ApiError>>;
    fn files(&self, sat: Id, sub: Id) -> impl Future<Output = Result<Vec<FileEntry>, ApiError>>;
}

impl Catalog for ApiClient {
    fn satellites(&self) -> impl Future<Output = Result<Vec<Satellite>, ApiError>> {
        ApiClient::satellites(self)
    }

    fn subsystems(&self, sat: Id) -> impl Future<Output = Result<Vec<Id>, ApiError>> {
        ApiClient::subsystems(self, sat)
    }

    fn files(&self, sat: Id, sub: Id) -> impl Future<Output = Result<Vec<FileEntry>, ApiError>> {
        ApiClient::files(self, sat, sub)
    }
}

/// Run `query` against `catalog`. An empty query matches nothing.
///
/// # Errors
///
/// Any listing failure other than 404 aborts the search.
pub async fn search<C: Catalog>(catalog: &C, query: SearchQuery) -> Result<Vec<SearchHit>, ApiError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let mut hits = Vec::new();
    let satellites = catalog.satellites().await?;
    for sat in satellites.iter().filter(|s| SearchQuery::accepts(query.satellite, s.id)) {
        let subsystems = not_found_as_empty(catalog.subsystems(sat.id).await)?;
        for sub in subsystems.into_iter().filter(|&sub| SearchQuery::accepts(query.subsystem, sub)) {
            let files = not_found_as_empty(catalog.files(sat.id, sub).await)?;
            hits.extend(
                files
                    .into_iter()
                    .filter(|f| SearchQuery::accepts(query.file, f.file_id))
                    .map(|f| SearchHit {
                        satellite_id: sat.id,
                        satellite_name: sat.name.clone(),
                        subsystem_id: sub,
                        file_id: f.file_id,
                    }),
            );
        }
    }
    log::debug!("search {query:?} matched {} files", hits.len());
    Ok(hits)
}

fn not_found_as_empty<T>(result: Result<Vec<T>, ApiError>) -> Result<Vec<T>, ApiError> {
    match result {
        Err(ApiError::NotFound) => Ok(Vec::new()),
        other => other,
    }
}
