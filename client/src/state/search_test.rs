use std::cell::RefCell;
use std::collections::HashMap;

use futures::executor::block_on;

use super::*;

#[derive(Default)]
struct FakeCatalog {
    satellites: Vec<Satellite>,
    subsystems: HashMap<Id, Vec<Id>>,
    files: HashMap<(Id, Id), Vec<Id>>,
    file_calls: RefCell<Vec<(Id, Id)>>,
    fail_files: bool,
}

impl FakeCatalog {
    fn fleet() -> Self {
        Self {
            satellites: vec![
                Satellite { id: 1, name: "UM5-EOSAT".to_owned() },
                Satellite { id: 2, name: "MOHAMMEDIA-SAT".to_owned() },
            ],
            subsystems: HashMap::from([(1, vec![3, 6]), (2, vec![6])]),
            files: HashMap::from([((1, 3), vec![7]), ((1, 6), vec![14, 15]), ((2, 6), vec![5, 14])]),
            ..Self::default()
        }
    }
}

impl Catalog for FakeCatalog {
    async fn satellites(&self) -> Result<Vec<Satellite>, ApiError> {
        Ok(self.satellites.clone())
    }

    async fn subsystems(&self, sat: Id) -> Result<Vec<Id>, ApiError> {
        self.subsystems.get(&sat).cloned().ok_or(ApiError::NotFound)
    }

    async fn files(&self, sat: Id, sub: Id) -> Result<Vec<FileEntry>, ApiError> {
        self.file_calls.borrow_mut().push((sat, sub));
        if self.fail_files {
            return Err(ApiError::Status { status: 500, detail: None });
        }
        let ids = self.files.get(&(sat, sub)).ok_or(ApiError::NotFound)?;
        Ok(ids.iter().map(|&file_id| FileEntry { file_id }).collect())
    }
}

fn form(sat: &str, sub: &str, file: &str) -> SearchForm {
    SearchForm { satellite_id: sat.to_owned(), subsystem_id: sub.to_owned(), file_id: file.to_owned() }
}

// =============================================================
// Form parsing
// =============================================================

#[test]
fn blank_form_is_empty_query() {
    let query = form("", "  ", "").parse().unwrap();
    assert!(query.is_empty());
}

#[test]
fn numeric_fields_are_parsed() {
    let query = form("2", " 6 ", "14").parse().unwrap();
    assert_eq!(query, SearchQuery { satellite: Some(2), subsystem: Some(6), file: Some(14) });
}

#[test]
fn non_numeric_fields_are_rejected() {
    assert_eq!(form("", "six", "").parse(), Err(SearchInputError::Subsystem));
    assert_eq!(form("", "", "-1").parse(), Err(SearchInputError::File));
    assert_eq!(SearchInputError::File.to_string(), "File ID must be a number");
}

// =============================================================
// Search walk
// =============================================================

#[test]
fn empty_query_matches_nothing_without_requests() {
    let catalog = FakeCatalog::fleet();
    let hits = block_on(search(&catalog, SearchQuery::default())).unwrap();
    assert!(hits.is_empty());
    assert!(catalog.file_calls.borrow().is_empty());
}

#[test]
fn file_id_searches_every_satellite() {
    let catalog = FakeCatalog::fleet();
    let query = SearchQuery { file: Some(14), ..SearchQuery::default() };
    let hits = block_on(search(&catalog, query)).unwrap();
    assert_eq!(
        hits,
        vec![
            SearchHit { satellite_id: 1, satellite_name: "UM5-EOSAT".to_owned(), subsystem_id: 6, file_id: 14 },
            SearchHit { satellite_id: 2, satellite_name: "MOHAMMEDIA-SAT".to_owned(), subsystem_id: 6, file_id: 14 },
        ]
    );
}

#[test]
fn subsystem_filter_skips_other_branches() {
    let catalog = FakeCatalog::fleet();
    let query = SearchQuery { satellite: Some(1), subsystem: Some(3), file: None };
    let hits = block_on(search(&catalog, query)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_id, 7);
    assert_eq!(*catalog.file_calls.borrow(), vec![(1, 3)]);
}

#[test]
fn no_match_is_empty_result() {
    let catalog = FakeCatalog::fleet();
    let query = SearchQuery { satellite: Some(9), ..SearchQuery::default() };
    assert!(block_on(search(&catalog, query)).unwrap().is_empty());
}

#[test]
fn missing_listing_counts_as_empty() {
    let mut catalog = FakeCatalog::fleet();
    catalog.subsystems.remove(&2);
    let query = SearchQuery { subsystem: Some(6), ..SearchQuery::default() };
    let hits = block_on(search(&catalog, query)).unwrap();
    assert!(hits.iter().all(|h| h.satellite_id == 1));
}

#[test]
fn listing_failure_aborts_search() {
    let catalog = FakeCatalog { fail_files: true, ..FakeCatalog::fleet() };
    let query = SearchQuery { satellite: Some(2), ..SearchQuery::default() };
    assert_eq!(
        block_on(search(&catalog, query)),
        Err(ApiError::Status { status: 500, detail: None })
    );
}
