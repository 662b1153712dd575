//! Translation of [`SearchFilters`] into a BDJobs search URL.
//!
//! The upstream endpoint expects every parameter to be present, even when
//! empty, and in a fixed order. Sending a parameter empty is not the same as
//! leaving it out, so [`build_search_url`] always emits the full list.

use itertools::Itertools;
use jobpulse_locations::LocationIndex;
use url::form_urlencoded;

use super::filters::SearchFilters;

pub const SEARCH_ENDPOINT: &str = "/Jobs/api/JobSearch/GetJobSearch";

fn escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

const fn flag(enabled: bool) -> &'static str {
    if enabled { "true" } else { "false" }
}

/// Build the complete search URL. Pure and total: unknown locations and unset
/// filters become empty parameters, never errors.
pub fn build_search_url(
    api_base_url: &str,
    filters: &SearchFilters,
    locations: &LocationIndex,
) -> String {
    format!(
        "{}{}?{}",
        api_base_url.trim_end_matches('/'),
        SEARCH_ENDPOINT,
        query_params(filters, locations)
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join("&")
    )
}

/// The ordered `(name, value)` pairs of the search query. Values are already
/// escaped where the upstream expects it.
pub fn query_params(
    filters: &SearchFilters,
    locations: &LocationIndex,
) -> Vec<(&'static str, String)> {
    let location = locations.resolve(&filters.location).unwrap_or_default();

    vec![
        ("Icat", String::new()),
        ("industry", String::new()),
        ("category", String::new()),
        ("org", String::new()),
        ("jobNature", String::new()),
        ("Fcat", String::new()),
        ("location", location.to_string()),
        ("Qot", String::new()),
        ("jobType", escape(filters.job_type.code())),
        ("jobLevel", escape(filters.job_level.code())),
        ("postedWithin", filters.posted_within.code().to_string()),
        ("deadline", String::new()),
        ("keyword", escape(&filters.keyword)),
        ("pg", filters.page.to_string()),
        ("qAge", filters.age.encode()),
        ("Salary", filters.salary.encode()),
        ("experience", filters.experience.encode()),
        ("gender", filters.gender.code().to_string()),
        ("MExp", String::new()),
        ("genderB", String::new()),
        ("MPostings", String::new()),
        ("MCat", String::new()),
        ("version", String::new()),
        ("rpp", filters.page_size.to_string()),
        ("Newspaper", String::new()),
        (
            "armyp",
            (if filters.retired_army_preferred { "yes" } else { "" }).to_string(),
        ),
        ("QDisablePerson", String::new()),
        ("pwd", String::new()),
        ("workplace", filters.work_arrangement.code().to_string()),
        (
            "facilitiesForPWD",
            (if filters.pwd_facilities { "1" } else { "" }).to_string(),
        ),
        ("SaveFilterList", String::new()),
        ("UserFilterName", String::new()),
        ("HUserFilterName", String::new()),
        ("earlyJobAccess", String::new()),
        ("isPro", u8::from(filters.pro_only).to_string()),
        ("ToggleJobs", flag(filters.toggle_jobs).to_string()),
        ("isFresher", flag(filters.fresher_only).to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filters::{Gender, JobLevel, JobType, PostedWithin, Range, WorkArrangement};

    const BASE: &str = "https://api.bdjobs.com";

    fn param(url: &str, name: &str) -> String {
        let query = url.split_once('?').expect("url has a query").1;
        query
            .split('&')
            .find_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                (key == name).then(|| value.to_string())
            })
            .unwrap_or_else(|| panic!("parameter {name} missing from {url}"))
    }

    fn build(filters: &SearchFilters) -> String {
        build_search_url(BASE, filters, LocationIndex::embedded())
    }

    #[test]
    fn test_endpoint_and_all_parameters_present() {
        let url = build(&SearchFilters::new("engineer"));
        assert!(url.starts_with("https://api.bdjobs.com/Jobs/api/JobSearch/GetJobSearch?Icat=&"));

        let keys: Vec<_> = url
            .split_once('?')
            .unwrap()
            .1
            .split('&')
            .map(|pair| pair.split_once('=').unwrap().0)
            .collect();
        assert_eq!(keys.len(), 37);
        assert_eq!(keys.first(), Some(&"Icat"));
        assert_eq!(keys.last(), Some(&"isFresher"));
        assert_eq!(keys.iter().unique().count(), keys.len());
    }

    #[test]
    fn test_defaults_encode_empty() {
        let url = build(&SearchFilters::new("engineer"));
        for name in [
            "location",
            "jobType",
            "jobLevel",
            "postedWithin",
            "qAge",
            "Salary",
            "experience",
            "gender",
            "armyp",
            "workplace",
            "facilitiesForPWD",
        ] {
            assert_eq!(param(&url, name), "", "{name} should be empty by default");
        }
        assert_eq!(param(&url, "pg"), "1");
        assert_eq!(param(&url, "rpp"), "50");
        assert_eq!(param(&url, "isPro"), "0");
        assert_eq!(param(&url, "ToggleJobs"), "true");
        assert_eq!(param(&url, "isFresher"), "false");
    }

    #[test]
    fn test_ranges_encode_when_any_endpoint_nonzero() {
        let filters = SearchFilters::builder("x")
            .age(Range::new(0, 0))
            .salary(Range::new(0, 30000))
            .experience(Range::new(2, 0))
            .build();
        let url = build(&filters);
        assert_eq!(param(&url, "qAge"), "");
        assert_eq!(param(&url, "Salary"), "0/30000");
        assert_eq!(param(&url, "experience"), "2/0");
    }

    #[test]
    fn test_location_resolution() {
        let url = build(&SearchFilters::builder("x").location("Dhaka").build());
        assert_eq!(param(&url, "location"), "14");

        let url = build(&SearchFilters::builder("x").location(" sylhet division ").build());
        assert_eq!(param(&url, "location"), "1008");

        for unknown in ["", "   ", "Atlantis"] {
            let url = build(&SearchFilters::builder("x").location(unknown).build());
            assert_eq!(param(&url, "location"), "");
        }
    }

    #[test]
    fn test_keyword_is_escaped() {
        let url = build(&SearchFilters::new("c++ & rust/go"));
        assert_eq!(param(&url, "keyword"), "c%2B%2B+%26+rust%2Fgo");

        let url = build(&SearchFilters::new("software engineer"));
        assert_eq!(param(&url, "keyword"), "software+engineer");
    }

    #[test]
    fn test_enum_codes_pass_through() {
        let filters = SearchFilters::builder("x")
            .job_type(JobType::PartTime)
            .job_level(JobLevel::Entry)
            .posted_within(PostedWithin::TwoDays)
            .gender(Gender::Female)
            .work_arrangement(WorkArrangement::WorkFromHome)
            .build();
        let url = build(&filters);
        assert_eq!(param(&url, "jobType"), "PartTime");
        assert_eq!(param(&url, "jobLevel"), "Entry");
        assert_eq!(param(&url, "postedWithin"), "2");
        assert_eq!(param(&url, "gender"), "F");
        assert_eq!(param(&url, "workplace"), "1");
    }

    #[test]
    fn test_boolean_flags() {
        let filters = SearchFilters::builder("x")
            .fresher_only(true)
            .pro_only(true)
            .toggle_jobs(false)
            .retired_army_preferred(true)
            .pwd_facilities(true)
            .build();
        let url = build(&filters);
        assert_eq!(param(&url, "isFresher"), "true");
        assert_eq!(param(&url, "isPro"), "1");
        assert_eq!(param(&url, "ToggleJobs"), "false");
        assert_eq!(param(&url, "armyp"), "yes");
        assert_eq!(param(&url, "facilitiesForPWD"), "1");
    }

    #[test]
    fn test_pagination_parameters() {
        let url = build(&SearchFilters::builder("x").page(4).page_size(25).build());
        assert_eq!(param(&url, "pg"), "4");
        assert_eq!(param(&url, "rpp"), "25");
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let url = build_search_url(
            "http://127.0.0.1:9000/",
            &SearchFilters::new("x"),
            LocationIndex::embedded(),
        );
        assert!(url.starts_with("http://127.0.0.1:9000/Jobs/api/"));
    }

    #[test]
    fn test_deterministic() {
        let filters = SearchFilters::builder("analyst").location("Khulna").build();
        assert_eq!(build(&filters), build(&filters));
    }
}
