//! Structured search criteria.
//!
//! [`SearchFilters`] is the single value handed to the query builder. Enum
//! fields carry the literal codes the BDJobs API expects, so nothing
//! downstream has to translate or guess.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_PAGE_SIZE: i32 = 50;
pub const MAX_PAGE_SIZE: i32 = 100;

/// Employment type filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    Any,
    FullTime,
    PartTime,
    Contract,
    Intern,
}

impl JobType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::FullTime => "FullTime",
            Self::PartTime => "PartTime",
            Self::Contract => "Contract",
            Self::Intern => "Intern",
        }
    }
}

/// Seniority filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobLevel {
    #[default]
    Any,
    Entry,
    Mid,
    Top,
}

impl JobLevel {
    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Entry => "Entry",
            Self::Mid => "Mid",
            Self::Top => "Top",
        }
    }
}

/// Posting recency filter; `OneDay` means posted today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostedWithin {
    #[default]
    Any,
    OneDay,
    TwoDays,
    ThreeDays,
    FourDays,
    FiveDays,
}

impl PostedWithin {
    /// Map a day count to a variant. Only 1 through 5 are supported upstream.
    pub fn days(days: u8) -> Option<Self> {
        match days {
            1 => Some(Self::OneDay),
            2 => Some(Self::TwoDays),
            3 => Some(Self::ThreeDays),
            4 => Some(Self::FourDays),
            5 => Some(Self::FiveDays),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::OneDay => "1",
            Self::TwoDays => "2",
            Self::ThreeDays => "3",
            Self::FourDays => "4",
            Self::FiveDays => "5",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Any,
    Male,
    Female,
    Both,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Male => "M",
            Self::Female => "F",
            Self::Both => "B",
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkArrangement {
    #[default]
    Any,
    WorkFromHome,
    /// Sent as `workplace=0`. Upstream has only been seen using `1` and the
    /// empty value, so this code is assumed.
    Office,
}

impl WorkArrangement {
    pub fn code(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::WorkFromHome => "1",
            Self::Office => "0",
        }
    }
}

/// Inclusive numeric range for age, salary or years of experience.
///
/// `0/0` means "no constraint". There is no way to ask for exactly zero, and
/// `start <= end` is left to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub const ANY: Self = Self { start: 0, end: 0 };

    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn is_unbounded(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// `"<start>/<end>"`, or an empty string for an unbounded range.
    pub fn encode(&self) -> String {
        if self.is_unbounded() {
            String::new()
        } else {
            format!("{}/{}", self.start, self.end)
        }
    }
}

/// All criteria for one search request.
///
/// Build one with [`SearchFilters::builder`]; fields are public so a UI can
/// also fill a value in place starting from [`SearchFilters::new`].
///
/// ```rust
/// use jobpulse::{JobType, Range, SearchFilters};
///
/// let filters = SearchFilters::builder("rust developer")
///     .location("Dhaka")
///     .job_type(JobType::FullTime)
///     .salary(Range::new(50_000, 120_000))
///     .page_size(20)
///     .build();
/// assert_eq!(filters.page, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub keyword: String,
    /// Free-text place name, resolved through the location index
    pub location: String,
    /// 1-based page number
    pub page: i32,
    /// Results per page, 1 through 100
    pub page_size: i32,
    pub job_type: JobType,
    pub job_level: JobLevel,
    pub posted_within: PostedWithin,
    pub age: Range,
    pub salary: Range,
    pub experience: Range,
    pub gender: Gender,
    pub work_arrangement: WorkArrangement,
    pub fresher_only: bool,
    pub pro_only: bool,
    /// Upstream visibility toggle; on by default
    pub toggle_jobs: bool,
    pub retired_army_preferred: bool,
    /// Only employers offering facilities for persons with disabilities
    pub pwd_facilities: bool,
}

impl SearchFilters {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: String::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            job_type: JobType::Any,
            job_level: JobLevel::Any,
            posted_within: PostedWithin::Any,
            age: Range::ANY,
            salary: Range::ANY,
            experience: Range::ANY,
            gender: Gender::Any,
            work_arrangement: WorkArrangement::Any,
            fresher_only: false,
            pro_only: false,
            toggle_jobs: true,
            retired_army_preferred: false,
            pwd_facilities: false,
        }
    }

    pub fn builder(keyword: impl Into<String>) -> SearchFiltersBuilder {
        SearchFiltersBuilder::new(keyword)
    }

    /// Same criteria, different page.
    pub fn with_page(&self, page: i32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Builder for [`SearchFilters`]
#[derive(Debug, Clone)]
pub struct SearchFiltersBuilder {
    filters: SearchFilters,
}

impl SearchFiltersBuilder {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            filters: SearchFilters::new(keyword),
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.filters.location = location.into();
        self
    }

    pub fn page(mut self, page: i32) -> Self {
        self.filters.page = page;
        self
    }

    pub fn page_size(mut self, page_size: i32) -> Self {
        self.filters.page_size = page_size;
        self
    }

    pub fn job_type(mut self, job_type: JobType) -> Self {
        self.filters.job_type = job_type;
        self
    }

    pub fn job_level(mut self, job_level: JobLevel) -> Self {
        self.filters.job_level = job_level;
        self
    }

    pub fn posted_within(mut self, posted_within: PostedWithin) -> Self {
        self.filters.posted_within = posted_within;
        self
    }

    pub fn age(mut self, age: Range) -> Self {
        self.filters.age = age;
        self
    }

    pub fn salary(mut self, salary: Range) -> Self {
        self.filters.salary = salary;
        self
    }

    pub fn experience(mut self, experience: Range) -> Self {
        self.filters.experience = experience;
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.filters.gender = gender;
        self
    }

    pub fn work_arrangement(mut self, arrangement: WorkArrangement) -> Self {
        self.filters.work_arrangement = arrangement;
        self
    }

    pub fn fresher_only(mut self, enabled: bool) -> Self {
        self.filters.fresher_only = enabled;
        self
    }

    pub fn pro_only(mut self, enabled: bool) -> Self {
        self.filters.pro_only = enabled;
        self
    }

    pub fn toggle_jobs(mut self, enabled: bool) -> Self {
        self.filters.toggle_jobs = enabled;
        self
    }

    pub fn retired_army_preferred(mut self, enabled: bool) -> Self {
        self.filters.retired_army_preferred = enabled;
        self
    }

    pub fn pwd_facilities(mut self, enabled: bool) -> Self {
        self.filters.pwd_facilities = enabled;
        self
    }

    pub fn build(self) -> SearchFilters {
        self.filters
    }
}
