//! Basic job search
//!
//! This example demonstrates the everyday operations:
//! - Creating a searcher from environment configuration
//! - Building filters and running a search
//! - Paging through results and resolving locations
//!
//! Run with `cargo run --example basic_search -- "rust developer" Dhaka`.

use jobpulse::{JobSearcher, LocationIndex, ResultPage, SearchFilters, WorkArrangement};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    jobpulse::init_logging(tracing::Level::INFO)?;

    let mut args = std::env::args().skip(1);
    let keyword = args.next().unwrap_or_else(|| "software engineer".to_string());
    let location = args.next().unwrap_or_default();

    if !location.is_empty() && LocationIndex::embedded().resolve(&location).is_none() {
        let suggestions: Vec<_> = LocationIndex::embedded()
            .search(&location)
            .iter()
            .map(|l| l.name)
            .collect();
        println!("Unknown location '{location}', searching everywhere. Did you mean {suggestions:?}?");
    }

    let searcher = JobSearcher::from_env()?;
    let filters = SearchFilters::builder(keyword.as_str())
        .location(location.as_str())
        .page_size(10)
        .build();

    println!("Searching for '{keyword}':");
    let page = searcher.search(&filters)?;
    print_page(&page, 5);

    if let Some(next) = searcher.next_page(&filters, &page)? {
        println!("\nPage 2:");
        print_page(&next, 5);
    }

    println!("\nRemote-only search for '{keyword}':");
    let remote = SearchFilters::builder(keyword.as_str())
        .work_arrangement(WorkArrangement::WorkFromHome)
        .page_size(5)
        .build();
    let page = searcher.search(&remote)?;
    print_page(&page, 5);

    searcher.shutdown();
    Ok(())
}

fn print_page(page: &ResultPage, limit: usize) {
    if !page.is_success() {
        println!("  {} (status {})", page.message(), page.status_code());
        return;
    }

    let listings = page.unique_listings();
    for (i, listing) in listings.iter().take(limit).enumerate() {
        println!(
            "  {}. {} - {} [{}] {}",
            i + 1,
            listing.title,
            listing.company,
            listing.location,
            listing.url()
        );
    }
    if listings.len() > limit {
        println!("  ... and {} more on this page", listings.len() - limit);
    }
    println!(
        "  {} matching jobs across {} pages",
        page.summary().total_records_found,
        page.summary().total_pages
    );
}
