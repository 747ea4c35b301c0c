//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `newtitles_core` linkage and the bundled catalog.
//! - Print one month's listing, page by page, for quick local checks.
//!
//! Usage: `newtitles_cli [YYYY-MM]` (defaults to the current month).

use newtitles_core::{
    load_catalog, AppConfig, BrowseSession, MapCommandQueue, YearMonth,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("newtitles_core ping={}", newtitles_core::ping());
    println!("newtitles_core version={}", newtitles_core::core_version());

    let reference = match std::env::args().nth(1) {
        Some(raw) => match raw.parse::<YearMonth>() {
            Ok(month) => month,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => YearMonth::current(),
    };
    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let months = catalog
        .acquisition_months()
        .iter()
        .map(YearMonth::to_string)
        .collect::<Vec<_>>();
    println!("catalog books={} months=[{}]", catalog.len(), months.join(", "));

    let mut session =
        BrowseSession::new(catalog, AppConfig::default(), reference, MapCommandQueue::new());
    println!(
        "{} (acquired {})",
        session.month_label(),
        session.target_month()
    );

    let pages = session.page_count();
    for page in 1..=pages {
        session.go_to_page(page);
        let view = session.page_view();
        println!("-- page {}/{} ({} total)", view.page, view.page_count, view.total);
        for item in view.items {
            println!("{:>3}. {}", item.absolute_index + 1, item.line);
        }
    }
    ExitCode::SUCCESS
}
