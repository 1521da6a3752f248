//! Text Views
//!
//! Renders pages and records for the terminal.

use std::fmt::Write as _;
use std::io;

use crate::app::Page;
use crate::guard::Route;
use crate::records::{HealthRecord, RecordSummary};
use crate::session::UserProfile;

/// Placeholder shown while the session is being checked
pub const LOADING: &str = "Loading...";

/// Render a resolved page
pub fn render_page(page: &Page) -> String {
    match page {
        Page::Loading => LOADING.to_string(),
        Page::Redirect(Route::Login) => {
            "Not logged in. Run `healthstats login` or `healthstats register` first.".to_string()
        }
        Page::Redirect(route) => format!("Redirecting to {}", route),
        Page::Dashboard { user, records } => {
            let mut out = format!("Health records for {}\n\n", display_name(user));
            out.push_str(&records_table(records));
            out
        }
        Page::Stats { user, summaries } => {
            let mut out = format!("Stats for {}\n\n", display_name(user));
            out.push_str(&stats_table(summaries));
            out
        }
        Page::Profile(user) => profile(user),
        Page::Login => "Log in with: healthstats login <email>".to_string(),
        Page::Register => "Create an account with: healthstats register <email> <name>".to_string(),
    }
}

fn display_name(user: &UserProfile) -> String {
    let name = user.full_name();
    if name.is_empty() {
        user.email.clone()
    } else {
        name
    }
}

/// Profile details
pub fn profile(user: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {}", "Name:", display_name(user));
    let _ = writeln!(out, "{:<8} {}", "Email:", user.email);
    let _ = writeln!(
        out,
        "{:<8} {}",
        "Role:",
        if user.role.is_empty() { "-" } else { user.role.as_str() }
    );
    let _ = write!(out, "{:<8} {}", "ID:", user.id);
    out
}

/// Records as an aligned table
pub fn records_table(records: &[HealthRecord]) -> String {
    if records.is_empty() {
        return "No health records yet.\n\nAdd your first one with:\n  healthstats records add weight 70.5 kg".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<14} {:>10} {:<8} {:<36} {}",
        "Date", "Type", "Value", "Unit", "ID", "Notes"
    );
    let _ = writeln!(out, "{}", "-".repeat(96));

    for record in records {
        let date = record
            .day()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| record.date.clone());

        let _ = writeln!(
            out,
            "{:<12} {:<14} {:>10} {:<8} {:<36} {}",
            date,
            record.record_type,
            format_value(record.value),
            record.unit,
            record.id,
            record.notes.as_deref().unwrap_or("")
        );
    }

    out.trim_end().to_string()
}

/// Per-type statistics as an aligned table
pub fn stats_table(summaries: &[RecordSummary]) -> String {
    if summaries.is_empty() {
        return "No data to summarize".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>6} {:>10} {:>10} {:>10} {:>10} {:<8} {}",
        "Type", "Count", "Avg", "Min", "Max", "Latest", "Unit", "As of"
    );
    let _ = writeln!(out, "{}", "-".repeat(86));

    for s in summaries {
        let _ = writeln!(
            out,
            "{:<14} {:>6} {:>10.1} {:>10} {:>10} {:>10} {:<8} {}",
            s.record_type,
            s.count,
            s.average,
            format_value(s.min),
            format_value(s.max),
            format_value(s.latest),
            s.unit,
            s.latest_date
        );
    }

    out.trim_end().to_string()
}

/// Whole numbers without decimals, others with up to two
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Write records as CSV with a header row
pub fn write_csv<W: io::Write>(records: &[HealthRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "userId", "date", "type", "value", "unit", "notes"])?;

    for r in records {
        let value = r.value.to_string();
        wtr.write_record([
            r.id.as_str(),
            r.user_id.as_str(),
            r.date.as_str(),
            r.record_type.as_str(),
            value.as_str(),
            r.unit.as_str(),
            r.notes.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Records as pretty-printed JSON
pub fn to_json(records: &[HealthRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// One-line error for a failed form submission
pub fn form_error(error: &dyn std::error::Error) -> String {
    format!("Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::summarize;

    fn user() -> UserProfile {
        UserProfile {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: "user".to_string(),
        }
    }

    fn records() -> Vec<HealthRecord> {
        vec![
            HealthRecord {
                id: "r1".to_string(),
                user_id: "1".to_string(),
                date: "2024-03-01T07:00:00Z".to_string(),
                record_type: "weight".to_string(),
                value: 70.5,
                unit: "kg".to_string(),
                notes: Some("fasted".to_string()),
            },
            HealthRecord {
                id: "r2".to_string(),
                user_id: "1".to_string(),
                date: "2024-03-01".to_string(),
                record_type: "steps".to_string(),
                value: 8000.0,
                unit: "count".to_string(),
                notes: None,
            },
        ]
    }

    #[test]
    fn test_loading_and_redirect() {
        assert_eq!(render_page(&Page::Loading), LOADING);
        assert!(render_page(&Page::Redirect(Route::Login)).contains("Not logged in"));
        assert_eq!(
            render_page(&Page::Redirect(Route::Dashboard)),
            "Redirecting to /"
        );
    }

    #[test]
    fn test_records_table() {
        let table = records_table(&records());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("2024-03-01"));
        assert!(lines[2].contains("70.5"));
        assert!(lines[2].contains("fasted"));
        assert!(lines[3].contains("8000"));

        assert!(records_table(&[]).starts_with("No health records yet."));
    }

    #[test]
    fn test_dashboard_page() {
        let page = Page::Dashboard {
            user: user(),
            records: records(),
        };
        let out = render_page(&page);
        assert!(out.starts_with("Health records for Ada Lovelace"));
    }

    #[test]
    fn test_stats_page() {
        let page = Page::Stats {
            user: user(),
            summaries: summarize(&records()),
        };
        let out = render_page(&page);
        assert!(out.contains("steps"));
        assert!(out.contains("weight"));
        assert_eq!(stats_table(&[]), "No data to summarize");
    }

    #[test]
    fn test_profile_falls_back_to_email() {
        let mut u = user();
        u.first_name.clear();
        u.last_name.clear();
        u.role.clear();

        let out = profile(&u);
        assert!(out.contains("Name:    a@b.com"));
        assert!(out.contains("Role:    -"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(8000.0), "8000");
        assert_eq!(format_value(70.5), "70.5");
        assert_eq!(format_value(7.25), "7.25");
        assert_eq!(format_value(70.001), "70");
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        write_csv(&records(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "id,userId,date,type,value,unit,notes");
        assert_eq!(lines[1], "r1,1,2024-03-01T07:00:00Z,weight,70.5,kg,fasted");
        assert_eq!(lines[2], "r2,1,2024-03-01,steps,8000,count,");
    }

    #[test]
    fn test_json_export() {
        let json = to_json(&records()).unwrap();
        let parsed: Vec<HealthRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn test_form_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "Email already registered");
        assert_eq!(form_error(&err), "Error: Email already registered");
    }
}
