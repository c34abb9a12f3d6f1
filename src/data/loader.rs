//! Games table ingestion
//!
//! Reads the historical games CSV into `MatchRecord`s, tolerating the
//! textual encodings the source logs use for list fields and outcomes.
//! Records with an empty pick side or an undefined outcome are dropped,
//! never fatal; ingestion only fails when nothing usable remains.

use std::path::Path;

use crate::data::registry::is_valid_name;
use crate::{DraftError, MatchRecord, Result};

/// Outcome tokens that mean "team1 won" (case-insensitive)
const TEAM1_WIN_TOKENS: [&str; 8] = ["team1", "1", "true", "t", "yes", "win", "won", "blue"];

/// Parse a sequence field into ordered identifiers.
///
/// Supported encodings: bracketed list (`"['a', 'b']"`), comma-delimited
/// (`"a,b"`), single value, empty. Empty and null-like entries are dropped.
pub fn parse_list_field(raw: &str) -> Vec<String> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Vec::new();
    }

    let inner = if s.starts_with('[') && s.ends_with(']') {
        s.trim_start_matches('[').trim_end_matches(']')
    } else {
        s
    };

    if inner.contains(',') {
        inner
            .split(',')
            .map(|p| p.trim().trim_matches(|c| c == '\'' || c == '"').trim())
            .filter(|p| is_valid_name(p))
            .map(str::to_string)
            .collect()
    } else {
        let single = inner.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        if is_valid_name(single) {
            vec![single.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Normalize an outcome field. `None` means the label is undefined and the
/// record must be dropped; any defined value outside the team1 token set
/// counts as a team2 win.
pub fn normalize_outcome(raw: &str) -> Option<bool> {
    let s = raw.trim().to_lowercase();
    if s.is_empty() || s == "nan" {
        return None;
    }
    Some(TEAM1_WIN_TOKENS.contains(&s.as_str()))
}

/// Ingestion summary for logging and `data status`
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestStats {
    pub total_rows: usize,
    pub usable: usize,
    pub dropped: usize,
}

/// Load the games table from a CSV file with headers.
///
/// Expected columns: `team1_picks`, `team2_picks`, `team1_bans`,
/// `team2_bans`, `winner`. Missing columns are treated as empty; extra
/// metadata columns (patch, league) are ignored.
pub fn load_games<P: AsRef<Path>>(path: P) -> Result<(Vec<MatchRecord>, IngestStats)> {
    let mut reader = csv::Reader::from_path(path.as_ref()).map_err(|e| {
        DraftError::Data(format!(
            "Failed to open games table {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| DraftError::Data(format!("Failed to read headers: {}", e)))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let col_t1_picks = column("team1_picks");
    let col_t2_picks = column("team2_picks");
    let col_t1_bans = column("team1_bans");
    let col_t2_bans = column("team2_bans");
    let col_winner = column("winner");

    let mut stats = IngestStats::default();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Skipping malformed row: {}", e);
                stats.total_rows += 1;
                stats.dropped += 1;
                continue;
            }
        };
        stats.total_rows += 1;

        let field = |col: Option<usize>| col.and_then(|i| row.get(i)).unwrap_or("");

        let team1_picks = parse_list_field(field(col_t1_picks));
        let team2_picks = parse_list_field(field(col_t2_picks));
        let team1_bans = parse_list_field(field(col_t1_bans));
        let team2_bans = parse_list_field(field(col_t2_bans));
        let outcome = normalize_outcome(field(col_winner));

        // Invariant: each side has at least one pick and the label is defined
        let team1_won = match outcome {
            Some(w) if !team1_picks.is_empty() && !team2_picks.is_empty() => w,
            _ => {
                stats.dropped += 1;
                continue;
            }
        };

        records.push(MatchRecord {
            team1_picks,
            team2_picks,
            team1_bans,
            team2_bans,
            team1_won,
        });
    }

    stats.usable = records.len();
    log::info!(
        "Loaded {} usable games ({} rows, {} dropped)",
        stats.usable,
        stats.total_rows,
        stats.dropped
    );

    if records.is_empty() {
        return Err(DraftError::Data(format!(
            "No usable match records in {} ({} rows dropped)",
            path.as_ref().display(),
            stats.dropped
        )));
    }

    Ok((records, stats))
}
