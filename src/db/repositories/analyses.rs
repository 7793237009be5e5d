use anyhow::Result;
use chrono::SecondsFormat;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{from_json, parse_datetime, to_i64, to_json, to_usize},
    models::StoredAnalysis,
};

const SELECT_COLUMNS: &str = "SELECT id, label, analyzed_at, total_frames, processed_frames, overall_score, aborted,
        fault_percentages_json, primary_issues_json, swing_phases_json
 FROM swing_analyses";

fn row_to_analysis(row: &Row) -> Result<StoredAnalysis> {
    let analyzed_at: String = row.get("analyzed_at")?;
    let total_frames: i64 = row.get("total_frames")?;
    let processed_frames: i64 = row.get("processed_frames")?;
    let fault_percentages: String = row.get("fault_percentages_json")?;
    let primary_issues: String = row.get("primary_issues_json")?;
    let swing_phases: String = row.get("swing_phases_json")?;

    Ok(StoredAnalysis {
        id: row.get("id")?,
        label: row.get("label")?,
        analyzed_at: parse_datetime(&analyzed_at, "analyzed_at")?,
        total_frames: to_usize(total_frames, "total_frames")?,
        processed_frames: to_usize(processed_frames, "processed_frames")?,
        overall_score: row.get("overall_score")?,
        aborted: row.get("aborted")?,
        fault_percentages: from_json(&fault_percentages, "fault_percentages_json")?,
        primary_issues: from_json(&primary_issues, "primary_issues_json")?,
        swing_phases: from_json(&swing_phases, "swing_phases_json")?,
    })
}

impl Database {
    pub async fn insert_analysis(&self, analysis: &StoredAnalysis) -> Result<()> {
        let record = analysis.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO swing_analyses (id, label, analyzed_at, total_frames, processed_frames, overall_score, aborted,
                     fault_percentages_json, primary_issues_json, swing_phases_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.label,
                    // Fixed-width timestamps keep ORDER BY analyzed_at chronological.
                    record.analyzed_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                    to_i64(record.total_frames)?,
                    to_i64(record.processed_frames)?,
                    record.overall_score,
                    record.aborted,
                    to_json(&record.fault_percentages, "fault_percentages")?,
                    to_json(&record.primary_issues, "primary_issues")?,
                    to_json(&record.swing_phases, "swing_phases")?,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_analysis(&self, analysis_id: &str) -> Result<Option<StoredAnalysis>> {
        let analysis_id = analysis_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let analysis = stmt
                .query_row(params![analysis_id], |row| Ok(row_to_analysis(row)))
                .optional()?
                .transpose()?;
            Ok(analysis)
        })
        .await
    }

    /// Most recent first.
    pub async fn recent_analyses(&self, limit: usize) -> Result<Vec<StoredAnalysis>> {
        let limit = to_i64(limit)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY analyzed_at DESC, rowid DESC LIMIT ?1"
            ))?;

            let mut rows = stmt.query(params![limit])?;
            let mut analyses = Vec::new();
            while let Some(row) = rows.next()? {
                analyses.push(row_to_analysis(row)?);
            }

            Ok(analyses)
        })
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_analysis(&self, analysis_id: &str) -> Result<bool> {
        let analysis_id = analysis_id.to_string();
        self.execute(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM swing_analyses WHERE id = ?1",
                params![analysis_id],
            )?;
            Ok(deleted > 0)
        })
        .await
    }
}
