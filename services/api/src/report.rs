use crate::infra::{parse_date, seed_dimension_map};
use crate::routes::ReportResponse;
use chrono::{Local, NaiveDate};
use clap::Args;
use qm_core::catalog::{CatalogDocument, CatalogNameMap, SchemaIndex};
use qm_core::error::AppError;
use qm_core::importer::{ImportError, SubmissionImporter};
use qm_core::reporting::{
    action_required_ratio, daily_trend, grouped_stats, histogram, GroupBy, ProfileContext,
    RadarGrouping, SubmissionFilter,
};
use qm_core::submission::Submission;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Catalog definition file (JSON array of catalog documents)
    #[arg(long)]
    pub(crate) catalogs: PathBuf,
    /// Legacy submission export (CSV)
    #[arg(long)]
    pub(crate) submissions: PathBuf,
    /// Restrict to one or more teams (repeatable)
    #[arg(long = "team")]
    pub(crate) teams: Vec<String>,
    /// Restrict to one catalog
    #[arg(long)]
    pub(crate) catalog: Option<String>,
    /// Earliest submission date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Latest submission date to include (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Grouping axis for the stats table: team, evaluator or employee
    #[arg(long, default_value = "team", value_parser = parse_group_by)]
    pub(crate) group_by: GroupBy,
    /// Reference date for recency figures (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include the per-question drilldown (needs --team or --catalog)
    #[arg(long)]
    pub(crate) include_questions: bool,
}

fn parse_group_by(raw: &str) -> Result<GroupBy, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "team" => Ok(GroupBy::Team),
        "evaluator" => Ok(GroupBy::Evaluator),
        "employee" => Ok(GroupBy::Employee),
        other => Err(format!(
            "unknown grouping '{other}', expected team, evaluator or employee"
        )),
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.catalogs)?;
    let documents: Vec<CatalogDocument> =
        serde_json::from_str(&raw).map_err(ImportError::from)?;
    let submissions = SubmissionImporter::from_path(&args.submissions)?;

    let report = build_report(&documents, &submissions, &args);

    let rendered = serde_json::to_string_pretty(&report).map_err(ImportError::from)?;
    println!("{rendered}");
    Ok(())
}

fn build_report(
    documents: &[CatalogDocument],
    submissions: &[Submission],
    args: &ReportArgs,
) -> ReportResponse {
    let index = SchemaIndex::build(documents);
    let names = CatalogNameMap::from_pairs(std::iter::empty::<(String, String)>());
    let dimensions = seed_dimension_map();

    let mut filter = SubmissionFilter::new().date_range(args.from, args.to);
    if !args.teams.is_empty() {
        filter = filter.teams(args.teams.iter().cloned());
    }
    if let Some(catalog) = &args.catalog {
        filter = filter.catalog(catalog.clone());
    }
    let selected = filter.apply(submissions);

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let context = ProfileContext {
        index: &index,
        names: &names,
        dimensions: &dimensions,
    };

    let questions = if args.include_questions && filter.narrows_by_team_or_catalog() {
        Some(context.question_profile(selected.iter().copied()))
    } else {
        None
    };

    ReportResponse {
        total: selected.len(),
        groups: grouped_stats(selected.iter().copied(), args.group_by, today),
        histogram: histogram(selected.iter().copied()),
        radar_categories: context.radar_profile(selected.iter().copied(), RadarGrouping::Category),
        radar_dimensions: context.radar_profile(selected.iter().copied(), RadarGrouping::Dimension),
        questions,
        action_required: action_required_ratio(selected.iter().copied()),
        trend: daily_trend(selected.iter().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    const EXPORT: &str = "\
Bewertername,Projekt,Kriterienkatalog,Datum,Name,Punkte,Erreichbare_Punkte,Prozent,Tonfall,Freundlichkeit
qa.lead@example.com,Team Nord,Servicequalität,\"24.09.2025, 14:30:00\",a.mueller@verbaneum.de,9,10,90,4,5
qa.lead@example.com,Team Süd,Servicequalität,\"25.09.2025, 09:00:00\",b.schmidt@verbaneum.de,7,10,70,3,4
";

    fn sample_documents() -> Vec<CatalogDocument> {
        vec![CatalogDocument {
            name: "Servicequalität".to_string(),
            version: 1,
            root_id: "Servicequalität".to_string(),
            is_active: true,
            teams: Vec::new(),
            json_data: json!({
                "pages": [
                    {
                        "name": "Gesprächsführung",
                        "elements": [
                            { "type": "rating", "name": "Tonfall", "rateMax": 5 },
                            { "type": "rating", "name": "Freundlichkeit", "rateMax": 5 }
                        ]
                    }
                ]
            }),
        }]
    }

    fn sample_args() -> ReportArgs {
        ReportArgs {
            catalogs: PathBuf::new(),
            submissions: PathBuf::new(),
            teams: Vec::new(),
            catalog: None,
            from: None,
            to: None,
            group_by: GroupBy::Team,
            today: Some(NaiveDate::from_ymd_opt(2025, 9, 26).unwrap()),
            include_questions: false,
        }
    }

    #[test]
    fn builds_a_report_from_an_export() {
        let submissions =
            SubmissionImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");
        let report = build_report(&sample_documents(), &submissions, &sample_args());

        assert_eq!(report.total, 2);
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].key, "Team Süd");
        assert_eq!(report.groups[1].key, "Team Nord");
        assert_eq!(report.histogram.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(report.radar_categories.len(), 1);
        assert_eq!(report.radar_categories[0].subject, "Gesprächsführung");
        assert!(report.questions.is_none());
    }

    #[test]
    fn team_filter_narrows_and_unlocks_questions() {
        let submissions =
            SubmissionImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");
        let mut args = sample_args();
        args.teams = vec!["Team Nord".to_string()];
        args.include_questions = true;

        let report = build_report(&sample_documents(), &submissions, &args);

        assert_eq!(report.total, 1);
        let questions = report.questions.expect("narrowed run drills down");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].subject, "Freundlichkeit");
        assert_eq!(questions[0].value, 100.0);
        assert_eq!(questions[1].subject, "Tonfall");
        assert_eq!(questions[1].value, 80.0);
    }

    #[test]
    fn rejects_unknown_grouping_axis() {
        assert!(parse_group_by("evaluator").is_ok());
        assert!(parse_group_by("projekt").is_err());
    }
}
