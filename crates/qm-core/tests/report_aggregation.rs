use chrono::NaiveDate;
use qm_core::catalog::{CatalogDocument, CatalogNameMap, SchemaIndex};
use qm_core::reporting::{
    action_required_ratio, daily_trend, grouped_stats, histogram, Dimension, DimensionMap,
    GroupBy, ProfileContext, RadarGrouping, SubmissionFilter, OTHER_DIMENSION,
};
use qm_core::scoring::{AnswerSet, AnswerValue, Scorecard};
use qm_core::submission::{parse_wire_timestamp, Submission};
use serde_json::json;

fn catalog_documents() -> Vec<CatalogDocument> {
    vec![CatalogDocument {
        name: "Servicequalität".to_string(),
        version: 1,
        root_id: String::new(),
        is_active: true,
        teams: vec!["SDK Inbound".to_string()],
        json_data: json!({
            "pages": [
                {"name": "Kommunikation", "elements": [
                    {"type": "rating", "name": "Tonfall", "rateMax": 5},
                    {"type": "radiogroup", "name": "Anrede korrekt"}
                ]},
                {"name": "Dateneingabe", "elements": [
                    {"type": "rating", "name": "Systempflege", "rateMax": 4}
                ]}
            ]
        }),
    }]
}

fn dimension_map() -> DimensionMap {
    let mut map = DimensionMap::new();
    map.upsert_dimension(Dimension {
        id: "d-komm".to_string(),
        name: "Kommunikation".to_string(),
        color: "#ff9800".to_string(),
    });
    map.upsert_assignment("Kommunikation", Some("d-komm".to_string()));
    map
}

fn submission(
    employee: &str,
    team: &str,
    catalog: &str,
    percent: f64,
    datum: &str,
    answers: AnswerSet,
) -> Submission {
    Submission {
        employee: employee.to_string(),
        evaluator: "eva.luator@verbaneum.de".to_string(),
        team: team.to_string(),
        catalog: catalog.to_string(),
        submitted_at: parse_wire_timestamp(datum),
        answers,
        computed: Scorecard {
            points: 0.0,
            max_points: 0.0,
            percent,
        },
    }
}

fn sample_submissions() -> Vec<Submission> {
    let mut first = AnswerSet::new();
    first.insert("Tonfall", AnswerValue::Number(4.0));
    first.insert("Anrede_korrekt", AnswerValue::Text("Ja".to_string()));
    first.insert("Systempflege", AnswerValue::Number(2.0));
    first.insert("Handlungsbedarf", AnswerValue::Text("Ja".to_string()));

    let mut second = AnswerSet::new();
    second.insert("Tonfall", AnswerValue::Number(5.0));
    second.insert("Handlungsbedarf", AnswerValue::Text("Nein".to_string()));

    vec![
        submission(
            "jane.doe@verbaneum.de",
            "SDK Inbound",
            "Servicequalität",
            66.67,
            "01.03.2025, 10:00:00",
            first,
        ),
        submission(
            "max.muster@verbaneum.de",
            "SDK Inbound",
            "Servicequalität",
            100.0,
            "03.03.2025, 09:15:00",
            second,
        ),
        // catalog deleted without a name-map entry: counted in simple
        // aggregates, skipped by schema-dependent ones
        submission(
            "jane.doe@verbaneum.de",
            "OSC",
            "Verschollener Bogen",
            40.0,
            "02.03.2025, 12:00:00",
            AnswerSet::new(),
        ),
    ]
}

#[test]
fn filtered_report_pipeline_produces_consistent_views() {
    let submissions = sample_submissions();
    let index = SchemaIndex::build(&catalog_documents());
    let names = CatalogNameMap::default();
    let dimensions = dimension_map();

    let filter = SubmissionFilter::new().teams(["SDK Inbound"]);
    let filtered: Vec<&Submission> = filter.apply(&submissions);
    assert_eq!(filtered.len(), 2);

    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let by_employee = grouped_stats(filtered.clone(), GroupBy::Employee, today);
    assert_eq!(by_employee.len(), 2);

    let buckets = histogram(filtered.clone());
    let total: usize = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, filtered.len());

    let ctx = ProfileContext {
        index: &index,
        names: &names,
        dimensions: &dimensions,
    };
    // catalog filter active: axes are raw categories
    let radar = ctx.radar_profile(filtered.clone(), RadarGrouping::Category);
    let subjects: Vec<&str> = radar.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Dateneingabe", "Kommunikation"]);

    let ratio = action_required_ratio(filtered.clone());
    assert_eq!(ratio.yes, 1);
    assert_eq!(ratio.no, 1);

    let trend = daily_trend(filtered);
    assert_eq!(trend.len(), 2);
    assert!(trend[0].date < trend[1].date);
}

#[test]
fn unknown_catalogs_degrade_the_report_instead_of_failing_it() {
    let submissions = sample_submissions();
    let index = SchemaIndex::build(&catalog_documents());
    let names = CatalogNameMap::default();
    let dimensions = dimension_map();

    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let by_team = grouped_stats(&submissions, GroupBy::Team, today);
    // the unresolvable submission still counts here
    assert_eq!(by_team.iter().map(|g| g.count).sum::<usize>(), 3);

    let ctx = ProfileContext {
        index: &index,
        names: &names,
        dimensions: &dimensions,
    };
    let radar = ctx.radar_profile(&submissions, RadarGrouping::Dimension);
    // only the two resolvable submissions contribute axes
    assert!(radar.iter().any(|e| e.subject == "Kommunikation"));
    assert!(radar.iter().any(|e| e.subject == OTHER_DIMENSION));
    let contributions: usize = radar.iter().map(|e| e.count).sum();
    assert_eq!(contributions, 4);
}

#[test]
fn every_operation_handles_empty_input() {
    let index = SchemaIndex::build(&[]);
    let names = CatalogNameMap::default();
    let dimensions = DimensionMap::new();
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let empty: Vec<Submission> = Vec::new();

    assert!(grouped_stats(&empty, GroupBy::Team, today).is_empty());
    assert!(histogram(&empty).iter().all(|b| b.count == 0));
    assert_eq!(action_required_ratio(&empty).total(), 0);
    assert!(daily_trend(&empty).is_empty());

    let ctx = ProfileContext {
        index: &index,
        names: &names,
        dimensions: &dimensions,
    };
    assert!(ctx.radar_profile(&empty, RadarGrouping::Dimension).is_empty());
    assert!(ctx.question_profile(&empty).is_empty());
}
