mod support;

use serde_json::json;
use ssts::api::{ApiClient, ApiError, Role};
use ssts::config::ServerSettings;
use ssts::history::{FeedbackButton, FeedbackError, HistoryView};
use ssts::organization::{CoachOverview, ManagementOverview};
use support::fake_server::{FakeServer, Recorded, Reply};

fn sessions() -> serde_json::Value {
    json!([
        {
            "id": 12,
            "user_id": 4,
            "created_at": "2026-10-18T09:30:00",
            "duration_seconds": 31.2,
            "technique_score": 88.4,
            "avg_cadence": 182,
            "avg_stride_length": 1.52,
            "avg_gct": 198,
            "coach_notes": "Drive the arms harder."
        },
        {
            "id": 9,
            "user_id": 4,
            "created_at": "2026-10-12T17:05:00",
            "duration_seconds": 25.0,
            "technique_score": 71.0,
            "avg_cadence": 168,
            "avg_stride_length": 1.38,
            "avg_gct": 231
        }
    ])
}

fn recent() -> serde_json::Value {
    json!([
        {
            "id": 12,
            "created_at": "2026-10-18T09:30:00",
            "technique_score": 88.4,
            "duration_seconds": 31.2,
            "athlete_name": "Lalu Zohri",
            "athlete_id": 4
        },
        {
            "id": 7,
            "created_at": "2026-10-17T14:45:00",
            "technique_score": 55.0,
            "duration_seconds": 12.0,
            "athlete_id": 6
        }
    ])
}

fn backend(request: &Recorded) -> Reply {
    match (request.method.as_str(), request.path()) {
        ("GET", "/api/v1/history/") => Reply::ok(sessions()),
        ("PUT", "/api/v1/history/12/feedback") => Reply::ok(json!({ "status": "ok" })),
        ("PUT", "/api/v1/history/9/feedback") => Reply::detail(403, "Not authorized"),
        ("GET", "/api/v1/users/athletes") => Reply::ok(json!([
            {"id": 4, "email": "lalu@ssts.dev", "full_name": "Lalu Zohri", "role": "athlete"},
            {"id": 6, "email": "quiet@ssts.dev", "role": "athlete", "is_active": false}
        ])),
        ("GET", "/api/v1/organization/recent-sessions") => Reply::ok(recent()),
        ("GET", "/api/v1/organization/summary") => Reply::ok(json!({
            "total_athletes": 14,
            "total_sessions": 230,
            "avg_system_score": 76.25,
            "active_today": 3
        })),
        _ => Reply::detail(404, "Not Found"),
    }
}

fn client(server: &FakeServer) -> ApiClient {
    ApiClient::new(&ServerSettings {
        origin: server.origin().to_string(),
        api_prefix: "/api/v1".into(),
    })
}

#[test]
fn coach_loads_athlete_history_and_saves_feedback() {
    let server = FakeServer::start(backend);
    let api = client(&server);
    let mut view = HistoryView::load(&api, Role::Coach, Some(4)).unwrap();
    let request = server.last("GET", "/api/v1/history/").unwrap();
    assert_eq!(request.target, "/api/v1/history/?user_id=4");

    let rows = view.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].feedback, FeedbackButton::Edit);
    assert_eq!(rows[1].feedback, FeedbackButton::Give);
    assert_eq!(rows[1].cadence, "168 spm");

    let chart = view.chart();
    assert_eq!(chart.labels, vec!["10/12/2026", "10/18/2026"]);
    assert_eq!(chart.series[0].values, vec![71.0, 88.4]);

    view.update_feedback(&api, 12, "Relax the shoulders.").unwrap();
    let sent = server.last("PUT", "/api/v1/history/12/feedback").unwrap().json();
    assert_eq!(sent, json!({ "coach_notes": "Relax the shoulders." }));
    assert_eq!(
        view.feedback_text(12).as_deref(),
        Some("\"Relax the shoulders.\"")
    );
}

#[test]
fn forbidden_feedback_keeps_local_notes() {
    let server = FakeServer::start(backend);
    let api = client(&server);
    let mut view = HistoryView::load(&api, Role::Coach, Some(4)).unwrap();
    let err = view.update_feedback(&api, 9, "Too late").unwrap_err();
    assert!(matches!(
        err,
        FeedbackError::Api(ApiError::Forbidden(ref detail)) if detail == "Not authorized"
    ));
    assert_eq!(view.feedback_text(9).as_deref(), Some("No feedback provided yet."));
}

#[test]
fn athlete_history_has_no_query_and_read_only_feedback() {
    let server = FakeServer::start(backend);
    let api = client(&server);
    let mut view = HistoryView::load(&api, Role::Athlete, None).unwrap();
    assert_eq!(
        server.last("GET", "/api/v1/history/").unwrap().target,
        "/api/v1/history/"
    );
    assert!(view.rows().iter().all(|row| row.feedback == FeedbackButton::View));
    assert!(matches!(
        view.update_feedback(&api, 12, "self review"),
        Err(FeedbackError::NotCoach)
    ));
    assert_eq!(server.count("PUT", "/api/v1/history/12/feedback"), 0);
}

#[test]
fn coach_overview_fetches_roster_and_recent_sessions() {
    let server = FakeServer::start(backend);
    let overview = CoachOverview::load(&client(&server)).unwrap();
    assert_eq!(overview.registered_label(), "2 Registered");

    let athletes = overview.athlete_rows();
    assert_eq!(athletes[0].initial, "L");
    assert_eq!(athletes[1].name, "quiet@ssts.dev");
    assert_eq!(athletes[1].status, "Inactive");
    assert_eq!(athletes[1].history_path, "/history?userId=6");

    let recent = overview.recent_rows();
    assert_eq!(recent[0].time, "09:30");
    assert_eq!(recent[1].athlete, "Athlete #6");
}

#[test]
fn management_overview_builds_kpi_cards() {
    let server = FakeServer::start(backend);
    let overview = ManagementOverview::load(&client(&server)).unwrap();
    let cards: Vec<(&str, String)> = overview
        .cards()
        .into_iter()
        .map(|card| (card.title, card.value))
        .collect();
    assert_eq!(
        cards,
        vec![
            ("Total Athletes", "14".to_string()),
            ("Total Sessions", "230".to_string()),
            ("Avg Technique Score", "76.25".to_string()),
            ("Active Today", "3".to_string()),
        ]
    );
    assert_eq!(overview.recent_rows()[0].date, "10/18/2026");
    assert_eq!(server.count("GET", "/api/v1/organization/summary"), 1);
}

#[test]
fn management_overview_fails_when_a_request_fails() {
    let server = FakeServer::start(|request: &Recorded| {
        if request.is("GET", "/api/v1/organization/summary") {
            Reply::detail(403, "Not authorized")
        } else {
            backend(request)
        }
    });
    let err = ManagementOverview::load(&client(&server)).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}
