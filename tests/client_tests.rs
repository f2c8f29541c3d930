use rtimesheet::client::{ApiClient, Mutation, ServerValue, TimesheetCache};
use rtimesheet::client::view::{ListFilter, TimesheetFilter, weekly_hours_series};
use rtimesheet::core::tasks::TaskInput;
use rtimesheet::errors::AppError;
use rtimesheet::models::{Status, Weekday};
use chrono::NaiveDate;

mod common;
use common::*;

/// Serve the fixture router on an ephemeral port and return its base URL.
async fn spawn_server(fx: &Fixture) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = fx.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn client_round_trips_every_endpoint() {
    let fx = Fixture::new();
    let base = spawn_server(&fx).await;
    let alice = ApiClient::new(&base, TOKEN_A).unwrap();

    let me = alice.me().await.unwrap();
    assert_eq!(me.role, "contractor");

    let ts = alice.create_timesheet().await.unwrap();
    assert_eq!(ts.status, Status::Draft);

    let sunday = NaiveDate::from_ymd_opt(2024, 6, 2);
    assert_eq!(alice.assign_week(ts.id, sunday).await.unwrap(), sunday);

    let task = alice
        .upsert_task(&TaskInput {
            id: None,
            timesheet_id: ts.id,
            weekday: Weekday::Wednesday,
            name: "Design".into(),
            hours: 2.5,
        })
        .await
        .unwrap();

    let entry = alice.change_status(ts.id, Status::Submitted).await.unwrap();
    assert_eq!(entry.from_status, Status::Draft);
    assert_eq!(alice.history(ts.id).await.unwrap().len(), 1);

    let rows = alice.list_timesheets().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_hours, 2.5);

    assert_eq!(alice.delete_task(task.id).await.unwrap(), task.id);
    assert!(alice.get_timesheet(ts.id).await.unwrap().tasks.is_empty());

    let profile = alice.profile(fx.alice.id).await.unwrap();
    assert_eq!(profile.name, "Alice Smith");
}

#[tokio::test]
async fn client_maps_error_statuses() {
    let fx = Fixture::new();
    let base = spawn_server(&fx).await;

    let nobody = ApiClient::new(&base, "tok-invalid").unwrap();
    assert!(matches!(nobody.me().await, Err(AppError::Unauthorized)));

    let stranger = ApiClient::new(&base, TOKEN_STRANGER).unwrap();
    assert!(matches!(stranger.list_timesheets().await, Err(AppError::Forbidden)));

    let bob = ApiClient::new(&base, TOKEN_B).unwrap();
    assert!(matches!(bob.get_timesheet(424242).await, Err(AppError::NotFound(_))));

    let ts = bob.create_timesheet().await.unwrap();
    match bob.assign_week(ts.id, NaiveDate::from_ymd_opt(2024, 6, 4)).await {
        Err(AppError::Validation(msg)) => assert!(msg.contains("Sunday"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }

    bob.change_status(ts.id, Status::Submitted).await.unwrap();
    match bob.change_status(ts.id, Status::Submitted).await {
        Err(AppError::UnexpectedStatus { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn optimistic_cache_reconciles_with_server() {
    let fx = Fixture::new();
    let base = spawn_server(&fx).await;
    let alice = ApiClient::new(&base, TOKEN_A).unwrap();

    let ts = alice.create_timesheet().await.unwrap();
    let mut cache = TimesheetCache::new();
    cache.store(alice.get_timesheet(ts.id).await.unwrap());

    let add = cache.apply(Mutation::UpsertTask(TaskInput {
        id: None,
        timesheet_id: ts.id,
        weekday: Weekday::Monday,
        name: "Design".into(),
        hours: 2.5,
    }));
    let submit = cache.apply(Mutation::ChangeStatus {
        timesheet_id: ts.id,
        to_status: Status::Submitted,
    });
    let view = cache.view(ts.id).unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.timesheet.status, Status::Submitted);

    // per-timesheet FIFO: drain in order
    while let Some((id, mutation)) = cache.next_to_send(ts.id) {
        let mutation = mutation.clone();
        match alice.execute(&mutation).await {
            Ok(value) => assert!(cache.reconcile(id, value)),
            Err(_) => assert!(cache.fail(id)),
        }
    }
    assert_eq!(cache.pending_count(ts.id), 0);
    assert!(add < submit);

    let server = alice.get_timesheet(ts.id).await.unwrap();
    let local = cache.view(ts.id).unwrap();
    assert_eq!(local.timesheet.status, server.timesheet.status);
    assert_eq!(local.tasks, server.tasks);
    assert_eq!(local.history.len(), server.history.len());
    assert_eq!(local.history[0].id, server.history[0].id);

    // a rejected mutation falls back to the snapshot
    let bad = cache.apply(Mutation::ChangeStatus {
        timesheet_id: ts.id,
        to_status: Status::Submitted,
    });
    let result = alice
        .execute(&Mutation::ChangeStatus {
            timesheet_id: ts.id,
            to_status: Status::Submitted,
        })
        .await;
    assert!(result.is_err());
    assert!(cache.fail(bad));
    assert_eq!(cache.view(ts.id).as_ref(), cache.snapshot(ts.id));
    assert!(matches!(
        alice.execute(&Mutation::DeleteTask { timesheet_id: ts.id, task_id: server.tasks[0].id }).await,
        Ok(ServerValue::Deleted(_))
    ));
}

#[tokio::test]
async fn manager_dashboard_figures() {
    let fx = Fixture::new();
    let base = spawn_server(&fx).await;
    let alice = ApiClient::new(&base, TOKEN_A).unwrap();
    let bob = ApiClient::new(&base, TOKEN_B).unwrap();
    let mia = ApiClient::new(&base, TOKEN_M1).unwrap();

    let week: [(&ApiClient, &[(Weekday, f64)]); 2] = [
        (&alice, &[(Weekday::Monday, 15.0), (Weekday::Tuesday, 15.0)]),
        (&bob, &[(Weekday::Tuesday, 10.0)]),
    ];
    for (client, days) in week {
        let ts = client.create_timesheet().await.unwrap();
        client
            .assign_week(ts.id, NaiveDate::from_ymd_opt(2024, 6, 2))
            .await
            .unwrap();
        for &(weekday, hours) in days {
            client
                .upsert_task(&TaskInput {
                    id: None,
                    timesheet_id: ts.id,
                    weekday,
                    name: "Work".into(),
                    hours,
                })
                .await
                .unwrap();
        }
        client.change_status(ts.id, Status::Submitted).await.unwrap();
    }

    let rows = mia.list_timesheets().await.unwrap();
    assert_eq!(rows.len(), 2);

    let only_alice = TimesheetFilter {
        status: ListFilter::only(vec![Status::Submitted]),
        contractor: ListFilter::except(vec![fx.bob.id]),
    };
    let kept = only_alice.apply(&rows);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].progress(), 75);
    assert_eq!(kept[0].pay(), 1500.0);

    let series = weekly_hours_series(&rows);
    assert_eq!(series[&fx.bob.id][0].1, 10.0);
}
