mod utils;
use utils::{GameLogBuilder, PipelineSetupBuilder, ReportAssertion};

use rinkstats::{
    event::{normalize_records, EventLog, RawEventRecord},
    game::{EventOutcome, GameStatus, StrengthSituation},
    report::{ReportOptions, ReportStore},
    stats::GapReason,
};
use serde_json::json;

fn every_rule_fires() -> PipelineSetupBuilder {
    PipelineSetupBuilder::new()
        // 8-0: high-scoring, shutout, two hat tricks
        .with_game(
            GameLogBuilder::new("g1")
                .goals("Blades", "Adams", 4)
                .goals("Blades", "Brown", 4),
        )
        // 3-2 with eight penalties: one-goal game, penalty-heavy
        .with_game(
            (0..8)
                .fold(GameLogBuilder::new("g2"), |game, _| {
                    game.penalty("Pucks", "Park", "Slashing", 2)
                })
                .at(2, "10:00")
                .goals("Blades", "Clark", 2)
                .goals("Pucks", "Park", 2)
                .at(3, "05:00")
                .goal("Blades", "Clark"),
        )
        // 5-4: high-scoring, one-goal game
        .with_game(
            GameLogBuilder::new("g3")
                .teams("Edges", "Cyclones")
                .goals("Edges", "Evans", 2)
                .goals("Edges", "Ford", 2)
                .goals("Cyclones", "Grant", 2)
                .goals("Cyclones", "Hill", 2)
                .goal("Edges", "Ford"),
        )
        // 2-0 with eight penalties: penalty-heavy, shutout
        .with_game(
            (0..8)
                .fold(
                    GameLogBuilder::new("g4").teams("Edges", "Cyclones"),
                    |game, _| game.penalty("Cyclones", "Hill", "Roughing", 2),
                )
                .goal("Edges", "Evans")
                .goal("Edges", "Ford"),
        )
}

#[tokio::test]
async fn highlight_list_is_capped_and_ordered_when_every_rule_fires() {
    let setup = every_rule_fires().build().await;

    let report = setup
        .service
        .generate("Gold")
        .await
        .expect("report generation should succeed");

    assert_eq!(report.games.len(), 4);
    ReportAssertion::for_report(&report)
        .has_highlight_count(6)
        .highlights_in_priority_order()
        .at_most_per_rule(2)
        .has_categories(&["high-scoring", "hat-trick", "one-goal-game"]);
}

#[tokio::test]
async fn every_rule_contributes_when_limit_allows() {
    let setup = every_rule_fires()
        .with_options(ReportOptions {
            highlight_limit: 20,
            ..ReportOptions::default()
        })
        .build()
        .await;

    let report = setup.service.generate("Gold").await.unwrap();

    ReportAssertion::for_report(&report)
        .has_highlight_count(10)
        .highlights_in_priority_order()
        .at_most_per_rule(2)
        .has_categories(&[
            "high-scoring",
            "hat-trick",
            "one-goal-game",
            "penalty-heavy",
            "shutout",
        ]);
}

#[tokio::test]
async fn players_rank_by_points_then_goals_then_name() {
    let setup = PipelineSetupBuilder::new()
        .with_game(
            GameLogBuilder::new("g1")
                .goals("Blades", "Brown", 2)
                .goals("Blades", "Adams", 2)
                .assisted_goal("Pucks", "Davis", &["Clark"])
                .assisted_goal("Pucks", "Clark", &["Davis"]),
        )
        .build()
        .await;

    let report = setup.service.generate("Gold").await.unwrap();

    ReportAssertion::for_report(&report).ranks_players(&["Adams", "Brown", "Clark", "Davis"]);
    let standouts: Vec<&str> = report.standouts.iter().map(|s| s.player.as_str()).collect();
    assert_eq!(standouts, vec!["Adams", "Brown", "Clark"]);
}

#[tokio::test]
async fn game_without_final_summary_counts_for_players_only() {
    let setup = PipelineSetupBuilder::new()
        .with_game(
            GameLogBuilder::new("g1")
                .goals("Blades", "Adams", 2)
                .goal("Pucks", "Park"),
        )
        .with_game(
            GameLogBuilder::new("g2")
                .status(GameStatus::InProgress)
                .goals("Pucks", "Park", 3),
        )
        .with_game(
            GameLogBuilder::new("g3")
                .without_away_team()
                .goal("Blades", "Adams"),
        )
        .build()
        .await;

    let report = setup.service.generate("Gold").await.unwrap();

    let park = report.players.iter().find(|p| p.player == "Park").unwrap();
    assert_eq!(park.goals, 4);
    assert_eq!(park.hat_tricks, 1);
    let adams = report.players.iter().find(|p| p.player == "Adams").unwrap();
    assert_eq!(adams.goals, 3);

    let blades = report.teams.iter().find(|t| t.team == "Blades").unwrap();
    assert_eq!((blades.games_played, blades.wins, blades.losses), (1, 1, 0));
    assert_eq!((blades.goals_for, blades.goals_against), (2, 1));
    let pucks = report.teams.iter().find(|t| t.team == "Pucks").unwrap();
    assert_eq!((pucks.games_played, pucks.wins, pucks.losses), (1, 0, 1));

    let gaps: Vec<(&str, GapReason)> = report
        .gaps
        .iter()
        .map(|gap| (gap.game_id.as_str(), gap.reason))
        .collect();
    assert_eq!(
        gaps,
        vec![("g2", GapReason::NotFinal), ("g3", GapReason::MissingTeams)]
    );
}

#[tokio::test]
async fn regenerating_overwrites_the_stored_report() {
    let setup = PipelineSetupBuilder::new()
        .with_game(GameLogBuilder::new("g1").goal("Blades", "Adams"))
        .build()
        .await;

    let first = setup.service.generate("Gold").await.unwrap();
    assert_eq!(first.players[0].goals, 1);

    let late_goal = GameLogBuilder::new("g1")
        .at(3, "01:00")
        .goal("Blades", "Adams")
        .events()
        .remove(0);
    setup.tracker.record_event("g1", late_goal).await.unwrap();

    let second = setup
        .service
        .regenerate_for_game("g1")
        .await
        .unwrap()
        .expect("game belongs to a known division");
    let stored = setup.store.get_report("Gold").await.unwrap().unwrap();

    assert_eq!(second.players[0].goals, 2);
    assert_eq!(stored, second);
}

#[tokio::test]
async fn malformed_goal_counts_toward_score_but_not_players() {
    let setup = PipelineSetupBuilder::new()
        .with_game(
            GameLogBuilder::new("g1")
                .goal("Blades", "Adams")
                .goal_without_clock("Pucks", "Park"),
        )
        .build()
        .await;

    let state = setup.tracker.state("g1").await.unwrap();
    assert_eq!(state.score_of("Pucks"), 1);
    assert_eq!(state.rejected.len(), 1);
    assert!(state.rejected[0].counted_in_score);

    let report = setup.service.generate("Gold").await.unwrap();
    assert!(report.players.iter().all(|p| p.player != "Park"));
    let pucks = report.teams.iter().find(|t| t.team == "Pucks").unwrap();
    assert_eq!((pucks.goals_for, pucks.wins, pucks.losses), (1, 0, 0));
}

#[tokio::test]
async fn power_play_goal_is_credited() {
    let setup = PipelineSetupBuilder::new()
        .with_game(
            GameLogBuilder::new("g1")
                .at(1, "10:00")
                .penalty("Blades", "Adams", "Tripping", 2)
                .at(1, "09:00")
                .goal("Pucks", "Park"),
        )
        .build()
        .await;

    let state = setup.tracker.state("g1").await.unwrap();
    assert_eq!(
        state.goals[0].classification.strength,
        StrengthSituation::PowerPlay
    );

    let report = setup.service.generate("Gold").await.unwrap();
    let park = report.players.iter().find(|p| p.player == "Park").unwrap();
    assert_eq!(park.power_play_goals, 1);
    let pucks = report.teams.iter().find(|t| t.team == "Pucks").unwrap();
    assert_eq!(pucks.power_play_goals, 1);
    let blades = report.teams.iter().find(|t| t.team == "Blades").unwrap();
    assert_eq!(blades.penalty_minutes, 2);
}

#[tokio::test]
async fn event_from_outside_team_is_flagged_unattributed() {
    let setup = PipelineSetupBuilder::new()
        .with_game(GameLogBuilder::new("g1").goal("Blades", "Adams"))
        .build()
        .await;

    let stray = GameLogBuilder::new("g1")
        .at(2, "12:00")
        .goal("Edges", "Evans")
        .events()
        .remove(0);
    let outcome = setup.tracker.record_event("g1", stray).await.unwrap();

    assert!(matches!(outcome, EventOutcome::Goal(_)));
    let state = setup.tracker.state("g1").await.unwrap();
    assert_eq!(state.unattributed.len(), 1);
    assert_eq!(state.score_of("Edges"), 1);
    assert_eq!(state.score_of("Blades"), 1);
}

#[tokio::test]
async fn legacy_records_flow_through_the_pipeline() {
    let setup = PipelineSetupBuilder::new()
        .with_game(GameLogBuilder::new("g1"))
        .build()
        .await;

    let records: Vec<RawEventRecord> = serde_json::from_value(json!([
        {
            "type": "penalty",
            "penalizedTeam": "Pucks",
            "penalizedPlayer": "Park",
            "period": "1",
            "timeRemaining": "12:00",
            "infraction": "Fighting",
            "penaltyMinutes": 5,
            "createdAt": "2024-01-05T19:10:00Z"
        },
        {
            "eventType": "goal",
            "teamName": "Blades",
            "playerName": "Adams",
            "period": 1,
            "time": "11:00",
            "assist1": "Brown",
            "createdAt": "2024-01-05T19:11:00Z"
        },
        { "kind": "timeout", "team": "Blades", "createdAt": "2024-01-05T19:12:00Z" }
    ]))
    .unwrap();

    let (events, rejected) = normalize_records("g1", records);
    assert_eq!(rejected.len(), 1);
    for event in events {
        setup.event_log.append_event("g1", event).await.unwrap();
    }

    let state = setup.tracker.state("g1").await.unwrap();
    assert_eq!(
        state.goals[0].classification.strength,
        StrengthSituation::PowerPlay
    );

    let report = setup.service.generate("Gold").await.unwrap();
    let brown = report.players.iter().find(|p| p.player == "Brown").unwrap();
    assert_eq!(brown.assists, 1);
    let park = report.players.iter().find(|p| p.player == "Park").unwrap();
    assert_eq!(park.penalty_minutes, 5);
}
