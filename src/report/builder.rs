use chrono::{DateTime, Utc};
use tracing::debug;

use super::highlights::{HighlightContext, HighlightGenerator};
use super::{DivisionReport, ReportOptions, Standout, StandoutTag};
use crate::stats::{rank_players, rank_teams, GameResult, PlayerSeasonStat, SeasonStats};

pub fn standout_tag(player: &PlayerSeasonStat) -> StandoutTag {
    if player.goals >= 3 {
        StandoutTag::HatTrickHero
    } else if player.assists >= 3 {
        StandoutTag::Playmaker
    } else if player.points >= 4 {
        StandoutTag::ConsistentPerformer
    } else {
        StandoutTag::SolidContributor
    }
}

/// The top `count` players of an already ranked list
pub fn standouts(ranked: &[PlayerSeasonStat], count: usize) -> Vec<Standout> {
    ranked
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, player)| Standout {
            rank: index + 1,
            player: player.player.clone(),
            team: player.team.clone(),
            goals: player.goals,
            assists: player.assists,
            points: player.points,
            tag: standout_tag(player),
        })
        .collect()
}

/// Assembles division reports from aggregated stats
pub struct ReportBuilder {
    generator: HighlightGenerator,
    standout_count: usize,
}

impl ReportBuilder {
    pub fn new(options: &ReportOptions) -> Self {
        Self::with_generator(HighlightGenerator::new(options), options)
    }

    pub fn with_generator(generator: HighlightGenerator, options: &ReportOptions) -> Self {
        Self {
            generator,
            standout_count: options.standout_count,
        }
    }

    pub fn build(
        &self,
        division: &str,
        stats: &SeasonStats,
        games: &[GameResult],
        generated_at: DateTime<Utc>,
    ) -> DivisionReport {
        let players = rank_players(stats);
        let teams = rank_teams(stats);

        let highlights = self.generator.generate(&HighlightContext {
            players: &players,
            games,
        });
        let standouts = standouts(&players, self.standout_count);

        debug!(
            division = %division,
            highlights = highlights.len(),
            standouts = standouts.len(),
            "Built division report"
        );

        DivisionReport {
            division: division.to_string(),
            generated_at,
            highlights,
            standouts,
            players,
            teams,
            games: games.to_vec(),
            gaps: stats.gaps.clone(),
        }
    }
}

/// Builds a report with the built-in highlight rules
pub fn build_report(
    division: &str,
    stats: &SeasonStats,
    games: &[GameResult],
    options: &ReportOptions,
) -> DivisionReport {
    ReportBuilder::new(options).build(division, stats, games, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn player(name: &str, goals: u32, assists: u32) -> PlayerSeasonStat {
        PlayerSeasonStat {
            player: name.into(),
            team: "Blades".into(),
            goals,
            assists,
            points: goals + assists,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(3, 5, StandoutTag::HatTrickHero)]
    #[case(2, 3, StandoutTag::Playmaker)]
    #[case(2, 2, StandoutTag::ConsistentPerformer)]
    #[case(1, 1, StandoutTag::SolidContributor)]
    fn tags_by_threshold(#[case] goals: u32, #[case] assists: u32, #[case] expected: StandoutTag) {
        assert_eq!(standout_tag(&player("Adams", goals, assists)), expected);
    }

    #[test]
    fn tag_labels() {
        assert_eq!(StandoutTag::HatTrickHero.to_string(), "hat-trick hero");
        assert_eq!(
            serde_json::to_value(StandoutTag::SolidContributor).unwrap(),
            "solid contributor"
        );
    }

    #[test]
    fn report_ranks_players_and_picks_top_three() {
        let stats = SeasonStats {
            players: [
                player("Davis", 0, 1),
                player("Brown", 2, 2),
                player("Adams", 2, 2),
                player("Clark", 4, 0),
            ]
            .into_iter()
            .map(|p| (p.key(), p))
            .collect(),
            ..Default::default()
        };

        let report = build_report("Gold", &stats, &[], &ReportOptions::default());

        let ranked: Vec<&str> = report.players.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(ranked, vec!["Clark", "Adams", "Brown", "Davis"]);

        assert_eq!(report.standouts.len(), 3);
        assert_eq!(report.standouts[0].rank, 1);
        assert_eq!(report.standouts[0].tag, StandoutTag::HatTrickHero);
        assert_eq!(report.standouts[1].tag, StandoutTag::ConsistentPerformer);
        assert_eq!(report.division, "Gold");
        assert!(!report.highlights.is_empty());
    }
}
